use super::grid;
use approx::assert_relative_eq;
use fexcess::core::parameter::Record;
use fexcess::core::{FexError, FunctionalOptions};
use fexcess::dft::ExcessFunctional;
use fexcess::water::{water_parameters_from_json, ScalarEosFunctional, WaterRecord};
use quantity::KELVIN;
use std::error::Error;

#[test]
fn parameters_from_json() -> Result<(), Box<dyn Error>> {
    let parameters = water_parameters_from_json("tests/water/water_parameters.json", "water")?;
    let default = WaterRecord::default();
    assert_eq!(parameters.identifier, "water");
    assert_eq!(parameters.model_record.eos, default.eos);
    assert_relative_eq!(
        parameters.model_record.bond_angle,
        default.bond_angle,
        max_relative = 1e-14
    );

    let all = Record::<WaterRecord>::from_json_all("tests/water/water_parameters.json")?;
    assert_eq!(all.len(), 2);

    let grid = grid()?;
    let modified = water_parameters_from_json("tests/water/water_parameters.json", "water_hot")?;
    let functional = ScalarEosFunctional::with_parameters(
        &grid,
        298.15 * KELVIN,
        &modified.model_record,
        true,
        FunctionalOptions::default(),
    )?;
    assert_relative_eq!(
        functional.dielectric_scaling(),
        1.0 - 298.15 / 8000.0,
        max_relative = 1e-14
    );
    Ok(())
}

#[test]
fn missing_identifier() {
    assert!(matches!(
        water_parameters_from_json("tests/water/water_parameters.json", "ice"),
        Err(FexError::RecordNotFound(_))
    ));
}
