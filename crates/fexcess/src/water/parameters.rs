use fexcess_core::parameter::Record;
use fexcess_core::FexResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Parameters of the scalar equation of state of water.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScalarEosRecord {
    /// Boyle temperature in units of Kelvin
    pub boyle_temperature: f64,
    /// Boyle volume in units of m³/mol
    pub boyle_volume: f64,
    /// Amplitudes of the two contributions to the excluded volume
    pub excluded_volume_amplitudes: [f64; 2],
    /// Exponents of the two contributions to the excluded volume
    pub excluded_volume_exponents: [f64; 2],
    /// Packing correction of the repulsive term
    pub lambda: f64,
    /// Effective well depth of the second virial coefficient in units of Kelvin
    pub virial_well_depth: f64,
    /// Hydrogen bond energy in units of Kelvin
    pub hbond_energy: f64,
    /// Entropic weight of hydrogen bonds
    pub hbond_entropy_weight: f64,
    /// Amplitude of the density switching function of hydrogen bonds
    pub hbond_switching_amplitude: f64,
    /// Density of maximum hydrogen bonding in units of 1/Å³
    pub hbond_density: f64,
    /// Width of the hydrogen bond density window in units of 1/Å³
    pub hbond_density_width: f64,
}

impl Default for ScalarEosRecord {
    fn default() -> Self {
        Self {
            boyle_temperature: 1408.4,
            boyle_volume: 4.1782e-5,
            excluded_volume_amplitudes: [-0.0648, 1.8067],
            excluded_volume_exponents: [2.6038, 0.9726],
            lambda: 0.25,
            virial_well_depth: 450.0,
            hbond_energy: 1382.0,
            hbond_entropy_weight: 0.0029,
            hbond_switching_amplitude: 0.714,
            hbond_density: 0.0331,
            hbond_density_width: 0.0077,
        }
    }
}

/// Geometry, site and equation of state parameters of a water model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WaterRecord {
    /// O-H bond length in units of Angstrom
    pub bond_length: f64,
    /// H-O-H bond angle in units of degrees
    pub bond_angle: f64,
    /// Partial charge of the oxygen site
    pub oxygen_charge: f64,
    /// Partial charge of a hydrogen site
    pub hydrogen_charge: f64,
    /// Lennard-Jones weight (polarizability) of the oxygen site
    pub oxygen_lj_weight: f64,
    /// Lennard-Jones weight (polarizability) of a hydrogen site
    pub hydrogen_lj_weight: f64,
    /// Width of the Gaussian charge smearing in units of Angstrom
    pub charge_width: f64,
    /// Temperature at which the dielectric scaling vanishes in units of Kelvin
    pub dielectric_temperature: f64,
    /// Equation of state
    pub eos: ScalarEosRecord,
}

impl Default for WaterRecord {
    fn default() -> Self {
        Self {
            bond_length: 1.0,
            bond_angle: (-1.0f64 / 3.0).acos().to_degrees(),
            oxygen_charge: 0.8476,
            hydrogen_charge: -0.4238,
            oxygen_lj_weight: 3.73,
            hydrogen_lj_weight: 3.30,
            charge_width: 1.385,
            dielectric_temperature: 7350.0,
            eos: ScalarEosRecord::default(),
        }
    }
}

impl fmt::Display for WaterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WaterRecord(bond_length={}, bond_angle={}, q_O={}, q_H={}, boyle_temperature={})",
            self.bond_length,
            self.bond_angle,
            self.oxygen_charge,
            self.hydrogen_charge,
            self.eos.boyle_temperature
        )
    }
}

/// Parameters of the scalar-EOS water functional.
pub type WaterParameters = Record<WaterRecord>;

/// Read water parameters with the given identifier from a JSON file.
pub fn water_parameters_from_json<P: AsRef<Path>>(
    file: P,
    identifier: &str,
) -> FexResult<WaterParameters> {
    Record::from_json(file, identifier)
}
