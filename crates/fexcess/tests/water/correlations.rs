use super::{functional, grid, LIQUID_DENSITY};
use approx::assert_relative_eq;
use fexcess::core::FunctionalOptions;
use fexcess::dft::{
    numerical_second_derivative, CorrelationStore, ExcessFunctional, FunctionalId,
    ScalarEquationOfState,
};
use fexcess::water::{ScalarEosFunctional, WaterRecord};
use quantity::KELVIN;
use std::error::Error;

#[test]
fn correlations_are_symmetric() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?.with_id(FunctionalId(7));
    let store = CorrelationStore::new();
    let n = LIQUID_DENSITY;
    functional.direct_correlations(&[n, 2.0 * n], &store)?;
    assert_eq!(store.len()?, 3);

    let c01 = store.get(0, 1, FunctionalId(7))?.unwrap();
    let c10 = store.get(1, 0, FunctionalId(7))?.unwrap();
    assert_eq!(c01.max_abs_diff(&c10)?, 0.0);
    assert!(store.get(0, 1, FunctionalId(0))?.is_none());

    // C_ij = w_i w_j (2a' + n a'') at k = 0
    let (_, da, d2a) = functional.eos().evaluate_second_order(n);
    assert_relative_eq!(d2a, 7610715.282719441, max_relative = 1e-10);
    let w = functional.weights();
    let kernel = functional.attraction_kernel().at_origin();
    for (i, j) in [(0, 0), (0, 1), (1, 1)] {
        let c = store.get(i, j, FunctionalId(7))?.unwrap();
        assert_relative_eq!(
            c.at_origin().re,
            w[i] * w[j] * (2.0 * da * kernel + n * d2a * kernel * kernel),
            max_relative = 1e-7
        );
        assert_relative_eq!(
            c.at_origin().re,
            w[i] * w[j] * (2.0 * da + n * d2a),
            max_relative = 1e-6
        );
    }
    Ok(())
}

#[test]
fn correlations_accumulate() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let store = CorrelationStore::new();
    let bulk = [0.03, 0.06];
    functional.direct_correlations(&bulk, &store)?;
    let once = store.get(1, 1, functional.id())?.unwrap();
    functional.direct_correlations(&bulk, &store)?;
    let twice = store.get(1, 1, functional.id())?.unwrap();
    assert!(twice.max_abs_diff(&(&once * 2.0))? <= 1e-12 * once.at_origin().norm());
    Ok(())
}

#[test]
fn finite_difference_second_derivative() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let eos = functional.eos();
    for n in [0.01, 0.03, LIQUID_DENSITY] {
        let (_, _, exact) = eos.evaluate_second_order(n);
        for step in [1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9] {
            let numerical = numerical_second_derivative(eos, n, step)?;
            assert_relative_eq!(numerical, exact, max_relative = 1e-4);
        }
    }
    // close to the upper end of the domain
    for n in [0.01, 0.03, LIQUID_DENSITY, 0.045] {
        let (_, _, exact) = eos.evaluate_second_order(n);
        assert_relative_eq!(
            numerical_second_derivative(eos, n, 1e-7)?,
            exact,
            max_relative = 1e-7
        );
    }

    assert_relative_eq!(
        numerical_second_derivative(eos, 0.0, 1e-7)?,
        578706.2786014262,
        max_relative = 1e-7
    );
    Ok(())
}

#[test]
fn second_derivative_at_vapour_densities() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let eos = functional.eos();
    for n in [0.0, 1e-12, 1e-10, 1e-8, 1e-7, 3e-7, 8e-7, 1e-6] {
        let (_, _, exact) = eos.evaluate_second_order(n);
        assert_relative_eq!(
            numerical_second_derivative(eos, n, 1e-7)?,
            exact,
            max_relative = 1e-7
        );
    }

    // vapour correlations at k = 0
    let n = 8e-7;
    let store = CorrelationStore::new();
    functional.direct_correlations(&[n, 2.0 * n], &store)?;
    let (_, da, d2a) = eos.evaluate_second_order(n);
    let w = functional.weights();
    let kernel = functional.attraction_kernel().at_origin();
    let c = store.get(0, 0, functional.id())?.unwrap();
    assert_relative_eq!(
        c.at_origin().re,
        w[0] * w[0] * (2.0 * da * kernel + n * d2a * kernel * kernel),
        max_relative = 1e-10
    );
    Ok(())
}

#[test]
fn relative_step_option() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let options = FunctionalOptions::new().relative_step(1e-5);
    let functional = ScalarEosFunctional::with_parameters(
        &grid,
        298.15 * KELVIN,
        &WaterRecord::default(),
        true,
        options,
    )?;
    let reference = super::functional(&grid)?;
    let n = [0.03, 0.06];
    let (store, store_ref) = (CorrelationStore::new(), CorrelationStore::new());
    functional.direct_correlations(&n, &store)?;
    reference.direct_correlations(&n, &store_ref)?;
    let c = store.get(0, 0, functional.id())?.unwrap().at_origin().re;
    let c_ref = store_ref.get(0, 0, reference.id())?.unwrap().at_origin().re;
    assert_relative_eq!(c, c_ref, max_relative = 1e-6);

    let invalid = FunctionalOptions::new().relative_step(-1.0);
    assert!(ScalarEosFunctional::with_parameters(
        &grid,
        298.15 * KELVIN,
        &WaterRecord::default(),
        true,
        invalid
    )
    .is_err());
    Ok(())
}
