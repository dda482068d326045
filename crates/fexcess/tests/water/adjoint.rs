use super::{functional, grid, liquid_densities, zeros};
use approx::assert_relative_eq;
use fexcess::core::FexError;
use fexcess::dft::{ExcessFunctional, PeriodicGrid, ScalarField, ScalarFieldTilde};
use std::error::Error;
use std::sync::Arc;

fn perturbation(grid: &Arc<PeriodicGrid>, phase: f64) -> ScalarFieldTilde {
    ScalarField::from_fn(grid, |[x, y, z]| {
        1e-3 * (1.0 + 0.5 * (0.3 * x + 0.7 * y - z + phase).sin())
    })
    .forward()
}

#[test]
fn gradient_per_channel() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let n = liquid_densities(&grid);
    let mut grad = zeros(&grid);
    functional.compute(&n, &mut grad)?;

    let eps = 1e-3;
    for channel in 0..2 {
        let delta = perturbation(&grid, channel as f64);
        let mut n_plus = n.clone();
        n_plus[channel].scaled_add(eps, &delta)?;
        let mut n_minus = n.clone();
        n_minus[channel].scaled_add(-eps, &delta)?;
        let mut dummy = zeros(&grid);
        let f_plus = functional.compute(&n_plus, &mut dummy)?;
        let f_minus = functional.compute(&n_minus, &mut dummy)?;
        let finite_difference = (f_plus - f_minus) / (2.0 * eps);
        let analytic = grad[channel].dot(&delta)?;
        println!("channel {channel}: {finite_difference:.12e} {analytic:.12e}");
        assert_relative_eq!(finite_difference, analytic, max_relative = 1e-6);
    }
    Ok(())
}

#[test]
fn gradient_all_channels() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let n = liquid_densities(&grid);
    let mut grad = zeros(&grid);
    functional.compute(&n, &mut grad)?;

    let delta = [perturbation(&grid, 0.5), perturbation(&grid, 2.0)];
    let eps = 1e-3;
    let shifted = |sign: f64| -> Result<f64, FexError> {
        let mut n = n.clone();
        for (n, d) in n.iter_mut().zip(&delta) {
            n.scaled_add(sign * eps, d)?;
        }
        functional.compute(&n, &mut zeros(&grid))
    };
    let finite_difference = (shifted(1.0)? - shifted(-1.0)?) / (2.0 * eps);
    let analytic = grad[0].dot(&delta[0])? + grad[1].dot(&delta[1])?;
    assert_relative_eq!(finite_difference, analytic, max_relative = 1e-6);
    Ok(())
}

#[test]
fn gradients_are_accumulated() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let n = liquid_densities(&grid);
    let mut grad = zeros(&grid);
    let f1 = functional.compute(&n, &mut grad)?;
    let once = grad.clone();
    let f2 = functional.compute(&n, &mut grad)?;
    assert_eq!(f1, f2);
    for (g, g1) in grad.iter().zip(&once) {
        assert!(g.max_abs_diff(&(g1 * 2.0))? <= 1e-12 * g1.at_origin().norm());
    }
    Ok(())
}

#[test]
fn density_outside_of_domain() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let n = super::uniform_densities(&grid, [0.06, 0.12]);
    let result = functional.compute(&n, &mut zeros(&grid));
    assert!(matches!(result, Err(FexError::DomainError { .. })));
    Ok(())
}
