use super::{functional, grid, uniform_densities, zeros, LIQUID_DENSITY};
use approx::assert_relative_eq;
use fexcess::core::FexError;
use fexcess::dft::ExcessFunctional;
use fexcess::water::ScalarEosFunctional;
use quantity::KELVIN;
use std::error::Error;

#[test]
fn liquid_water() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    // two hydrogens per oxygen, so that the averaged density is the molecular density
    let n = LIQUID_DENSITY;
    let (f, grad) = functional.compute_uniform(&[n, 2.0 * n])?;
    assert_relative_eq!(f, -173.81972156685192, max_relative = 1e-9);

    let common = -8829.688496117645;
    let w = functional.weights();
    assert_relative_eq!(w[0] + 2.0 * w[1], 1.0, max_relative = 1e-14);
    assert_relative_eq!(grad[0], w[0] * common, max_relative = 1e-9);
    assert_relative_eq!(grad[1], w[1] * common, max_relative = 1e-9);
    Ok(())
}

#[test]
fn uniform_limit_of_compute() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let bulk = [0.03, 0.07];
    let (f, grad) = functional.compute_uniform(&bulk)?;

    let mut grad_field = zeros(&grid);
    let energy = functional.compute(&uniform_densities(&grid, bulk), &mut grad_field)?;
    // the attraction kernel is normalized up to its quadrature error
    let volume = grid.volume();
    assert_relative_eq!(energy, volume * f, max_relative = 1e-7);
    for (g, g_field) in grad.iter().zip(&grad_field) {
        assert_relative_eq!(g_field.at_origin().re, volume * g, max_relative = 1e-7);
        let origin = g_field.at_origin().norm();
        assert!(g_field.data().iter().skip(1).all(|g| g.norm() < 1e-10 * origin));
    }
    Ok(())
}

#[test]
fn vanishing_density() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let (f, grad) = functional.compute_uniform(&[0.0, 0.0])?;
    assert_eq!(f, 0.0);
    // a'(0) is finite, a(0) = 0
    assert!(grad.iter().all(|g| *g == 0.0));

    let (f, grad) = functional.compute_uniform(&[1e-8, 2e-8])?;
    assert_relative_eq!(f, 1e-8 * -0.00172932288976066, max_relative = 1e-8);
    let common = -0.00172932288976066 + 1e-8 * -172932.286082534;
    assert_relative_eq!(grad[0], functional.weights()[0] * common, max_relative = 1e-8);
    Ok(())
}

#[test]
fn gradient_is_additive() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let mut gradients = [1.0, -1.0];
    let f = functional.accumulate_uniform(&[0.01, 0.02], &mut gradients)?;
    let (f_ref, grad) = functional.compute_uniform(&[0.01, 0.02])?;
    assert_eq!(f, f_ref);
    assert_relative_eq!(gradients[0], 1.0 + grad[0], max_relative = 1e-14);
    assert_relative_eq!(gradients[1], -1.0 + grad[1], max_relative = 1e-14);
    Ok(())
}

#[test]
fn channel_mismatch() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    assert!(matches!(
        functional.compute_uniform(&[LIQUID_DENSITY]),
        Err(FexError::IncompatibleChannels(2, 1))
    ));
    Ok(())
}

#[test]
fn dielectric_and_radius() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = ScalarEosFunctional::new(&grid, 298.15 * KELVIN, false)?;
    assert_relative_eq!(
        functional.dielectric_scaling(),
        0.95943537414966,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        functional.characteristic_radius(),
        1.70873771974994,
        max_relative = 1e-12
    );
    assert_eq!(functional.name(), "ScalarEOS");
    Ok(())
}

#[test]
fn attraction_kernel_is_normalized() -> Result<(), Box<dyn Error>> {
    let grid = grid()?;
    let functional = functional(&grid)?;
    let kernel = functional.attraction_kernel();
    assert_relative_eq!(kernel.at_origin(), 1.0, max_relative = 1e-7);
    assert_relative_eq!(kernel.integral(), 1.0, max_relative = 1e-12);
    // kernels decay with the wave vector
    let k = grid.k_abs();
    let data = kernel.data();
    assert!(data[[1, 0, 0]] < data[[0, 0, 0]]);
    assert!(data[[6, 6, 6]].abs() < data[[1, 0, 0]]);
    assert!(k[[6, 6, 6]] > k[[1, 0, 0]]);
    Ok(())
}
