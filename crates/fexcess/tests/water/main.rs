#![allow(clippy::excessive_precision)]
use fexcess::core::FexResult;
use fexcess::dft::{PeriodicGrid, ScalarField, ScalarFieldTilde};
use fexcess::water::ScalarEosFunctional;
use quantity::{ANGSTROM, KELVIN};
use std::f64::consts::PI;
use std::sync::Arc;

mod adjoint;
mod bulk;
mod correlations;
mod parameters;

/// Molecular density of liquid water at ambient conditions in 1/Å³.
const LIQUID_DENSITY: f64 = 0.0334;

fn grid() -> FexResult<Arc<PeriodicGrid>> {
    PeriodicGrid::new_cubic(16.0 * ANGSTROM, 12)
}

fn functional(grid: &Arc<PeriodicGrid>) -> FexResult<ScalarEosFunctional> {
    ScalarEosFunctional::new(grid, 298.15 * KELVIN, true)
}

/// Smoothly modulated oxygen and hydrogen site densities around the liquid density.
fn liquid_densities(grid: &Arc<PeriodicGrid>) -> Vec<ScalarFieldTilde> {
    let l = grid.lengths();
    let wave = |x: f64, l: f64| (2.0 * PI * x / l).cos();
    let n = LIQUID_DENSITY;
    vec![
        ScalarField::from_fn(grid, |[x, y, _]| n + 0.005 * wave(x, l[0]) * wave(y, l[1])).forward(),
        ScalarField::from_fn(grid, |[_, _, z]| 2.0 * (n + 0.004 * wave(z, l[2]))).forward(),
    ]
}

fn uniform_densities(grid: &Arc<PeriodicGrid>, densities: [f64; 2]) -> Vec<ScalarFieldTilde> {
    densities
        .iter()
        .map(|&n| ScalarField::constant(grid, n).forward())
        .collect()
}

fn zeros(grid: &Arc<PeriodicGrid>) -> Vec<ScalarFieldTilde> {
    vec![ScalarFieldTilde::zeros(grid), ScalarFieldTilde::zeros(grid)]
}
