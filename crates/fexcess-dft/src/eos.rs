use fexcess_core::{FexError, FexResult};
use num_dual::{first_derivative, second_derivative, DualNum};
use std::f64::consts::PI;

/// A local equation of state that maps a (weighted) density to the excess
/// free energy per molecule.
///
/// Only [ScalarEquationOfState::free_energy_per_molecule] has to be
/// implemented. It is generic over dual numbers, which provides the exact
/// density derivatives used by the functionals.
///
/// All quantities are reduced: densities in 1/Å³, energies in units of k_B K.
pub trait ScalarEquationOfState: Send + Sync {
    /// Name of the model, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Temperature the coefficients of the model are evaluated at.
    fn temperature(&self) -> f64;

    /// Excess free energy per molecule at the given density.
    fn free_energy_per_molecule<D: DualNum<f64> + Copy>(&self, density: D) -> D;

    /// Hard sphere radius of the model in units of Angstrom.
    fn hard_sphere_radius(&self) -> f64;

    /// Length scale used by packing and exclusion models.
    fn characteristic_radius(&self) -> f64 {
        self.hard_sphere_radius()
    }

    /// Density at which the model is close packed in units of 1/Å³.
    ///
    /// Sets the resolution of numerical density derivatives. Defaults to one
    /// molecule per hard sphere volume.
    fn density_scale(&self) -> f64 {
        3.0 / (4.0 * PI * self.hard_sphere_radius().powi(3))
    }

    /// Free energy per molecule and its density derivative, without checking
    /// the result for finiteness. Negative densities are clamped to zero
    /// free energy and zero derivative.
    fn evaluate_unchecked(&self, density: f64) -> (f64, f64) {
        if density < 0.0 {
            return (0.0, 0.0);
        }
        first_derivative(|n| self.free_energy_per_molecule(n), density)
    }

    /// Free energy per molecule and its density derivative.
    fn evaluate(&self, density: f64) -> FexResult<(f64, f64)> {
        let (a, da) = self.evaluate_unchecked(density);
        if a.is_finite() && da.is_finite() {
            Ok((a, da))
        } else {
            Err(FexError::DomainError {
                routine: self.name().to_string(),
                density,
            })
        }
    }

    /// Free energy per molecule and its first two density derivatives.
    fn evaluate_second_order(&self, density: f64) -> (f64, f64, f64) {
        if density < 0.0 {
            return (0.0, 0.0, 0.0);
        }
        second_derivative(|n| self.free_energy_per_molecule(n), density)
    }
}
