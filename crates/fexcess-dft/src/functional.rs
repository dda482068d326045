use crate::correlation::{
    numerical_second_derivative, CorrelationAccumulator, CorrelationKey, FunctionalId,
};
use crate::eos::ScalarEquationOfState;
use crate::field::{ScalarField, ScalarFieldTilde};
use crate::kernel::Kernel;
use crate::molecule::Molecule;
use fexcess_core::{
    log_iter, log_result, FexError, FexResult, FunctionalOptions, Verbosity,
    DEFAULT_RELATIVE_STEP,
};
use ndarray::{Array1, Array3, Zip};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use std::sync::Arc;

/// Excess free energy functional of a molecular fluid component.
///
/// Densities and gradients are indexed by the site types of the molecule.
pub trait ExcessFunctional: Send + Sync {
    /// Name of the functional, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Identity used to address correlation functions.
    fn id(&self) -> FunctionalId;

    fn molecule(&self) -> &Molecule;

    /// Free energy of the inhomogeneous fluid. The functional derivative with
    /// respect to every site density is added to `gradients`.
    fn compute(
        &self,
        densities: &[ScalarFieldTilde],
        gradients: &mut [ScalarFieldTilde],
    ) -> FexResult<f64>;

    /// Free energy density of the homogeneous fluid and its derivatives with
    /// respect to the site densities.
    fn compute_uniform(&self, densities: &[f64]) -> FexResult<(f64, Array1<f64>)>;

    /// Add the direct correlation functions of the homogeneous fluid to `accumulator`.
    fn direct_correlations(
        &self,
        densities: &[f64],
        accumulator: &dyn CorrelationAccumulator,
    ) -> FexResult<()>;

    /// Factor applied to the dielectric response of the fluid.
    fn dielectric_scaling(&self) -> f64;

    /// Length scale used by packing and exclusion models in units of Angstrom.
    fn characteristic_radius(&self) -> f64;
}

/// Weighted-density functional built from a local equation of state.
///
/// The site densities are averaged with the Lennard-Jones weights of the
/// molecule, smoothed with an attraction kernel and fed pointwise into the
/// equation of state:
/// $$F=\int\bar n(r)\\,a\left((K*\bar n)(r)\right)\mathrm{d}r,\qquad \bar n=\sum_iw_in_i$$
pub struct WeightedDensityFunctional<E> {
    eos: E,
    molecule: Molecule,
    attraction: Arc<Kernel>,
    weights: Array1<f64>,
    id: FunctionalId,
    relative_step: f64,
    verbosity: Verbosity,
}

impl<E: ScalarEquationOfState> WeightedDensityFunctional<E> {
    pub fn new(
        eos: E,
        molecule: Molecule,
        attraction: &Arc<Kernel>,
        options: FunctionalOptions,
    ) -> FexResult<Self> {
        let (relative_step, verbosity) = options.unwrap_or(DEFAULT_RELATIVE_STEP);
        if !(relative_step.is_finite() && relative_step > 0.0) {
            return Err(FexError::invalid_parameter("relative step", relative_step));
        }
        let weights = molecule.lj_weights();
        Ok(Self {
            eos,
            molecule,
            attraction: attraction.clone(),
            weights,
            id: FunctionalId::default(),
            relative_step,
            verbosity,
        })
    }

    /// Set the identity used for correlation functions.
    pub fn with_id(mut self, id: FunctionalId) -> Self {
        self.id = id;
        self
    }

    pub fn eos(&self) -> &E {
        &self.eos
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub fn attraction(&self) -> &Arc<Kernel> {
        &self.attraction
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn id(&self) -> FunctionalId {
        self.id
    }

    fn check_channels(&self, channels: usize) -> FexResult<()> {
        if channels == self.weights.len() {
            Ok(())
        } else {
            Err(FexError::IncompatibleChannels(self.weights.len(), channels))
        }
    }

    /// Free energy and derivative of the equation of state on every grid point.
    fn evaluate_pointwise(&self, density: &ScalarField) -> FexResult<(ScalarField, ScalarField)> {
        let points = density.data().raw_dim();
        let mut a = Array3::zeros(points);
        let mut da = Array3::zeros(points);
        let f = |a: &mut f64, da: &mut f64, &n: &f64| (*a, *da) = self.eos.evaluate_unchecked(n);
        #[cfg(feature = "rayon")]
        Zip::from(&mut a).and(&mut da).and(density.data()).par_for_each(f);
        #[cfg(not(feature = "rayon"))]
        Zip::from(&mut a).and(&mut da).and(density.data()).for_each(f);

        let invalid = Zip::from(&a)
            .and(&da)
            .and(density.data())
            .fold(None::<f64>, |invalid, &a, &da, &n| {
                invalid.or((!(a.is_finite() && da.is_finite())).then_some(n))
            });
        if let Some(density) = invalid {
            return Err(FexError::DomainError {
                routine: format!("{}::compute", self.eos.name()),
                density,
            });
        }
        let grid = density.grid();
        Ok((ScalarField::new(grid, a)?, ScalarField::new(grid, da)?))
    }

    /// See [ExcessFunctional::compute].
    pub fn compute(
        &self,
        densities: &[ScalarFieldTilde],
        gradients: &mut [ScalarFieldTilde],
    ) -> FexResult<f64> {
        self.check_channels(densities.len())?;
        self.check_channels(gradients.len())?;
        let grid = self.attraction.grid();
        for field in densities.iter().chain(gradients.iter()) {
            if !field.grid().is_compatible(grid) {
                return Err(FexError::GridMismatch(format!("{} and {grid}", field.grid())));
            }
        }

        // averaged density
        let mut n_avg = ScalarFieldTilde::zeros(grid);
        for (&w, n) in self.weights.iter().zip(densities) {
            n_avg.scaled_add(w, n)?;
        }

        // weighted density seen by the equation of state
        let n_bar = n_avg.convolve(&self.attraction)?.inverse();
        let (a, da) = self.evaluate_pointwise(&n_bar)?;

        // adjoints of the transforms above in reverse order
        let oja = a.forward().overlap();
        let n_avg_real = n_avg.overlap().forward_adjoint();
        let mut grad = da
            .product(&n_avg_real)?
            .inverse_adjoint()
            .convolve(&self.attraction)?;
        grad.scaled_add(1.0, &oja)?;
        for (&w, g) in self.weights.iter().zip(gradients.iter_mut()) {
            g.scaled_add(w, &grad)?;
        }

        let energy = n_avg.dot(&oja)?;
        log_iter!(
            self.verbosity,
            "{:<20} | F = {:>22.15e} | weighted density in [{:.6e}, {:.6e}]",
            self.eos.name(),
            energy,
            n_bar.data().fold(f64::INFINITY, |m, &x| m.min(x)),
            n_bar.data().fold(f64::NEG_INFINITY, |m, &x| m.max(x))
        );
        Ok(energy)
    }

    fn averaged_density(&self, densities: &[f64]) -> FexResult<f64> {
        self.check_channels(densities.len())?;
        Ok(self.weights.iter().zip(densities).map(|(w, n)| w * n).sum())
    }

    /// Free energy density of the homogeneous fluid. The derivatives with
    /// respect to the site densities are added to `gradients`.
    pub fn accumulate_uniform(&self, densities: &[f64], gradients: &mut [f64]) -> FexResult<f64> {
        self.check_channels(gradients.len())?;
        let n_avg = self.averaged_density(densities)?;
        let (a, da) = self.eos.evaluate(n_avg)?;
        let common = a + n_avg * da;
        gradients
            .iter_mut()
            .zip(&self.weights)
            .for_each(|(g, w)| *g += w * common);
        Ok(n_avg * a)
    }

    /// See [ExcessFunctional::compute_uniform].
    pub fn compute_uniform(&self, densities: &[f64]) -> FexResult<(f64, Array1<f64>)> {
        let mut gradients = vec![0.0; self.weights.len()];
        let f = self.accumulate_uniform(densities, &mut gradients)?;
        Ok((f, Array1::from(gradients)))
    }

    /// See [ExcessFunctional::direct_correlations].
    pub fn direct_correlations(
        &self,
        densities: &[f64],
        accumulator: &dyn CorrelationAccumulator,
    ) -> FexResult<()> {
        let n_avg = self.averaged_density(densities)?;
        let (_, da) = self.eos.evaluate(n_avg)?;
        let d2a = numerical_second_derivative(&self.eos, n_avg, self.relative_step)?;
        log_result!(
            self.verbosity,
            "{}: averaged density {:.6e}, a' = {:.10e}, a'' = {:.10e}",
            self.eos.name(),
            n_avg,
            da,
            d2a
        );

        let kernel = self.attraction.data();
        let kernel2 = self.attraction.self_convolution();
        let c = Zip::from(kernel)
            .and(&kernel2)
            .map_collect(|&k, &k2| Complex64::from(2.0 * da * k + n_avg * d2a * k2));
        let c = ScalarFieldTilde::new(self.attraction.grid(), c)?;

        let n = self.weights.len();
        let pairs: Vec<_> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
        let accumulate = |&(i, j): &(usize, usize)| {
            let key = CorrelationKey::new(i, j, self.id);
            accumulator.accumulate(key, &(&c * (self.weights[i] * self.weights[j])))
        };
        #[cfg(feature = "rayon")]
        let result = pairs.par_iter().try_for_each(accumulate);
        #[cfg(not(feature = "rayon"))]
        let result = pairs.iter().try_for_each(accumulate);
        result
    }
}
