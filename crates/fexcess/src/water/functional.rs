use super::eos::WaterEos;
use super::parameters::WaterRecord;
use fexcess_core::{FexError, FexResult, FunctionalOptions};
use fexcess_dft::{
    CorrelationAccumulator, ExcessFunctional, FunctionalId, Kernel, Molecule, PeriodicGrid,
    ScalarEquationOfState, ScalarFieldTilde, Site, WeightedDensityFunctional,
};
use ndarray::Array1;
use quantity::Temperature;
use std::f64::consts::{PI, SQRT_2};
use std::fmt;
use std::sync::Arc;

/// Lennard-Jones weights are scaled with this factor for non-polarizable water.
const NON_POLARIZABLE_SCALING: f64 = 1e-6;

/// Rigid three-site water molecule.
///
/// The oxygen site sits at the origin, the hydrogen sites in the yz-plane.
/// Oxygen carries the hard sphere radius of the equation of state.
pub fn water_molecule(
    record: &WaterRecord,
    hard_sphere_radius: f64,
    charge_kernel: &Arc<Kernel>,
    polarizable: bool,
) -> FexResult<Molecule> {
    let r = record.bond_length;
    if !(r.is_finite() && r > 0.0) {
        return Err(FexError::invalid_parameter("bond length", r));
    }
    let theta = record.bond_angle;
    if !(theta > 0.0 && theta <= 180.0) {
        return Err(FexError::invalid_parameter("bond angle", theta));
    }
    let (sin, cos) = (0.5 * theta.to_radians()).sin_cos();
    let scaling = if polarizable {
        1.0
    } else {
        NON_POLARIZABLE_SCALING
    };

    let oxygen = Site::new(
        "O",
        record.oxygen_charge,
        record.oxygen_lj_weight * scaling,
        hard_sphere_radius,
        charge_kernel,
        vec![[0.0; 3]],
    )?;
    let hydrogen = Site::new(
        "H",
        record.hydrogen_charge,
        record.hydrogen_lj_weight * scaling,
        0.0,
        charge_kernel,
        vec![[0.0, -r * sin, r * cos], [0.0, r * sin, r * cos]],
    )?;
    Molecule::new("H2O", vec![oxygen, hydrogen])
}

/// Excess functional of water based on a scalar equation of state
/// evaluated at a weighted density.
///
/// The density channels are the oxygen and the hydrogen site densities.
pub struct ScalarEosFunctional {
    record: WaterRecord,
    polarizable: bool,
    dielectric_scaling: f64,
    functional: WeightedDensityFunctional<WaterEos>,
}

impl ScalarEosFunctional {
    /// Water functional with the default parameters.
    pub fn new(
        grid: &Arc<PeriodicGrid>,
        temperature: Temperature,
        polarizable: bool,
    ) -> FexResult<Self> {
        Self::with_parameters(
            grid,
            temperature,
            &WaterRecord::default(),
            polarizable,
            FunctionalOptions::default(),
        )
    }

    pub fn with_parameters(
        grid: &Arc<PeriodicGrid>,
        temperature: Temperature,
        record: &WaterRecord,
        polarizable: bool,
        options: FunctionalOptions,
    ) -> FexResult<Self> {
        let eos = WaterEos::new(&record.eos, temperature)?;
        let radius = eos.hard_sphere_radius();
        let dielectric_scaling = 1.0 - eos.temperature() / record.dielectric_temperature;

        let charge_kernel = Arc::new(Kernel::charge(grid, record.charge_width)?);
        let molecule = water_molecule(record, radius, &charge_kernel, polarizable)?;

        // normalized to one at k = 0
        let sigma = 2.0 * radius;
        let amplitude = -9.0 / (32.0 * SQRT_2 * PI * sigma.powi(3));
        let attraction = Arc::new(Kernel::attraction(grid, amplitude, sigma)?);

        let functional = WeightedDensityFunctional::new(eos, molecule, &attraction, options)?;
        Ok(Self {
            record: record.clone(),
            polarizable,
            dielectric_scaling,
            functional,
        })
    }

    pub fn with_id(mut self, id: FunctionalId) -> Self {
        self.functional = self.functional.with_id(id);
        self
    }

    pub fn record(&self) -> &WaterRecord {
        &self.record
    }

    pub fn polarizable(&self) -> bool {
        self.polarizable
    }

    pub fn eos(&self) -> &WaterEos {
        self.functional.eos()
    }

    pub fn attraction_kernel(&self) -> &Arc<Kernel> {
        self.functional.attraction()
    }

    /// Averaging weights of the oxygen and hydrogen densities.
    pub fn weights(&self) -> &Array1<f64> {
        self.functional.weights()
    }

    /// Free energy density of the homogeneous fluid, adding the derivatives to `gradients`.
    pub fn accumulate_uniform(&self, densities: &[f64], gradients: &mut [f64]) -> FexResult<f64> {
        self.functional.accumulate_uniform(densities, gradients)
    }
}

impl ExcessFunctional for ScalarEosFunctional {
    fn name(&self) -> &'static str {
        "ScalarEOS"
    }

    fn id(&self) -> FunctionalId {
        self.functional.id()
    }

    fn molecule(&self) -> &Molecule {
        self.functional.molecule()
    }

    fn compute(
        &self,
        densities: &[ScalarFieldTilde],
        gradients: &mut [ScalarFieldTilde],
    ) -> FexResult<f64> {
        self.functional.compute(densities, gradients)
    }

    fn compute_uniform(&self, densities: &[f64]) -> FexResult<(f64, Array1<f64>)> {
        self.functional.compute_uniform(densities)
    }

    fn direct_correlations(
        &self,
        densities: &[f64],
        accumulator: &dyn CorrelationAccumulator,
    ) -> FexResult<()> {
        self.functional.direct_correlations(densities, accumulator)
    }

    fn dielectric_scaling(&self) -> f64 {
        self.dielectric_scaling
    }

    fn characteristic_radius(&self) -> f64 {
        self.eos().characteristic_radius()
    }
}

impl fmt::Display for ScalarEosFunctional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScalarEosFunctional(T={} K, polarizable={}, {})",
            self.eos().temperature(),
            self.polarizable,
            self.molecule()
        )
    }
}
