use super::parameters::ScalarEosRecord;
use fexcess_core::{FexError, FexResult, ReducedUnits};
use fexcess_dft::ScalarEquationOfState;
use num_dual::DualNum;
use quantity::{Temperature, METER, MOL};
use std::f64::consts::PI;

/// Scalar equation of state of water.
///
/// The excess free energy per molecule combines a temperature dependent
/// excluded volume $b(T)$ and second virial coefficient $B_2(T)$ with a
/// hydrogen bonding term that is active in a density window around the
/// liquid density:
/// $$\frac{a}{T}=(B_2-\alpha)n-\frac{\alpha}{\lambda b}\ln(1-\lambda bn)+\frac{p_\mathrm{HB}}{T}\left(h(n)-h(0)\right)$$
/// with $h(n)=\left(1+Ce^{((n-n_\mathrm{HB})/\Delta n_\mathrm{HB})^2}\right)^{-1}$.
#[derive(Clone, Debug)]
pub struct WaterEos {
    record: ScalarEosRecord,
    temperature: f64,
    excluded_volume: f64,
    alpha: f64,
    second_virial_coefficient: f64,
    hbond_prefactor: f64,
    hbond_offset: f64,
}

impl WaterEos {
    pub fn new(record: &ScalarEosRecord, temperature: Temperature) -> FexResult<Self> {
        Self::new_reduced(record, temperature.to_reduced())
    }

    /// Evaluate the temperature dependent coefficients at `temperature` in Kelvin.
    pub fn new_reduced(record: &ScalarEosRecord, temperature: f64) -> FexResult<Self> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(FexError::invalid_parameter("temperature", temperature));
        }
        let t_b = record.boyle_temperature;
        let v_b = (record.boyle_volume * METER * METER * METER / MOL).to_reduced();
        let [a1, a2] = record.excluded_volume_amplitudes;
        let [c1, c2] = record.excluded_volume_exponents;
        let tau = temperature / t_b;
        let x = (t_b / temperature).powf(0.25);

        let excluded_volume = v_b
            * (a1 * (1.0 - c1 * tau) * (-c1 * tau).exp()
                + a2 * (1.0 - (1.0 + 0.25 * c2 * x) * (-c2 * x).exp()));
        let alpha = v_b * (a1 * (-c1 * tau).exp() + a2 * (1.0 - (-c2 * x).exp()));
        let eps = record.virial_well_depth;
        let second_virial_coefficient =
            v_b * (1.0 - ((eps / temperature).exp() - 1.0) / ((eps / t_b).exp() - 1.0));
        let omega = record.hbond_entropy_weight;
        let hbond_prefactor = -2.0
            * temperature
            * ((1.0 + omega * (record.hbond_energy / temperature).exp()) / (1.0 + omega)).ln();

        if !(excluded_volume > 0.0 && record.lambda > 0.0) {
            return Err(FexError::invalid_parameter(
                "excluded volume",
                excluded_volume * record.lambda,
            ));
        }

        let mut eos = Self {
            record: record.clone(),
            temperature,
            excluded_volume,
            alpha,
            second_virial_coefficient,
            hbond_prefactor,
            hbond_offset: 0.0,
        };
        eos.hbond_offset = eos.hbond_switch(0.0);
        Ok(eos)
    }

    fn hbond_switch<D: DualNum<f64> + Copy>(&self, density: D) -> D {
        let r = &self.record;
        let arg = (density - r.hbond_density) / r.hbond_density_width;
        (arg.powi(2).exp() * r.hbond_switching_amplitude + 1.0).recip()
    }

    /// Temperature dependent excluded volume in units of Å³.
    pub fn excluded_volume(&self) -> f64 {
        self.excluded_volume
    }

    /// Second virial coefficient in units of Å³.
    pub fn second_virial_coefficient(&self) -> f64 {
        self.second_virial_coefficient
    }

    /// Upper limit of the density domain in units of 1/Å³.
    pub fn max_density(&self) -> f64 {
        1.0 / (self.record.lambda * self.excluded_volume)
    }
}

impl ScalarEquationOfState for WaterEos {
    fn name(&self) -> &'static str {
        "ScalarEOS(water)"
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn free_energy_per_molecule<D: DualNum<f64> + Copy>(&self, density: D) -> D {
        let lb = self.record.lambda * self.excluded_volume;
        let repulsion = density * (self.second_virial_coefficient - self.alpha)
            - (-density * lb).ln_1p() * (self.alpha / lb);
        let hbond = (self.hbond_switch(density) - self.hbond_offset) * self.hbond_prefactor;
        repulsion * self.temperature + hbond
    }

    /// Radius of the sphere whose excluded volume equals $b(T)$.
    fn hard_sphere_radius(&self) -> f64 {
        (3.0 * self.excluded_volume / (16.0 * PI)).cbrt()
    }

    fn density_scale(&self) -> f64 {
        self.max_density()
    }
}
