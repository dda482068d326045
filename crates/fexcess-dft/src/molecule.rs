use crate::kernel::Kernel;
use fexcess_core::{FexError, FexResult};
use ndarray::Array1;
use std::fmt;
use std::sync::Arc;

/// A site type of a rigid molecule.
///
/// Every site type corresponds to one density channel. Equivalent sites
/// (e.g. the two hydrogens of water) share a site type and differ only
/// in their position.
#[derive(Clone, Debug)]
pub struct Site {
    /// Name of the site type
    pub name: String,
    /// Partial charge in units of the elementary charge
    pub charge: f64,
    /// Lennard-Jones weight (well depth or polarizability) of a single site
    pub lj_weight: f64,
    /// Hard sphere radius in units of Angstrom (0 for sites without excluded volume)
    pub hard_sphere_radius: f64,
    /// Smearing kernel of the partial charge
    pub charge_kernel: Arc<Kernel>,
    /// Positions relative to the molecular origin in units of Angstrom
    pub positions: Vec<[f64; 3]>,
}

impl Site {
    pub fn new<S: Into<String>>(
        name: S,
        charge: f64,
        lj_weight: f64,
        hard_sphere_radius: f64,
        charge_kernel: &Arc<Kernel>,
        positions: Vec<[f64; 3]>,
    ) -> FexResult<Self> {
        let name = name.into();
        if !charge.is_finite() {
            return Err(FexError::invalid_parameter(format!("charge of {name}"), charge));
        }
        if !(lj_weight.is_finite() && lj_weight >= 0.0) {
            return Err(FexError::invalid_parameter(
                format!("Lennard-Jones weight of {name}"),
                lj_weight,
            ));
        }
        if !(hard_sphere_radius.is_finite() && hard_sphere_radius >= 0.0) {
            return Err(FexError::invalid_parameter(
                format!("hard sphere radius of {name}"),
                hard_sphere_radius,
            ));
        }
        if positions.is_empty() {
            return Err(FexError::Error(format!("Site {name} has no positions.")));
        }
        Ok(Self {
            name,
            charge,
            lj_weight,
            hard_sphere_radius,
            charge_kernel: charge_kernel.clone(),
            positions,
        })
    }

    /// Number of equivalent sites of this type in the molecule.
    pub fn multiplicity(&self) -> usize {
        self.positions.len()
    }
}

/// Rigid molecule built from a list of site types.
#[derive(Clone, Debug)]
pub struct Molecule {
    pub name: String,
    sites: Vec<Site>,
}

impl Molecule {
    pub fn new<S: Into<String>>(name: S, sites: Vec<Site>) -> FexResult<Self> {
        let name = name.into();
        if sites.is_empty() {
            return Err(FexError::Error(format!("Molecule {name} has no sites.")));
        }
        let molecule = Self { name, sites };
        if molecule.total_lj_weight() <= 0.0 {
            return Err(FexError::invalid_parameter(
                format!("total Lennard-Jones weight of {}", molecule.name),
                molecule.total_lj_weight(),
            ));
        }
        Ok(molecule)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Number of density channels (site types).
    pub fn channels(&self) -> usize {
        self.sites.len()
    }

    /// Number of sites including equivalent sites.
    pub fn site_count(&self) -> usize {
        self.sites.iter().map(Site::multiplicity).sum()
    }

    pub fn multiplicities(&self) -> Array1<f64> {
        self.sites.iter().map(|s| s.multiplicity() as f64).collect()
    }

    fn total_lj_weight(&self) -> f64 {
        self.sites
            .iter()
            .map(|s| s.lj_weight * s.multiplicity() as f64)
            .sum()
    }

    /// Weights used to build the averaged density from the site densities.
    ///
    /// The weights are normalized such that the site densities of a
    /// homogeneous fluid with molecular density $n$ average to $n$.
    pub fn lj_weights(&self) -> Array1<f64> {
        let total = self.total_lj_weight();
        self.sites.iter().map(|s| s.lj_weight / total).collect()
    }

    /// Net charge of the molecule.
    pub fn total_charge(&self) -> f64 {
        self.sites
            .iter()
            .map(|s| s.charge * s.multiplicity() as f64)
            .sum()
    }

    /// Dipole moment in units of e Å.
    pub fn dipole_moment(&self) -> [f64; 3] {
        let mut mu = [0.0; 3];
        for s in &self.sites {
            for p in &s.positions {
                mu.iter_mut().zip(p).for_each(|(m, x)| *m += s.charge * x);
            }
        }
        mu
    }

    /// Largest hard sphere radius of all sites.
    pub fn hard_sphere_radius(&self) -> f64 {
        self.sites
            .iter()
            .map(|s| s.hard_sphere_radius)
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Molecule({}", self.name)?;
        for s in &self.sites {
            write!(f, ", {}x{} (q={})", s.multiplicity(), s.name, s.charge)?;
        }
        write!(f, ")")
    }
}
