//! Scalar equation of state functional of water.
//!
//! The functional treats the oxygen and hydrogen site densities of a rigid
//! three-site water molecule. Their weighted average is smoothed with a
//! Lennard-Jones attraction kernel and evaluated with a scalar equation of
//! state that reproduces the bulk properties of liquid water.
mod eos;
mod functional;
mod parameters;

pub use eos::WaterEos;
pub use functional::{water_molecule, ScalarEosFunctional};
pub use parameters::{water_parameters_from_json, ScalarEosRecord, WaterParameters, WaterRecord};
