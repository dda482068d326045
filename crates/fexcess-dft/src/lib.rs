//! Weighted-density excess free energy functionals on periodic grids.
#![warn(clippy::all)]
#![warn(clippy::allow_attributes)]

mod correlation;
mod eos;
mod field;
mod functional;
mod grid;
mod kernel;
mod molecule;

pub use correlation::{
    min_relative_step, numerical_second_derivative, CorrelationAccumulator, CorrelationKey,
    CorrelationStore, FunctionalId,
};
pub use eos::ScalarEquationOfState;
pub use field::{ScalarField, ScalarFieldTilde};
pub use functional::{ExcessFunctional, WeightedDensityFunctional};
pub use grid::PeriodicGrid;
pub use kernel::{Kernel, KernelShape};
pub use molecule::{Molecule, Site};
