//! fexcess - Excess free energy functionals of molecular solvents for classical density functional theory.
//!
//! # Example: free energy of bulk water
//!
//! ```
//! # use fexcess::core::FexError;
//! use fexcess::dft::{ExcessFunctional, PeriodicGrid};
//! use fexcess::water::ScalarEosFunctional;
//! use quantity::{ANGSTROM, KELVIN};
//!
//! let grid = PeriodicGrid::new_cubic(16.0 * ANGSTROM, 16)?;
//! let functional = ScalarEosFunctional::new(&grid, 298.15 * KELVIN, true)?;
//!
//! // oxygen and hydrogen site densities of liquid water in 1/Å³
//! let n = 0.0334;
//! let (free_energy_density, gradient) = functional.compute_uniform(&[n, 2.0 * n])?;
//! println!("f = {free_energy_density} K/Å³, df/dn = {gradient}");
//! # Ok::<(), FexError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::allow_attributes)]

pub mod water;

pub mod core {
    //! Re-export of all functionalities in [fexcess_core].
    pub use fexcess_core::*;
}

pub mod dft {
    //! Re-export of all functionalities in [fexcess_dft].
    pub use fexcess_dft::*;
}
