#![warn(clippy::all)]
#![warn(clippy::allow_attributes)]
use quantity::{Quantity, SIUnit};
use std::ops::{Div, Mul};
use typenum::Integer;

/// Print messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Iter {
            println!($($arg)*);
        }
    }
}

/// Print messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Result {
            println!($($arg)*);
        }
    }
}

mod errors;
pub mod parameter;
pub use errors::{FexError, FexResult};

/// Level of detail in the diagnostic output of a functional.
#[derive(Copy, Clone, Debug, Default, PartialOrd, PartialEq, Eq)]
pub enum Verbosity {
    /// Do not print output.
    #[default]
    None,
    /// Print bulk quantities used to build correlation functions.
    Result,
    /// Print a summary for every functional evaluation.
    Iter,
}

/// Default relative step of the centered difference used for
/// second density derivatives.
pub const DEFAULT_RELATIVE_STEP: f64 = 1e-7;

/// Options for the evaluation of excess functionals.
///
/// If the values are [None], functional specific default
/// values are used.
#[derive(Copy, Clone, Debug, Default)]
pub struct FunctionalOptions {
    /// Relative step size of the numerical second derivative.
    pub relative_step: Option<f64>,
    /// Diagnostic output indicated by the [Verbosity] enum.
    pub verbosity: Verbosity,
}

impl From<(Option<f64>, Option<Verbosity>)> for FunctionalOptions {
    fn from(options: (Option<f64>, Option<Verbosity>)) -> Self {
        Self {
            relative_step: options.0,
            verbosity: options.1.unwrap_or(Verbosity::None),
        }
    }
}

impl FunctionalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relative_step(mut self, relative_step: f64) -> Self {
        self.relative_step = Some(relative_step);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn unwrap_or(self, relative_step: f64) -> (f64, Verbosity) {
        (self.relative_step.unwrap_or(relative_step), self.verbosity)
    }
}

// SI value of one reduced unit for every base dimension of `SIUnit`.
// The mass unit follows from energies in k_B K, lengths in Å and times in ps.
const TIME_UNIT: f64 = 1e-12;
const LENGTH_UNIT: f64 = 1e-10;
const MASS_UNIT: f64 = 1.380649e-27;
const CURRENT_UNIT: f64 = 1.0;
const TEMPERATURE_UNIT: f64 = 1.0;
const AMOUNT_UNIT: f64 = 1.0 / 6.02214076e23;
const LUMINOSITY_UNIT: f64 = 1.0;

/// Integer power by squaring, usable in constants.
const fn ipow(x: f64, n: i32) -> f64 {
    let (mut base, mut n) = if n < 0 { (1.0 / x, -n) } else { (x, n) };
    let mut result = 1.0;
    while n > 0 {
        if n % 2 == 1 {
            result *= base;
        }
        base *= base;
        n /= 2;
    }
    result
}

/// Quantities that can be expressed in the units the functionals work in:
/// Å, K, energies in k_B K and numbers of molecules.
pub trait ReducedUnits {
    type Inner;
    /// SI value of one reduced unit of this quantity.
    const SCALE: f64;

    fn from_reduced(value: Self::Inner) -> Self
    where
        Self::Inner: Mul<f64, Output = Self::Inner>;

    fn to_reduced(&self) -> Self::Inner
    where
        for<'a> &'a Self::Inner: Div<f64, Output = Self::Inner>;
}

impl<Inner, T: Integer, L: Integer, M: Integer, I: Integer, THETA: Integer, N: Integer, J: Integer>
    ReducedUnits for Quantity<Inner, SIUnit<T, L, M, I, THETA, N, J>>
{
    type Inner = Inner;
    const SCALE: f64 = ipow(TIME_UNIT, T::I32)
        * ipow(LENGTH_UNIT, L::I32)
        * ipow(MASS_UNIT, M::I32)
        * ipow(CURRENT_UNIT, I::I32)
        * ipow(TEMPERATURE_UNIT, THETA::I32)
        * ipow(AMOUNT_UNIT, N::I32)
        * ipow(LUMINOSITY_UNIT, J::I32);

    fn from_reduced(value: Inner) -> Self
    where
        Inner: Mul<f64, Output = Inner>,
    {
        Self::new(value * Self::SCALE)
    }

    fn to_reduced(&self) -> Inner
    where
        for<'a> &'a Inner: Div<f64, Output = Inner>,
    {
        self.convert_to(Quantity::new(Self::SCALE))
    }
}
