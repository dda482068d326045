use crate::eos::ScalarEquationOfState;
use crate::field::ScalarFieldTilde;
use fexcess_core::{FexError, FexResult};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::sync::{Mutex, PoisonError, RwLock};

/// Smallest density step of the numerical second derivative relative to
/// [ScalarEquationOfState::density_scale].
///
/// The cube root of the machine precision balances the truncation error of
/// a second-order difference against the cancellation in the difference of
/// the first derivatives.
pub fn min_relative_step() -> f64 {
    f64::EPSILON.cbrt()
}

/// Identity of a functional within a mixture of functionals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionalId(pub usize);

/// Storage slot of a pair correlation: an unordered pair of density
/// channels and the functional that contributes to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationKey {
    pub i: usize,
    pub j: usize,
    pub functional: FunctionalId,
}

impl CorrelationKey {
    /// Create a new key. The pair is stored with `i <= j`.
    pub fn new(i: usize, j: usize, functional: FunctionalId) -> Self {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        Self { i, j, functional }
    }
}

/// Host-owned storage of direct correlation functions.
///
/// Functionals only add to the storage, they never read from it. Implementations
/// have to support concurrent accumulation from multiple functionals.
pub trait CorrelationAccumulator: Sync {
    /// Add `contribution` to the slot identified by `key`.
    fn accumulate(&self, key: CorrelationKey, contribution: &ScalarFieldTilde) -> FexResult<()>;
}

fn poisoned<T>(_: PoisonError<T>) -> FexError {
    FexError::Error("correlation storage is poisoned".into())
}

/// Default [CorrelationAccumulator] with one lock per slot.
#[derive(Debug, Default)]
pub struct CorrelationStore {
    slots: RwLock<IndexMap<CorrelationKey, Mutex<ScalarFieldTilde>>>,
}

impl CorrelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the correlation between channels `i` and `j`.
    pub fn get(
        &self,
        i: usize,
        j: usize,
        functional: FunctionalId,
    ) -> FexResult<Option<ScalarFieldTilde>> {
        let slots = self.slots.read().map_err(poisoned)?;
        slots
            .get(&CorrelationKey::new(i, j, functional))
            .map(|slot| slot.lock().map(|c| c.clone()).map_err(poisoned))
            .transpose()
    }

    /// All occupied slots in the order of their first accumulation.
    pub fn keys(&self) -> FexResult<Vec<CorrelationKey>> {
        Ok(self.slots.read().map_err(poisoned)?.keys().copied().collect())
    }

    pub fn len(&self) -> FexResult<usize> {
        Ok(self.slots.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> FexResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl CorrelationAccumulator for CorrelationStore {
    fn accumulate(&self, key: CorrelationKey, contribution: &ScalarFieldTilde) -> FexResult<()> {
        let key = CorrelationKey::new(key.i, key.j, key.functional);
        {
            let slots = self.slots.read().map_err(poisoned)?;
            if let Some(slot) = slots.get(&key) {
                return slot.lock().map_err(poisoned)?.scaled_add(1.0, contribution);
            }
        }
        let mut slots = self.slots.write().map_err(poisoned)?;
        match slots.entry(key) {
            Entry::Occupied(mut slot) => slot
                .get_mut()
                .get_mut()
                .map_err(poisoned)?
                .scaled_add(1.0, contribution),
            Entry::Vacant(slot) => {
                slot.insert(Mutex::new(contribution.clone()));
                Ok(())
            }
        }
    }
}

/// Second density derivative of the free energy per molecule from a
/// difference of the exact first derivative.
///
/// The step is `relative_step` times the density, bounded from below by
/// [min_relative_step] times the density scale of the equation of state.
/// If the centered stencil would reach below zero density, a one-sided
/// second-order stencil starting at `density` is used instead.
pub fn numerical_second_derivative<E: ScalarEquationOfState>(
    eos: &E,
    density: f64,
    relative_step: f64,
) -> FexResult<f64> {
    let step = (density * relative_step).max(min_relative_step() * eos.density_scale());
    let (_, da_upper) = eos.evaluate(density + step)?;
    if density >= step {
        let (_, da_lower) = eos.evaluate(density - step)?;
        return Ok((da_upper - da_lower) / (2.0 * step));
    }
    let (_, da) = eos.evaluate(density)?;
    let (_, da_upper2) = eos.evaluate(density + 2.0 * step)?;
    Ok((4.0 * da_upper - 3.0 * da - da_upper2) / (2.0 * step))
}
