//! Caller-owned calibration context
//!
//! Multiplexes several named observation points over one statistics store.
//! The context is an explicit object owned by the caller, not a hidden
//! global registry; it requires single-writer discipline (no concurrent
//! registration or recording), while per-point state stays independent.

use std::collections::HashMap;

use ndarray::ArrayD;

use crate::error::{CalibrationError, Result};
use crate::observer::Observer;
use crate::qparams::QParams;

/// Map from observation-point name to its observer.
///
/// Feeding a tensor to a named point updates that point's statistics and
/// passes the tensor through unchanged, so recording can be inserted into a
/// computation pipeline without altering its result.
#[derive(Debug, Default)]
pub struct CalibrationContext {
    observers: HashMap<String, Box<dyn Observer>>,
}

impl CalibrationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer under an observation-point name, replacing any
    /// previous observer at that point.
    pub fn register(&mut self, name: impl Into<String>, observer: Box<dyn Observer>) {
        self.observers.insert(name.into(), observer);
    }

    /// Feed a tensor to a named observation point and return it unchanged.
    /// Tensors recorded at unregistered points pass through without being
    /// observed.
    pub fn record<'a>(&mut self, name: &str, x: &'a ArrayD<f32>) -> &'a ArrayD<f32> {
        if let Some(observer) = self.observers.get_mut(name) {
            observer.observe(x);
        }
        x
    }

    /// Derive quantization parameters for one observation point, recomputed
    /// fresh from its current statistics.
    ///
    /// # Errors
    ///
    /// * `UnknownObservationPoint` if no observer is registered under `name`
    /// * Any error from the observer's own `calculate_qparams`
    pub fn qparams(&mut self, name: &str) -> Result<QParams> {
        self.observers
            .get_mut(name)
            .ok_or_else(|| CalibrationError::UnknownObservationPoint(name.to_string()))?
            .calculate_qparams()
    }

    /// Derive quantization parameters for every registered observation point.
    /// Fails on the first observer that cannot produce parameters.
    pub fn qparams_all(&mut self) -> Result<HashMap<String, QParams>> {
        let mut all = HashMap::with_capacity(self.observers.len());
        for (name, observer) in &mut self.observers {
            all.insert(name.clone(), observer.calculate_qparams()?);
        }
        Ok(all)
    }

    /// Borrow the observer registered under `name`.
    pub fn observer(&self, name: &str) -> Option<&dyn Observer> {
        self.observers.get(name).map(|observer| &**observer)
    }

    /// Mutably borrow the observer registered under `name`.
    pub fn observer_mut(&mut self, name: &str) -> Option<&mut (dyn Observer + 'static)> {
        self.observers.get_mut(name).map(|observer| &mut **observer)
    }

    /// Names of all registered observation points.
    pub fn names(&self) -> Vec<&String> {
        self.observers.keys().collect()
    }

    /// Number of registered observation points.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if no observation points are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Clear the statistics of every registered observer. Registrations are
    /// kept.
    pub fn reset(&mut self) {
        for observer in self.observers.values_mut() {
            observer.reset();
        }
    }
}
