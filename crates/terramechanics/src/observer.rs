//! Diagnostic sink for the numeric core
//!
//! The stress field, integrator and line search report what they see through
//! [`StressObserver`] instead of logging directly, so the math stays pure and
//! tests can capture exactly what was emitted.

use std::cell::RefCell;

use log::{debug, trace, warn};

use crate::error::NumericDegeneracy;
use crate::line_search::SearchEvent;
use crate::stress::StressSample;

pub trait StressObserver {
    /// A radial/shear stress pair evaluated at `angle`.
    fn on_stress_sample(&self, _angle: f64, _sample: StressSample) {}

    /// A numeric breakdown that was replaced by its fallback value.
    fn on_degeneracy(&self, _degeneracy: NumericDegeneracy) {}

    fn on_search_event(&self, _event: SearchEvent) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl StressObserver for NullObserver {}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver {
    /// Per-sample stresses are noisy; off unless asked for
    pub log_samples: bool,
}

impl LogObserver {
    pub fn new(log_samples: bool) -> Self {
        LogObserver { log_samples }
    }
}

impl StressObserver for LogObserver {
    fn on_stress_sample(&self, angle: f64, sample: StressSample) {
        if self.log_samples {
            trace!(
                "theta={:.5} rad sigma={:.6e} Pa tau={:.6e} Pa",
                angle,
                sample.radial,
                sample.shear
            );
        }
    }

    fn on_degeneracy(&self, degeneracy: NumericDegeneracy) {
        warn!("numeric degeneracy, using fallback: {degeneracy}");
    }

    fn on_search_event(&self, event: SearchEvent) {
        match event {
            SearchEvent::NoDescent { step } => {
                warn!("line search found no descent direction, last step {step:.5} rad")
            }
            SearchEvent::Unbracketed { bracket } => {
                warn!("line search did not bracket a minimum, continuing with {bracket:?}")
            }
            SearchEvent::MaxIterationsReached { estimate } => {
                warn!("line search hit its iteration cap at {estimate:.5} rad")
            }
            other => debug!("line search: {other:?}"),
        }
    }
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub samples: RefCell<Vec<(f64, StressSample)>>,
    pub degeneracies: RefCell<Vec<NumericDegeneracy>>,
    pub search_events: RefCell<Vec<SearchEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.samples.borrow_mut().clear();
        self.degeneracies.borrow_mut().clear();
        self.search_events.borrow_mut().clear();
    }
}

impl StressObserver for RecordingObserver {
    fn on_stress_sample(&self, angle: f64, sample: StressSample) {
        self.samples.borrow_mut().push((angle, sample));
    }

    fn on_degeneracy(&self, degeneracy: NumericDegeneracy) {
        self.degeneracies.borrow_mut().push(degeneracy);
    }

    fn on_search_event(&self, event: SearchEvent) {
        self.search_events.borrow_mut().push(event);
    }
}
