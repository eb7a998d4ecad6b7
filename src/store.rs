//! Reactive parameter store.
//!
//! Holds the current filter snapshot and notifies subscribers when it
//! changes, so the filter and marker stages re-run with fresh values.
//! Single-threaded by design: mutation and recomputation happen on the
//! same logical thread of control, so there is no locking.

use tracing::debug;

use crate::filters::FilterParams;

type Subscriber = Box<dyn FnMut(FilterParams)>;

/// Owner of the current [`FilterParams`] snapshot.
pub struct ParameterStore {
    params: FilterParams,
    subscribers: Vec<Subscriber>,
}

impl ParameterStore {
    /// Create a store with an initial snapshot. Subscribers registered
    /// later are not called until a change or an explicit [`refresh`].
    ///
    /// [`refresh`]: Self::refresh
    #[must_use]
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            subscribers: Vec::new(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Register a callback invoked with each new snapshot.
    pub fn subscribe(&mut self, subscriber: impl FnMut(FilterParams) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Replace the snapshot, notifying subscribers if it changed.
    pub fn set_params(&mut self, params: FilterParams) {
        if params == self.params {
            return;
        }
        self.params = params;
        self.notify();
    }

    /// Update the magnitude floor.
    pub fn set_min_magnitude(&mut self, min_magnitude: f64) {
        self.set_params(FilterParams {
            min_magnitude,
            ..self.params
        });
    }

    /// Update the inclusive year range.
    pub fn set_year_range(&mut self, year_start: i32, year_end: i32) {
        self.set_params(FilterParams {
            year_start,
            year_end,
            ..self.params
        });
    }

    /// Notify subscribers with the current snapshot without changing it.
    ///
    /// Used for the initial render, before any parameter has moved.
    pub fn refresh(&mut self) {
        self.notify();
    }

    fn notify(&mut self) {
        debug!(
            "parameters changed: min_magnitude={}, years={}..={}",
            self.params.min_magnitude, self.params.year_start, self.params.year_end
        );
        let params = self.params;
        for subscriber in &mut self.subscribers {
            subscriber(params);
        }
    }
}
