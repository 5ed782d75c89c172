//! Collection of per-target outcomes.

use std::collections::btree_map::{BTreeMap, Entry};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{ProbeOutcome, Report};

/// Task-safe collector of one outcome per target.
///
/// Tasks finish in any order; each records its outcome under the input index
/// of its target, and [`ResultAggregator::take_report`] restores input order.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outcomes: Mutex<BTreeMap<usize, ProbeOutcome>>,
}

impl ResultAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<usize, ProbeOutcome>> {
        // Outcomes are inserted whole, so a poisoned map is still consistent
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the outcome of the target at `index`.
    ///
    /// Returns false (and keeps the first outcome) if `index` was already
    /// recorded.
    pub fn record(&self, index: usize, outcome: ProbeOutcome) -> bool {
        match self.lock().entry(index) {
            Entry::Vacant(slot) => {
                slot.insert(outcome);
                true
            }
            Entry::Occupied(_) => {
                log::warn!(
                    "Duplicate outcome for target #{index} ({}) ignored",
                    outcome.target().url()
                );
                false
            }
        }
    }

    /// Number of outcomes recorded so far.
    pub fn completed(&self) -> usize {
        self.lock().len()
    }

    /// Takes every recorded outcome, in input order.
    ///
    /// Called once all tasks are done; the aggregator is empty afterwards.
    pub fn take_report(&self) -> Report {
        let outcomes = std::mem::take(&mut *self.lock());
        Report::new(outcomes.into_values().collect())
    }
}
