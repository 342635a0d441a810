//! Shared global-best state.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// A snapshot of the swarm's best order and its cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalBest {
    pub order: Vec<usize>,
    pub cost: f64,
}

/// The only mutable state shared between workers.
///
/// The best order and cost sit behind one lock and can only change through
/// [`compare_and_update`](SwarmState::compare_and_update), which re-checks
/// the cost and writes inside the same critical section. The best cost
/// never increases.
#[derive(Debug)]
pub struct SwarmState {
    best: Mutex<GlobalBest>,
    faults: AtomicUsize,
}

impl SwarmState {
    /// Seeds the state with an initial best.
    pub fn new(order: Vec<usize>, cost: f64) -> Self {
        Self {
            best: Mutex::new(GlobalBest { order, cost }),
            faults: AtomicUsize::new(0),
        }
    }

    /// Replaces the global best with `candidate` iff `cost` is strictly
    /// lower. Returns whether the replacement happened.
    pub fn compare_and_update(&self, candidate: &[usize], cost: f64) -> bool {
        let mut best = self.best.lock();
        if cost < best.cost {
            best.order.clear();
            best.order.extend_from_slice(candidate);
            best.cost = cost;
            true
        } else {
            false
        }
    }

    /// Copy of the current best.
    pub fn snapshot(&self) -> GlobalBest {
        self.best.lock().clone()
    }

    /// Current best cost.
    pub fn best_cost(&self) -> f64 {
        self.best.lock().cost
    }

    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of rejected candidates that failed the permutation check.
    pub fn consistency_faults(&self) -> usize {
        self.faults.load(Ordering::Relaxed)
    }

    /// Consumes the state and returns the final best.
    pub fn into_best(self) -> GlobalBest {
        self.best.into_inner()
    }
}
