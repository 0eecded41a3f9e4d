//! Phase change history.
//!
//! Coordinators record every phase change together with the host timestamp
//! and the transition id that caused it. The history is bounded so a
//! long-running page does not grow it without limit.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of phase changes retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of a single phase change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseChange<S: State> {
    /// The phase being left
    pub from: S,
    /// The phase being entered
    pub to: S,
    /// Host timestamp of the change
    pub at: Duration,
    /// Transition id that owned the change
    pub transition_id: u64,
}

/// Ordered, bounded history of phase changes.
///
/// When full, the oldest entry is dropped.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use themewipe::core::{PhaseChange, StateHistory};
/// use themewipe::route_fade::RoutePhase;
///
/// let mut history = StateHistory::new();
/// history.record(PhaseChange {
///     from: RoutePhase::Idle,
///     to: RoutePhase::Pausing,
///     at: Duration::from_millis(10),
///     transition_id: 1,
/// });
/// history.record(PhaseChange {
///     from: RoutePhase::Pausing,
///     to: RoutePhase::FadingIn,
///     at: Duration::from_millis(510),
///     transition_id: 1,
/// });
///
/// assert_eq!(history.get_path().len(), 3);
/// assert_eq!(history.span(), Some(Duration::from_millis(500)));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    changes: VecDeque<PhaseChange<S>>,
    capacity: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history retaining at most `capacity` changes.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            changes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a phase change, evicting the oldest one when full.
    pub fn record(&mut self, change: PhaseChange<S>) {
        if self.changes.len() == self.capacity {
            self.changes.pop_front();
        }
        self.changes.push_back(change);
    }

    /// Phases traversed: the first retained `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.changes.len() + 1);
        if let Some(first) = self.changes.front() {
            path.push(&first.from);
        }
        path.extend(self.changes.iter().map(|c| &c.to));
        path
    }

    /// Host time between the first and last retained change.
    pub fn span(&self) -> Option<Duration> {
        let first = self.changes.front()?;
        let last = self.changes.back()?;
        Some(last.at.saturating_sub(first.at))
    }

    /// The most recent change.
    pub fn last(&self) -> Option<&PhaseChange<S>> {
        self.changes.back()
    }

    /// Iterate over retained changes, oldest first.
    pub fn changes(&self) -> impl Iterator<Item = &PhaseChange<S>> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
