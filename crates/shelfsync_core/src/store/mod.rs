//! In-memory state containers.
//!
//! # Responsibility
//! - Hold the catalog and inbox mirrors behind single-owner containers.
//! - Install remote snapshots atomically and apply local optimistic actions.
//!
//! # Invariants
//! - Container state is an immutable `Arc` value; loads swap it in one step
//!   and mutations copy-on-write, so handed-out snapshots never change.
//! - Only the most recently *started* load may install its result.
//! - Id-based actions report lookup misses as `StoreError`; bulk loads never
//!   return errors to callers.

pub mod catalog;
pub mod events;
pub mod inbox;

use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Lookup miss for id-based container actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    BookNotFound(String),
    NotificationNotFound(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::NotificationNotFound(id) => write!(f, "notification not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Result of one bulk load, for callers that want to observe it.
///
/// Failures are logged by the container; the variant only says that the
/// previous state was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A new state was installed.
    Installed { generation: u64, records: usize },
    /// The source answered with no body; state kept.
    Empty { generation: u64 },
    /// A newer load was started while this one was in flight; result dropped.
    Superseded { generation: u64, latest: u64 },
    /// Fetch or normalization failed; state kept.
    Failed { generation: u64 },
}

impl LoadOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Monotonic load counter used to drop out-of-date results.
#[derive(Debug, Default)]
pub(crate) struct LoadGeneration {
    latest: Cell<u64>,
}

impl LoadGeneration {
    /// Registers a new load and returns its generation.
    pub(crate) fn begin(&self) -> u64 {
        let next = self.latest.get().wrapping_add(1);
        self.latest.set(next);
        next
    }

    pub(crate) fn latest(&self) -> u64 {
        self.latest.get()
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.latest.get() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::LoadGeneration;

    #[test]
    fn only_latest_generation_is_current() {
        let generation = LoadGeneration::default();
        let first = generation.begin();
        let second = generation.begin();
        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_eq!(generation.latest(), second);
    }
}
