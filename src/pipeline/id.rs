//! Identity types for pipeline steps.
//!
//! `StepId` is a newtype over `u64`. Ids are handed out monotonically by a
//! [`StepIdGen`] and stay stable across reordering and clipboard round-trips:
//! the generator is always advanced past the largest id it has ever seen,
//! whether that id was assigned locally or arrived through an import.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a pipeline step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub u64);

impl StepId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepId({})", self.0)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id generator.
///
/// `next()` never returns an id that has already been observed. Imported ids
/// are fed back through [`StepIdGen::observe`] so locally created steps can
/// never collide with them.
#[derive(Debug, Default, Clone)]
pub struct StepIdGen {
    next: u64,
}

impl StepIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id.
    pub fn next(&mut self) -> StepId {
        let id = StepId(self.next);
        self.next += 1;
        id
    }

    /// Record an externally supplied id, advancing the generator past it.
    pub fn observe(&mut self, id: StepId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}
