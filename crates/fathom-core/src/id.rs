//! Strongly-typed identifiers and the [`StateSet`] type alias.

use indexmap::IndexSet;
use std::fmt;

/// Identifies a planning state.
///
/// State ids are opaque to the loop: only the [`Environment`](crate::Environment)
/// knows how to map them to and from grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StateId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing control-loop cycle counter.
///
/// Incremented once per sense → notify → replan → move cycle. Cycle 0
/// is the state after initialization, before the first sensor sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(pub u64);

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CycleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// An ordered, duplicate-free set of states.
///
/// Insertion order is preserved so that invalidation sets are
/// reproducible across runs.
pub type StateSet = IndexSet<StateId>;
