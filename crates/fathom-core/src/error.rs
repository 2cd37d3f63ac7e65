//! Error types for the Fathom navigation loop.
//!
//! Organized by subsystem: the control loop itself ([`NavError`]),
//! planner calls ([`PlannerError`]) and environment queries
//! ([`EnvError`]). Every [`NavError`] is fatal at the loop layer; the
//! loop has no notion of skipping a cycle.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::cell::{Cell, Cost};
use crate::id::{CycleId, StateId};

/// Which endpoint a rejected state was supplied for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateRole {
    /// The agent's current pose.
    Start,
    /// The fixed navigation goal.
    Goal,
}

impl fmt::Display for StateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Goal => write!(f, "goal"),
        }
    }
}

/// Fatal errors from the navigation loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavError {
    /// Environment or planner initialization failed before the loop
    /// started.
    Configuration {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The planner refused an initial `set_start` or `set_goal`.
    PlannerRejectedState {
        /// Which endpoint was rejected.
        role: StateRole,
        /// The rejected state.
        state: StateId,
    },
    /// A bounded-time replan returned without a path. Not retried.
    NoSolutionFound {
        /// The cycle in which the replan failed.
        cycle: CycleId,
        /// The time budget the planner was given.
        budget: Duration,
    },
    /// The next step of the path lands on a ground-truth obstacle.
    UnsafeMove {
        /// The commanded destination.
        cell: Cell,
        /// Its ground-truth cost.
        cost: Cost,
    },
    /// The planner and environment disagree about the agent pose:
    /// a post-move `set_start` was rejected, or a path state has no
    /// coordinates.
    Desynchronization {
        /// The state the loop tried to move to.
        state: StateId,
    },
    /// The configured cycle budget ran out before the goal was reached.
    CycleBudgetExhausted {
        /// Number of cycles executed.
        cycles: u64,
    },
    /// Writing the solution trace failed.
    Trace {
        /// Description of the I/O failure.
        reason: String,
    },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { reason } => write!(f, "configuration error: {reason}"),
            Self::PlannerRejectedState { role, state } => {
                write!(f, "planner rejected {role} state {state}")
            }
            Self::NoSolutionFound { cycle, budget } => write!(
                f,
                "no solution found in cycle {cycle} within {:.3}s",
                budget.as_secs_f64()
            ),
            Self::UnsafeMove { cell, cost } => {
                write!(f, "agent commanded into obstacle at {cell} (cost {cost})")
            }
            Self::Desynchronization { state } => {
                write!(f, "planner and environment desynchronized at state {state}")
            }
            Self::CycleBudgetExhausted { cycles } => {
                write!(f, "cycle budget exhausted after {cycles} cycles")
            }
            Self::Trace { reason } => write!(f, "trace write failed: {reason}"),
        }
    }
}

impl Error for NavError {}

/// Errors returned by [`Planner`](crate::Planner) entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlannerError {
    /// The state is not a valid start or goal for this planner.
    RejectedState {
        /// The rejected state.
        state: StateId,
    },
    /// No path was found within the time budget.
    NoSolution,
    /// The planner does not implement the requested entry point.
    Unsupported {
        /// Name of the missing capability.
        capability: &'static str,
    },
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectedState { state } => write!(f, "state {state} rejected"),
            Self::NoSolution => write!(f, "no solution within budget"),
            Self::Unsupported { capability } => {
                write!(f, "capability '{capability}' not supported")
            }
        }
    }
}

impl Error for PlannerError {}

/// Errors from [`Environment`](crate::Environment) queries and updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvError {
    /// A cell lies outside the grid.
    CellOutOfBounds {
        /// The offending cell.
        cell: Cell,
    },
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfBounds { cell } => write!(f, "cell {cell} out of bounds"),
        }
    }
}

impl Error for EnvError {}

impl From<EnvError> for NavError {
    fn from(e: EnvError) -> Self {
        Self::Configuration {
            reason: e.to_string(),
        }
    }
}
