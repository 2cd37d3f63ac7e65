//! Belief update and planner change notification.
//!
//! Every sensed change is written into the belief environment. The
//! planner is then told what went stale, choosing the notification from
//! its declared [`PlannerCapabilities`](fathom_core::PlannerCapabilities):
//!
//! | Capabilities | Call |
//! |---|---|
//! | targeted (with or without full) | `invalidate_predecessors_of(preds)` |
//! | full only | `invalidate_all()` |
//! | neither | none, with a warning |

use fathom_core::{CellChange, Environment, NavError, Planner, PlannerError, StateSet};
use tracing::{debug, warn};

/// What the planner was told about a cycle's changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Invalidation {
    /// No changes, or a planner that accepts no notifications.
    #[default]
    None,
    /// The planner discarded all previous search effort.
    Full,
    /// The planner was given the states whose outgoing edges changed.
    Targeted {
        /// Predecessors of the changed cells, in first-seen order.
        states: StateSet,
    },
}

impl Invalidation {
    /// Number of states named in the notification (0 for `None` and `Full`).
    pub fn state_count(&self) -> usize {
        match self {
            Self::Targeted { states } => states.len(),
            _ => 0,
        }
    }
}

/// Apply `changes` to `env` and notify `planner`.
///
/// An empty change set is a no-op: the belief is untouched and the
/// planner receives no call.
///
/// # Errors
///
/// [`NavError::Configuration`] if a change lies outside the environment
/// or the planner refuses a notification it advertised.
pub fn notify(
    changes: &[CellChange],
    env: &mut dyn Environment,
    planner: &mut dyn Planner,
) -> Result<Invalidation, NavError> {
    if changes.is_empty() {
        return Ok(Invalidation::None);
    }

    for change in changes {
        env.set_cost(change.cell, change.cost)?;
        debug!(cell = %change.cell, cost = change.cost, "belief updated");
    }

    let caps = planner.capabilities();
    if caps.targeted_invalidation {
        let states = env.predecessors_of_changed_cells(changes);
        planner
            .invalidate_predecessors_of(&states)
            .map_err(|e| refused(planner.name(), e))?;
        Ok(Invalidation::Targeted { states })
    } else if caps.full_invalidation {
        planner
            .invalidate_all()
            .map_err(|e| refused(planner.name(), e))?;
        Ok(Invalidation::Full)
    } else {
        warn!(
            planner = planner.name(),
            changes = changes.len(),
            "planner accepts no change notifications; replanning on stale effort"
        );
        Ok(Invalidation::None)
    }
}

fn refused(planner: &str, e: PlannerError) -> NavError {
    NavError::Configuration {
        reason: format!("planner '{planner}' refused an advertised notification: {e}"),
    }
}
