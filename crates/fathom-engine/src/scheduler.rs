//! Bounded-time replanning.

use std::time::{Duration, Instant};

use fathom_core::{CycleId, Environment, NavError, Planner, StateId};
use tracing::debug;

/// Result of one successful replan.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplanOutcome {
    /// States from the current start toward the goal. Index 1, if
    /// present, is the next step.
    pub path: Vec<StateId>,
    /// Wall-clock time the planner spent.
    pub elapsed: Duration,
    /// Suboptimality bound the planner reported for `path`.
    pub epsilon: f64,
}

/// Call the planner exactly once with `budget`.
///
/// There is no retry: a failed replan ends the run.
///
/// # Errors
///
/// [`NavError::NoSolutionFound`] if the planner returns no path.
pub fn replan_once(
    planner: &mut dyn Planner,
    env: &dyn Environment,
    budget: Duration,
    cycle: CycleId,
) -> Result<ReplanOutcome, NavError> {
    let started = Instant::now();
    let result = planner.replan(env, budget);
    let elapsed = started.elapsed();

    let path = match result {
        Ok(path) if !path.is_empty() => path,
        Ok(_) => {
            debug!(planner = planner.name(), %cycle, "planner returned an empty path");
            return Err(NavError::NoSolutionFound { cycle, budget });
        }
        Err(e) => {
            debug!(planner = planner.name(), %cycle, error = %e, "replan failed");
            return Err(NavError::NoSolutionFound { cycle, budget });
        }
    };

    let epsilon = planner.solution_eps();
    debug!(
        planner = planner.name(),
        %cycle,
        len = path.len(),
        epsilon,
        elapsed_us = crate::metrics::micros(elapsed),
        "replanned"
    );
    Ok(ReplanOutcome {
        path,
        elapsed,
        epsilon,
    })
}
