//! Anytime weighted-A* planner with a reusable cached solution.
//!
//! Each replan first tries to reuse the previous solution: the agent only
//! ever advances along it, so the path is trimmed to the new start and
//! returned as-is once its bound has converged. Otherwise searches are
//! repeated with a shrinking inflation factor until the bound reaches 1
//! or the budget runs out, keeping the best solution found.
//!
//! Invalidation drops the cache:
//! - full invalidation always,
//! - targeted invalidation only if some state on the cached path (other
//!   than the goal) is among the invalidated predecessors.
//!
//! Retaining an unaffected path is exact when revealed costs only rise,
//! which is the case for an optimistic initial belief. When costs can
//! fall (a non-zero prior), a retained path is still traversable under
//! current belief but may no longer be the cheapest one.
//!
//! A planner built without any invalidation capability is never told
//! about changes, so it keeps no solution between replans and searches
//! from scratch every time.

use std::time::{Duration, Instant};

use fathom_core::{
    Environment, Planner, PlannerCapabilities, PlannerError, SearchMode, StateId, StateSet,
};
use tracing::{debug, trace};

use crate::search::{weighted_astar, SearchResult};

/// Smallest suboptimality bound a search can guarantee.
const FINAL_EPS: f64 = 1.0;

#[derive(Clone, Debug)]
struct Solution {
    path: Vec<StateId>,
    eps: f64,
}

/// Reference anytime planner over any [`Environment`].
///
/// Constructed via the builder pattern: [`AnytimePlanner::builder`].
///
/// ```
/// use fathom_core::{Planner, PlannerCapabilities};
/// use fathom_planner::AnytimePlanner;
///
/// let planner = AnytimePlanner::builder()
///     .state_count(25)
///     .capabilities(PlannerCapabilities::TARGETED)
///     .build()
///     .unwrap();
/// assert!(planner.capabilities().targeted_invalidation);
/// ```
#[derive(Debug)]
pub struct AnytimePlanner {
    name: String,
    capabilities: PlannerCapabilities,
    state_count: usize,
    eps_decrement: f64,
    initial_eps: f64,
    mode: SearchMode,
    start: Option<StateId>,
    goal: Option<StateId>,
    cached: Option<Solution>,
    solution_eps: f64,
    searches: u64,
    expansions: u64,
}

/// Builder for [`AnytimePlanner`].
///
/// Required: `state_count`.
pub struct AnytimePlannerBuilder {
    name: String,
    capabilities: PlannerCapabilities,
    state_count: Option<usize>,
    eps_decrement: f64,
}

impl AnytimePlanner {
    /// Create a new builder.
    pub fn builder() -> AnytimePlannerBuilder {
        AnytimePlannerBuilder {
            name: "anytime".to_string(),
            capabilities: PlannerCapabilities::FULL,
            state_count: None,
            eps_decrement: 0.5,
        }
    }

    /// Number of weighted searches run so far.
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Total states expanded across all searches.
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Whether a previous solution is currently held for reuse.
    pub fn has_cached_solution(&self) -> bool {
        self.cached.is_some()
    }

    fn check_state(&self, state: StateId) -> Result<(), PlannerError> {
        if (state.0 as usize) < self.state_count {
            Ok(())
        } else {
            Err(PlannerError::RejectedState { state })
        }
    }

    /// Trim the cached path so it begins at `start`, dropping it if the
    /// start has left the path.
    fn rebase_cache(&mut self, start: StateId) {
        if self.capabilities == PlannerCapabilities::NONE {
            self.cached = None;
            return;
        }
        let found = self
            .cached
            .as_ref()
            .map(|sol| sol.path.iter().position(|&s| s == start));
        match found {
            Some(Some(pos)) => {
                if let Some(sol) = &mut self.cached {
                    sol.path.drain(..pos);
                }
            }
            Some(None) => self.cached = None,
            None => {}
        }
    }
}

impl AnytimePlannerBuilder {
    /// Set the planner name used in logs. Default: `"anytime"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the advertised invalidation capabilities.
    /// Default: [`PlannerCapabilities::FULL`].
    ///
    /// With [`PlannerCapabilities::TARGETED`] an unaffected path survives
    /// invalidation, which is only optimal while believed costs never
    /// decrease. [`PlannerCapabilities::NONE`] disables caching entirely.
    pub fn capabilities(mut self, capabilities: PlannerCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the number of states in the environment to be searched.
    pub fn state_count(mut self, n: usize) -> Self {
        self.state_count = Some(n);
        self
    }

    /// Set how much the inflation factor drops between successive
    /// searches. Default: 0.5. Must be finite and positive.
    pub fn eps_decrement(mut self, step: f64) -> Self {
        self.eps_decrement = step;
        self
    }

    /// Build the planner, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `state_count` is not set or is zero
    /// - `eps_decrement` is not finite and positive
    pub fn build(self) -> Result<AnytimePlanner, String> {
        let state_count = self
            .state_count
            .ok_or_else(|| "state_count is required".to_string())?;
        if state_count == 0 {
            return Err("state_count must be at least 1".to_string());
        }
        if !self.eps_decrement.is_finite() || self.eps_decrement <= 0.0 {
            return Err(format!(
                "eps_decrement must be finite and positive, got {}",
                self.eps_decrement
            ));
        }
        Ok(AnytimePlanner {
            name: self.name,
            capabilities: self.capabilities,
            state_count,
            eps_decrement: self.eps_decrement,
            initial_eps: FINAL_EPS,
            mode: SearchMode::Anytime,
            start: None,
            goal: None,
            cached: None,
            solution_eps: f64::INFINITY,
            searches: 0,
            expansions: 0,
        })
    }
}

impl Planner for AnytimePlanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> PlannerCapabilities {
        self.capabilities
    }

    fn set_start(&mut self, state: StateId) -> Result<(), PlannerError> {
        self.check_state(state)?;
        self.start = Some(state);
        Ok(())
    }

    fn set_goal(&mut self, state: StateId) -> Result<(), PlannerError> {
        self.check_state(state)?;
        if self.goal != Some(state) {
            self.cached = None;
        }
        self.goal = Some(state);
        Ok(())
    }

    fn set_initial_solution_eps(&mut self, eps: f64) {
        self.initial_eps = if eps.is_finite() {
            eps.max(FINAL_EPS)
        } else {
            FINAL_EPS
        };
    }

    fn set_search_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    fn replan(
        &mut self,
        env: &dyn Environment,
        budget: Duration,
    ) -> Result<Vec<StateId>, PlannerError> {
        let deadline = Instant::now() + budget;
        let (Some(start), Some(goal)) = (self.start, self.goal) else {
            return Err(PlannerError::NoSolution);
        };

        self.rebase_cache(start);
        if let Some(sol) = &self.cached {
            if sol.eps <= FINAL_EPS || self.mode == SearchMode::FirstSolution {
                trace!(planner = %self.name, eps = sol.eps, "reusing cached solution");
                self.solution_eps = sol.eps;
                return Ok(sol.path.clone());
            }
        }

        let mut best = self.cached.take();
        let mut eps = match &best {
            Some(sol) => (sol.eps - self.eps_decrement).max(FINAL_EPS),
            None => self.initial_eps,
        };

        loop {
            self.searches += 1;
            match weighted_astar(env, start, goal, eps, deadline) {
                SearchResult::Found {
                    path, expansions, ..
                } => {
                    self.expansions += expansions;
                    debug!(
                        planner = %self.name,
                        eps,
                        len = path.len(),
                        expansions,
                        "solution found"
                    );
                    best = Some(Solution { path, eps });
                    if eps <= FINAL_EPS || self.mode == SearchMode::FirstSolution {
                        break;
                    }
                    eps = (eps - self.eps_decrement).max(FINAL_EPS);
                }
                SearchResult::Exhausted => {
                    debug!(planner = %self.name, eps, "goal unreachable under current costs");
                    best = None;
                    break;
                }
                SearchResult::TimedOut => {
                    debug!(planner = %self.name, eps, "budget exhausted");
                    break;
                }
            }
        }

        match best {
            Some(sol) => {
                self.solution_eps = sol.eps;
                let path = sol.path.clone();
                self.cached = Some(sol);
                Ok(path)
            }
            None => Err(PlannerError::NoSolution),
        }
    }

    fn solution_eps(&self) -> f64 {
        self.solution_eps
    }

    fn invalidate_all(&mut self) -> Result<(), PlannerError> {
        if !self.capabilities.full_invalidation {
            return Err(PlannerError::Unsupported {
                capability: "invalidate_all",
            });
        }
        self.cached = None;
        Ok(())
    }

    fn invalidate_predecessors_of(&mut self, states: &StateSet) -> Result<(), PlannerError> {
        if !self.capabilities.targeted_invalidation {
            return Err(PlannerError::Unsupported {
                capability: "invalidate_predecessors_of",
            });
        }
        let stale = self.cached.as_ref().is_some_and(|sol| {
            let edges = sol.path.len().saturating_sub(1);
            sol.path[..edges].iter().any(|s| states.contains(s))
        });
        if stale {
            trace!(planner = %self.name, "cached path crosses changed edges");
            self.cached = None;
        }
        Ok(())
    }
}
