//! Reusable planner test fixtures.
//!
//! - [`ScriptedPlanner`] returns preset paths, one per replan.
//! - [`FailingPlanner`] fails deterministically after N successful replans.
//! - [`RecordingPlanner`] wraps any planner and logs every call it sees.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fathom_core::{
    Environment, Planner, PlannerCapabilities, PlannerError, SearchMode, StateId, StateSet,
};

/// Returns the next preset path on every replan, then `NoSolution` once
/// the script runs out.
///
/// Never validates paths against the environment, so tests can feed the
/// loop paths that walk into walls or leave the map.
pub struct ScriptedPlanner {
    pub name: String,
    pub capabilities: PlannerCapabilities,
    paths: VecDeque<Vec<StateId>>,
    reject_after_starts: Option<usize>,
    starts_accepted: usize,
    eps: f64,
}

impl ScriptedPlanner {
    pub fn new(paths: Vec<Vec<StateId>>) -> Self {
        Self {
            name: "scripted".to_string(),
            capabilities: PlannerCapabilities::BOTH,
            paths: paths.into(),
            reject_after_starts: None,
            starts_accepted: 0,
            eps: 1.0,
        }
    }

    /// Advertise `capabilities` instead of [`PlannerCapabilities::BOTH`].
    pub fn with_capabilities(mut self, capabilities: PlannerCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Accept `n` calls to `set_start`, then reject every further one.
    pub fn rejecting_start_after(mut self, n: usize) -> Self {
        self.reject_after_starts = Some(n);
        self
    }

    /// Report `eps` from `solution_eps`.
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Paths not yet handed out.
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl Planner for ScriptedPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> PlannerCapabilities {
        self.capabilities
    }

    fn set_start(&mut self, state: StateId) -> Result<(), PlannerError> {
        if self
            .reject_after_starts
            .is_some_and(|n| self.starts_accepted >= n)
        {
            return Err(PlannerError::RejectedState { state });
        }
        self.starts_accepted += 1;
        Ok(())
    }

    fn set_goal(&mut self, _state: StateId) -> Result<(), PlannerError> {
        Ok(())
    }

    fn set_initial_solution_eps(&mut self, _eps: f64) {}

    fn set_search_mode(&mut self, _mode: SearchMode) {}

    fn replan(
        &mut self,
        _env: &dyn Environment,
        _budget: Duration,
    ) -> Result<Vec<StateId>, PlannerError> {
        self.paths.pop_front().ok_or(PlannerError::NoSolution)
    }

    fn solution_eps(&self) -> f64 {
        self.eps
    }

    fn invalidate_all(&mut self) -> Result<(), PlannerError> {
        Ok(())
    }

    fn invalidate_predecessors_of(&mut self, _states: &StateSet) -> Result<(), PlannerError> {
        Ok(())
    }
}

/// Delegates to an inner planner for `succeed_count` replans, then
/// reports `NoSolution` on every further replan.
pub struct FailingPlanner<P> {
    inner: P,
    pub succeed_count: usize,
    replans: usize,
}

impl<P: Planner> FailingPlanner<P> {
    pub fn new(inner: P, succeed_count: usize) -> Self {
        Self {
            inner,
            succeed_count,
            replans: 0,
        }
    }

    /// How many times `replan()` has been called.
    pub fn replans(&self) -> usize {
        self.replans
    }
}

impl<P: Planner> Planner for FailingPlanner<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capabilities(&self) -> PlannerCapabilities {
        self.inner.capabilities()
    }

    fn set_start(&mut self, state: StateId) -> Result<(), PlannerError> {
        self.inner.set_start(state)
    }

    fn set_goal(&mut self, state: StateId) -> Result<(), PlannerError> {
        self.inner.set_goal(state)
    }

    fn set_initial_solution_eps(&mut self, eps: f64) {
        self.inner.set_initial_solution_eps(eps);
    }

    fn set_search_mode(&mut self, mode: SearchMode) {
        self.inner.set_search_mode(mode);
    }

    fn replan(
        &mut self,
        env: &dyn Environment,
        budget: Duration,
    ) -> Result<Vec<StateId>, PlannerError> {
        let n = self.replans;
        self.replans += 1;
        if n >= self.succeed_count {
            return Err(PlannerError::NoSolution);
        }
        self.inner.replan(env, budget)
    }

    fn solution_eps(&self) -> f64 {
        self.inner.solution_eps()
    }

    fn invalidate_all(&mut self) -> Result<(), PlannerError> {
        self.inner.invalidate_all()
    }

    fn invalidate_predecessors_of(&mut self, states: &StateSet) -> Result<(), PlannerError> {
        self.inner.invalidate_predecessors_of(states)
    }
}

/// One call observed by a [`RecordingPlanner`].
#[derive(Clone, Debug, PartialEq)]
pub enum PlannerCall {
    SetStart(StateId),
    SetGoal(StateId),
    SetInitialEps(f64),
    SetSearchMode(SearchMode),
    Replan,
    InvalidateAll,
    InvalidatePredecessors(Vec<StateId>),
}

/// Shared handle onto the calls a [`RecordingPlanner`] has seen.
///
/// Cloned out before the planner is boxed into the loop, so tests can
/// inspect the call sequence afterwards.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<PlannerCall>>>);

impl CallLog {
    fn push(&self, call: PlannerCall) {
        self.0.lock().unwrap().push(call);
    }

    /// Snapshot of every call so far, oldest first.
    pub fn calls(&self) -> Vec<PlannerCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&PlannerCall) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn invalidations(&self) -> usize {
        self.count(|c| {
            matches!(
                c,
                PlannerCall::InvalidateAll | PlannerCall::InvalidatePredecessors(_)
            )
        })
    }

    pub fn replans(&self) -> usize {
        self.count(|c| matches!(c, PlannerCall::Replan))
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Wraps a planner and records every call into a [`CallLog`].
pub struct RecordingPlanner<P> {
    inner: P,
    log: CallLog,
}

impl<P: Planner> RecordingPlanner<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            log: CallLog::default(),
        }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl<P: Planner> Planner for RecordingPlanner<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capabilities(&self) -> PlannerCapabilities {
        self.inner.capabilities()
    }

    fn set_start(&mut self, state: StateId) -> Result<(), PlannerError> {
        self.log.push(PlannerCall::SetStart(state));
        self.inner.set_start(state)
    }

    fn set_goal(&mut self, state: StateId) -> Result<(), PlannerError> {
        self.log.push(PlannerCall::SetGoal(state));
        self.inner.set_goal(state)
    }

    fn set_initial_solution_eps(&mut self, eps: f64) {
        self.log.push(PlannerCall::SetInitialEps(eps));
        self.inner.set_initial_solution_eps(eps);
    }

    fn set_search_mode(&mut self, mode: SearchMode) {
        self.log.push(PlannerCall::SetSearchMode(mode));
        self.inner.set_search_mode(mode);
    }

    fn replan(
        &mut self,
        env: &dyn Environment,
        budget: Duration,
    ) -> Result<Vec<StateId>, PlannerError> {
        self.log.push(PlannerCall::Replan);
        self.inner.replan(env, budget)
    }

    fn solution_eps(&self) -> f64 {
        self.inner.solution_eps()
    }

    fn invalidate_all(&mut self) -> Result<(), PlannerError> {
        self.log.push(PlannerCall::InvalidateAll);
        self.inner.invalidate_all()
    }

    fn invalidate_predecessors_of(&mut self, states: &StateSet) -> Result<(), PlannerError> {
        self.log
            .push(PlannerCall::InvalidatePredecessors(states.iter().copied().collect()));
        self.inner.invalidate_predecessors_of(states)
    }
}
