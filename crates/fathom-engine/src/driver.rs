//! The navigation control loop.
//!
//! [`NavigationLoop`] owns the ground truth, the belief environment and
//! the planner. Each [`step()`](NavigationLoop::step) runs one cycle:
//!
//! 1. **Goal test**: within tolerance ⇒ report arrival, nothing else runs.
//! 2. **Sense**: diff ground truth against belief around the pose.
//! 3. **Notify**: write changes into belief, tell the planner.
//! 4. **Replan**: one bounded call; failure ends the run.
//! 5. **Move**: at most one step, checked against ground truth.
//!
//! Notify and replan run every cycle, whether or not anything changed.

use std::io::Write;
use std::time::{Duration, Instant};

use fathom_core::{Cell, CellChange, CycleId, Environment, NavError, Planner, StateId, StateRole};
use fathom_grid::{CostGrid, GridEnvironment};
use tracing::info;

use crate::config::NavConfig;
use crate::executor::{execute_step, StepOutcome};
use crate::metrics::{micros, CycleMetrics, PlanTimeHistogram};
use crate::notifier::{notify, Invalidation};
use crate::scheduler::{replan_once, ReplanOutcome};
use crate::sensor::sense;
use crate::trace::TraceWriter;

/// How a cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleStatus {
    /// The pose was already within tolerance of the goal.
    Arrived,
    /// The path had no next step.
    Held,
    /// The agent advanced one step.
    Moved {
        /// Pose before the step.
        from: Cell,
        /// Pose after the step.
        to: Cell,
    },
}

impl From<StepOutcome> for CycleStatus {
    fn from(outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Held => Self::Held,
            StepOutcome::Moved { from, to } => Self::Moved { from, to },
        }
    }
}

/// Everything that happened in one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// The cycle this report describes.
    pub cycle: CycleId,
    /// Pose at the start of the cycle.
    pub pose: Cell,
    /// Cells whose belief was corrected.
    pub changes: Vec<CellChange>,
    /// What the planner was told about `changes`.
    pub invalidation: Invalidation,
    /// The replan result. `None` on arrival.
    pub replan: Option<ReplanOutcome>,
    /// How the cycle ended.
    pub status: CycleStatus,
}

/// Online navigation loop over a partially known grid.
///
/// # Examples
///
/// ```
/// use fathom_core::Cell;
/// use fathom_engine::{NavConfig, NavigationLoop};
/// use fathom_grid::CostGrid;
/// use fathom_planner::AnytimePlanner;
///
/// let mut truth = CostGrid::new(6, 6, 0).unwrap();
/// truth.set_cost(Cell::new(2, 2), 255).unwrap();
/// let config = NavConfig::new(truth, Cell::new(0, 0), Cell::new(5, 5));
/// let planner = AnytimePlanner::builder().state_count(36).build().unwrap();
///
/// let mut nav = NavigationLoop::new(config, Box::new(planner)).unwrap();
/// nav.run().unwrap();
/// assert_eq!(nav.pose(), Cell::new(5, 5));
/// ```
pub struct NavigationLoop {
    truth: CostGrid,
    env: GridEnvironment,
    planner: Box<dyn Planner>,
    pose: Cell,
    goal: Cell,
    goal_tolerance: u32,
    replan_budget: Duration,
    max_cycles: Option<u64>,
    cycle: CycleId,
    histogram: PlanTimeHistogram,
    last_metrics: CycleMetrics,
}

impl NavigationLoop {
    /// Validate `config`, build the belief environment, and prime the
    /// planner with epsilon, endpoints and search mode.
    ///
    /// # Errors
    ///
    /// - [`NavError::Configuration`] if `config` fails validation.
    /// - [`NavError::PlannerRejectedState`] if the planner refuses the
    ///   start or goal state.
    pub fn new(config: NavConfig, mut planner: Box<dyn Planner>) -> Result<Self, NavError> {
        config.validate()?;

        let belief = match config.prior {
            Some(prior) => prior,
            None => CostGrid::new(
                config.ground_truth.width(),
                config.ground_truth.height(),
                config.initial_belief_cost,
            )
            .map_err(crate::config::ConfigError::from)?,
        };
        let mut env = GridEnvironment::new(belief, config.connectivity, config.obstacle_threshold);
        let start = env.set_start(config.start)?;
        let goal = env.set_goal(config.goal)?;

        planner.set_initial_solution_eps(config.initial_epsilon);
        planner
            .set_start(start)
            .map_err(|_| rejected(StateRole::Start, start))?;
        planner
            .set_goal(goal)
            .map_err(|_| rejected(StateRole::Goal, goal))?;
        planner.set_search_mode(config.search_mode);

        info!(
            planner = planner.name(),
            width = config.ground_truth.width(),
            height = config.ground_truth.height(),
            start = %config.start,
            goal = %config.goal,
            budget_ms = config.replan_budget.as_millis() as u64,
            "navigation loop ready"
        );

        Ok(Self {
            truth: config.ground_truth,
            env,
            planner,
            pose: config.start,
            goal: config.goal,
            goal_tolerance: config.goal_tolerance,
            replan_budget: config.replan_budget,
            max_cycles: config.max_cycles,
            cycle: CycleId::default(),
            histogram: PlanTimeHistogram::default(),
            last_metrics: CycleMetrics::default(),
        })
    }

    /// Run one cycle.
    ///
    /// Once the goal is reached every call returns an
    /// [`Arrived`](CycleStatus::Arrived) report without sensing or
    /// replanning; the cycle counter does not advance.
    ///
    /// # Errors
    ///
    /// Any [`NavError`] is fatal; the loop should not be stepped again.
    /// [`NavError::CycleBudgetExhausted`] is returned before any work if
    /// the configured cycle budget is spent.
    pub fn step(&mut self) -> Result<CycleReport, NavError> {
        if self.is_arrived() {
            return Ok(CycleReport {
                cycle: self.cycle,
                pose: self.pose,
                changes: Vec::new(),
                invalidation: Invalidation::None,
                replan: None,
                status: CycleStatus::Arrived,
            });
        }
        if let Some(max) = self.max_cycles {
            if self.cycle.0 >= max {
                return Err(NavError::CycleBudgetExhausted {
                    cycles: self.cycle.0,
                });
            }
        }

        let cycle = CycleId(self.cycle.0 + 1);
        let pose = self.pose;
        let started = Instant::now();

        let changes = sense(&self.truth, &self.env, pose);
        let sensed = Instant::now();

        let invalidation = notify(&changes, &mut self.env, self.planner.as_mut())?;
        let notified = Instant::now();

        let replan = replan_once(
            self.planner.as_mut(),
            &self.env,
            self.replan_budget,
            cycle,
        )?;
        self.histogram.record(replan.elapsed);

        let outcome = execute_step(
            &replan.path,
            &mut self.pose,
            &self.truth,
            &mut self.env,
            self.planner.as_mut(),
        )?;

        self.cycle = cycle;
        self.last_metrics = CycleMetrics {
            total_us: micros(started.elapsed()),
            sense_us: micros(sensed - started),
            notify_us: micros(notified - sensed),
            replan_us: micros(replan.elapsed),
            changed_cells: changes.len(),
            invalidated_states: invalidation.state_count(),
            path_len: replan.path.len(),
        };

        if self.is_arrived() {
            info!(%cycle, pose = %self.pose, "goal reached");
        }

        Ok(CycleReport {
            cycle,
            pose,
            changes,
            invalidation,
            replan: Some(replan),
            status: outcome.into(),
        })
    }

    /// Step until arrival.
    ///
    /// Returns the number of cycles executed.
    pub fn run(&mut self) -> Result<u64, NavError> {
        loop {
            if self.step()?.status == CycleStatus::Arrived {
                return Ok(self.cycle.0);
            }
        }
    }

    /// Step until arrival, recording every cycle into `trace` and closing
    /// it with the timing summary.
    ///
    /// On error the trace is flushed but no summary is written.
    pub fn run_traced<W: Write>(&mut self, trace: &mut TraceWriter<W>) -> Result<u64, NavError> {
        loop {
            let report = match self.step() {
                Ok(report) => report,
                Err(e) => {
                    // The step failure matters more than a flush error.
                    let _ = trace.flush();
                    return Err(e);
                }
            };
            if report.status == CycleStatus::Arrived {
                trace.finish(&self.histogram)?;
                return Ok(self.cycle.0);
            }
            trace.record(&report)?;
        }
    }

    /// Whether the pose is within tolerance of the goal.
    pub fn is_arrived(&self) -> bool {
        self.pose.within(self.goal, self.goal_tolerance)
    }

    /// Current agent pose.
    pub fn pose(&self) -> Cell {
        self.pose
    }

    /// The navigation goal.
    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// State id of the current pose in the belief environment.
    pub fn pose_state(&self) -> Option<StateId> {
        self.env.state_of_coord(self.pose)
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    /// Replan timing histogram accumulated so far.
    pub fn histogram(&self) -> &PlanTimeHistogram {
        &self.histogram
    }

    /// Metrics from the most recently completed cycle.
    pub fn last_metrics(&self) -> &CycleMetrics {
        &self.last_metrics
    }

    /// The belief environment.
    pub fn environment(&self) -> &GridEnvironment {
        &self.env
    }

    /// The ground-truth grid.
    pub fn ground_truth(&self) -> &CostGrid {
        &self.truth
    }

    /// The planner.
    pub fn planner(&self) -> &dyn Planner {
        self.planner.as_ref()
    }
}

fn rejected(role: StateRole, state: StateId) -> NavError {
    NavError::PlannerRejectedState { role, state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom_core::PlannerCapabilities;
    use fathom_test_utils::{pillar_5x5, PlannerCall, RecordingPlanner, ScriptedPlanner};

    fn config() -> NavConfig {
        NavConfig::new(pillar_5x5(), Cell::new(0, 0), Cell::new(4, 4))
    }

    #[test]
    fn invalid_config_is_configuration_error() {
        let mut c = config();
        c.start = Cell::new(9, 9);
        let planner = Box::new(ScriptedPlanner::new(vec![]));
        assert!(matches!(
            NavigationLoop::new(c, planner),
            Err(NavError::Configuration { .. })
        ));
    }

    #[test]
    fn planner_is_primed_in_order() {
        let planner = RecordingPlanner::new(ScriptedPlanner::new(vec![]));
        let log = planner.log();
        NavigationLoop::new(config(), Box::new(planner)).unwrap();
        assert_eq!(
            log.calls(),
            vec![
                PlannerCall::SetInitialEps(2.0),
                PlannerCall::SetStart(StateId(0)),
                PlannerCall::SetGoal(StateId(24)),
                PlannerCall::SetSearchMode(fathom_core::SearchMode::Anytime),
            ]
        );
    }

    #[test]
    fn rejected_start_is_reported() {
        let planner = ScriptedPlanner::new(vec![]).rejecting_start_after(0);
        assert_eq!(
            NavigationLoop::new(config(), Box::new(planner)).err(),
            Some(NavError::PlannerRejectedState {
                role: StateRole::Start,
                state: StateId(0)
            })
        );
    }

    #[test]
    fn start_at_goal_arrives_without_replanning() {
        let mut c = config();
        c.start = Cell::new(4, 4);
        let planner = RecordingPlanner::new(ScriptedPlanner::new(vec![]));
        let log = planner.log();
        let mut nav = NavigationLoop::new(c, Box::new(planner)).unwrap();
        let report = nav.step().unwrap();
        assert_eq!(report.status, CycleStatus::Arrived);
        assert_eq!(report.cycle, CycleId(0));
        assert_eq!(log.replans(), 0);
        assert_eq!(nav.run().unwrap(), 0);
    }

    #[test]
    fn tolerance_widens_arrival() {
        let mut c = config();
        c.start = Cell::new(3, 3);
        c.goal_tolerance = 1;
        let nav = NavigationLoop::new(c, Box::new(ScriptedPlanner::new(vec![]))).unwrap();
        assert!(nav.is_arrived());
    }

    #[test]
    fn held_cycle_still_counts() {
        let planner = ScriptedPlanner::new(vec![vec![StateId(0)]])
            .with_capabilities(PlannerCapabilities::FULL);
        let mut nav = NavigationLoop::new(config(), Box::new(planner)).unwrap();
        let report = nav.step().unwrap();
        assert_eq!(report.status, CycleStatus::Held);
        assert_eq!(report.cycle, CycleId(1));
        assert_eq!(nav.cycle(), CycleId(1));
        assert_eq!(nav.pose(), Cell::new(0, 0));
        assert_eq!(nav.histogram().total(), 1);
        assert_eq!(nav.last_metrics().path_len, 1);
    }
}
