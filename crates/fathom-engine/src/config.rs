//! Navigation configuration, validation, and error types.
//!
//! [`NavConfig`] is the input for constructing a
//! [`NavigationLoop`](crate::NavigationLoop). [`validate()`](NavConfig::validate)
//! checks every structural invariant before the loop touches the planner.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use fathom_core::{Cell, Cost, NavError, SearchMode};
use fathom_grid::{Connectivity, CostGrid, GridError};

/// Default wall-clock budget per replan (0.2 s).
pub const DEFAULT_REPLAN_BUDGET: Duration = Duration::from_millis(200);

/// Default suboptimality bound for the first solution of a fresh search.
pub const DEFAULT_INITIAL_EPSILON: f64 = 2.0;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`NavConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Building the belief grid failed.
    Grid(GridError),
    /// The start cell lies outside the ground-truth grid.
    StartOutOfBounds {
        /// The configured start.
        cell: Cell,
    },
    /// The goal cell lies outside the ground-truth grid.
    GoalOutOfBounds {
        /// The configured goal.
        cell: Cell,
    },
    /// The agent would start on a ground-truth obstacle.
    StartBlocked {
        /// The configured start.
        cell: Cell,
        /// Its ground-truth cost.
        cost: Cost,
    },
    /// The initial belief marks every cell as an obstacle.
    BeliefBlocked {
        /// The configured initial belief cost.
        cost: Cost,
        /// The obstacle threshold it meets or exceeds.
        threshold: Cost,
    },
    /// The prior map does not cover the ground-truth grid exactly.
    PriorSizeMismatch {
        /// Ground-truth `(width, height)`.
        expected: (u32, u32),
        /// Prior `(width, height)`.
        actual: (u32, u32),
    },
    /// `replan_budget` is zero.
    InvalidBudget {
        /// The invalid value.
        budget: Duration,
    },
    /// `initial_epsilon` is NaN or below 1.
    InvalidEpsilon {
        /// The invalid value.
        value: f64,
    },
    /// `obstacle_threshold` is zero, which would make every cell an obstacle.
    ZeroObstacleThreshold,
    /// `max_cycles` is `Some(0)`.
    ZeroCycleBudget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::StartOutOfBounds { cell } => write!(f, "start {cell} is outside the grid"),
            Self::GoalOutOfBounds { cell } => write!(f, "goal {cell} is outside the grid"),
            Self::StartBlocked { cell, cost } => {
                write!(f, "start {cell} is an obstacle (cost {cost})")
            }
            Self::BeliefBlocked { cost, threshold } => write!(
                f,
                "initial belief cost {cost} meets obstacle threshold {threshold}"
            ),
            Self::PriorSizeMismatch { expected, actual } => write!(
                f,
                "prior is {}x{}, ground truth is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::InvalidBudget { budget } => {
                write!(f, "replan_budget must be positive, got {budget:?}")
            }
            Self::InvalidEpsilon { value } => {
                write!(f, "initial_epsilon must be at least 1.0, got {value}")
            }
            Self::ZeroObstacleThreshold => write!(f, "obstacle_threshold must be at least 1"),
            Self::ZeroCycleBudget => write!(f, "max_cycles must be at least 1 when set"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ConfigError> for NavError {
    fn from(e: ConfigError) -> Self {
        NavError::Configuration {
            reason: e.to_string(),
        }
    }
}

// ── NavConfig ──────────────────────────────────────────────────────

/// Complete configuration for a navigation run.
///
/// Construct with [`NavConfig::new`] and override knobs as needed:
///
/// ```
/// use std::time::Duration;
/// use fathom_core::Cell;
/// use fathom_engine::NavConfig;
/// use fathom_grid::CostGrid;
///
/// let truth = CostGrid::new(8, 8, 0).unwrap();
/// let mut config = NavConfig::new(truth, Cell::new(0, 0), Cell::new(7, 7));
/// config.replan_budget = Duration::from_millis(50);
/// config.max_cycles = Some(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct NavConfig {
    /// The real world. Never changes during a run.
    pub ground_truth: CostGrid,
    /// Initial agent pose.
    pub start: Cell,
    /// Navigation goal.
    pub goal: Cell,
    /// Planning neighbourhood. Default: [`Connectivity::Eight`].
    pub connectivity: Connectivity,
    /// Cost at or above which a cell is impassable. Default: 1.
    pub obstacle_threshold: Cost,
    /// Cost every belief cell starts at. Default: 0 (free).
    /// Ignored when `prior` is set.
    pub initial_belief_cost: Cost,
    /// Map the agent already knows, used as its initial belief.
    /// Default: `None`.
    pub prior: Option<CostGrid>,
    /// Chebyshev distance from the goal that counts as arrival. Default: 0.
    pub goal_tolerance: u32,
    /// Wall-clock budget per replan. Default: [`DEFAULT_REPLAN_BUDGET`].
    pub replan_budget: Duration,
    /// Suboptimality bound of a fresh search's first solution.
    /// Default: [`DEFAULT_INITIAL_EPSILON`].
    pub initial_epsilon: f64,
    /// Whether each replan keeps improving its solution. Default: anytime.
    pub search_mode: SearchMode,
    /// Cycle limit. `None` (default) runs until arrival or failure.
    pub max_cycles: Option<u64>,
}

impl NavConfig {
    /// Configuration with default knobs for navigating `ground_truth`
    /// from `start` to `goal`.
    pub fn new(ground_truth: CostGrid, start: Cell, goal: Cell) -> Self {
        Self {
            ground_truth,
            start,
            goal,
            connectivity: Connectivity::default(),
            obstacle_threshold: 1,
            initial_belief_cost: 0,
            prior: None,
            goal_tolerance: 0,
            replan_budget: DEFAULT_REPLAN_BUDGET,
            initial_epsilon: DEFAULT_INITIAL_EPSILON,
            search_mode: SearchMode::Anytime,
            max_cycles: None,
        }
    }

    /// Validate all structural invariants.
    ///
    /// A goal on a ground-truth obstacle is accepted: the agent cannot
    /// know that in advance, and the run ends in
    /// [`NavError::NoSolutionFound`] once the obstacle is sensed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Threshold must leave some cost passable.
        if self.obstacle_threshold == 0 {
            return Err(ConfigError::ZeroObstacleThreshold);
        }
        // 2. Endpoints must lie on the grid.
        if !self.ground_truth.contains(self.start) {
            return Err(ConfigError::StartOutOfBounds { cell: self.start });
        }
        if !self.ground_truth.contains(self.goal) {
            return Err(ConfigError::GoalOutOfBounds { cell: self.goal });
        }
        // 3. The agent cannot start inside an obstacle.
        if let Some(cost) = self.ground_truth.cost(self.start) {
            if cost >= self.obstacle_threshold {
                return Err(ConfigError::StartBlocked {
                    cell: self.start,
                    cost,
                });
            }
        }
        // 4. A prior must match the world cell for cell; a uniform belief
        //    must start passable, or nothing can ever be planned.
        match &self.prior {
            Some(prior) => {
                let expected = (self.ground_truth.width(), self.ground_truth.height());
                let actual = (prior.width(), prior.height());
                if expected != actual {
                    return Err(ConfigError::PriorSizeMismatch { expected, actual });
                }
            }
            None if self.initial_belief_cost >= self.obstacle_threshold => {
                return Err(ConfigError::BeliefBlocked {
                    cost: self.initial_belief_cost,
                    threshold: self.obstacle_threshold,
                });
            }
            None => {}
        }
        // 5. Budget must be non-zero.
        if self.replan_budget.is_zero() {
            return Err(ConfigError::InvalidBudget {
                budget: self.replan_budget,
            });
        }
        // 6. Epsilon is a bound on suboptimality: at least 1, never NaN.
        if self.initial_epsilon.is_nan() || self.initial_epsilon < 1.0 {
            return Err(ConfigError::InvalidEpsilon {
                value: self.initial_epsilon,
            });
        }
        // 7. A cycle budget, if set, must allow at least one cycle.
        if self.max_cycles == Some(0) {
            return Err(ConfigError::ZeroCycleBudget);
        }
        Ok(())
    }
}
