//! Collaborator contracts: the [`Environment`] model and the [`Planner`].
//!
//! The navigation loop is written entirely against these two traits.
//! Planner selection never inspects concrete types: a planner declares
//! at construction which change notifications it understands through
//! [`PlannerCapabilities`], and the loop routes invalidations by
//! capability alone.

use smallvec::SmallVec;
use std::time::Duration;

use crate::cell::{Cell, CellChange, Cost};
use crate::error::{EnvError, PlannerError};
use crate::id::{StateId, StateSet};

/// Outgoing (or incoming) edges of a state: `(neighbour, edge cost)`.
///
/// Sized for 16-connected grids so that no lattice used here spills to
/// the heap.
pub type Successors = SmallVec<[(StateId, u32); 16]>;

/// The environment model the planner searches over.
///
/// Holds the agent's *belief* about cell costs, not ground truth.
pub trait Environment: Send {
    /// Number of distinct planning states.
    fn state_count(&self) -> usize;

    /// Cost at or above which a cell is impassable.
    fn obstacle_threshold(&self) -> Cost;

    /// Believed cost of `cell`, or `None` if out of bounds.
    fn cost(&self, cell: Cell) -> Option<Cost>;

    /// Overwrite the believed cost of `cell`.
    fn set_cost(&mut self, cell: Cell, cost: Cost) -> Result<(), EnvError>;

    /// Cell coordinates for `state`, or `None` for an unknown id.
    fn coord_of_state(&self, state: StateId) -> Option<Cell>;

    /// State id for `cell`, or `None` if out of bounds.
    fn state_of_coord(&self, cell: Cell) -> Option<StateId>;

    /// Edges leaving `state` under the current belief.
    fn successors(&self, state: StateId) -> Successors;

    /// Edges entering `state` under the current belief.
    fn predecessors(&self, state: StateId) -> Successors;

    /// Admissible cost-to-go estimate between two states.
    fn heuristic(&self, from: StateId, to: StateId) -> u32;

    /// States whose outgoing edge costs depend on any of `cells`.
    ///
    /// These are exactly the states whose previously computed values may
    /// be stale after the cells' costs changed. The result is
    /// duplicate-free.
    fn predecessors_of_changed_cells(&self, cells: &[CellChange]) -> StateSet;

    /// Record the agent's pose.
    fn set_start(&mut self, cell: Cell) -> Result<StateId, EnvError>;

    /// Record the navigation goal.
    fn set_goal(&mut self, cell: Cell) -> Result<StateId, EnvError>;

    /// The recorded agent pose.
    fn start(&self) -> Cell;

    /// The recorded goal.
    fn goal(&self) -> Cell;
}

/// Change notifications a planner understands.
///
/// Declared once at construction and never changes over the planner's
/// lifetime. A planner may support both kinds; the loop prefers targeted
/// invalidation when available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlannerCapabilities {
    /// [`Planner::invalidate_all`] is implemented.
    pub full_invalidation: bool,
    /// [`Planner::invalidate_predecessors_of`] is implemented.
    pub targeted_invalidation: bool,
}

impl PlannerCapabilities {
    /// Only whole-search invalidation (non-incremental planners).
    pub const FULL: Self = Self {
        full_invalidation: true,
        targeted_invalidation: false,
    };

    /// Only targeted invalidation (incremental planners).
    pub const TARGETED: Self = Self {
        full_invalidation: false,
        targeted_invalidation: true,
    };

    /// Both kinds.
    pub const BOTH: Self = Self {
        full_invalidation: true,
        targeted_invalidation: true,
    };

    /// No change notifications at all.
    pub const NONE: Self = Self {
        full_invalidation: false,
        targeted_invalidation: false,
    };
}

/// Whether a replan stops at the first solution or keeps improving it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Spend the whole budget improving the solution bound.
    #[default]
    Anytime,
    /// Return as soon as any solution satisfying the initial bound exists.
    FirstSolution,
}

/// A bounded-time search planner.
///
/// # Contract
///
/// - `replan` is a blocking call; the budget is a deadline the planner is
///   trusted to respect. The loop never preempts it.
/// - A successful path starts at the current start state and ends at the
///   goal. Index 1, if present, is the next step.
/// - `invalidate_all` and `invalidate_predecessors_of` are only called if
///   [`capabilities`](Planner::capabilities) advertises them.
///
/// # Object safety
///
/// This trait is object-safe; the loop stores the planner as
/// `Box<dyn Planner>`.
pub trait Planner: Send + 'static {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Change notifications this planner understands.
    fn capabilities(&self) -> PlannerCapabilities;

    /// Set the search start (the agent pose).
    fn set_start(&mut self, state: StateId) -> Result<(), PlannerError>;

    /// Set the search goal.
    fn set_goal(&mut self, state: StateId) -> Result<(), PlannerError>;

    /// Suboptimality bound the first solution of a fresh search uses.
    fn set_initial_solution_eps(&mut self, eps: f64);

    /// Select first-solution or anytime behavior.
    fn set_search_mode(&mut self, mode: SearchMode);

    /// Search for a path from start to goal within `budget`.
    fn replan(
        &mut self,
        env: &dyn Environment,
        budget: Duration,
    ) -> Result<Vec<StateId>, PlannerError>;

    /// Suboptimality bound of the most recent solution.
    fn solution_eps(&self) -> f64;

    /// Discard all previous search effort.
    fn invalidate_all(&mut self) -> Result<(), PlannerError> {
        Err(PlannerError::Unsupported {
            capability: "invalidate_all",
        })
    }

    /// Discard search effort that depended on edges leaving `states`.
    fn invalidate_predecessors_of(&mut self, states: &StateSet) -> Result<(), PlannerError> {
        let _ = states;
        Err(PlannerError::Unsupported {
            capability: "invalidate_predecessors_of",
        })
    }
}
