//! One-step motion execution with a ground-truth safety check.

use fathom_core::{Cell, Environment, NavError, Planner, StateId};
use fathom_grid::CostGrid;
use tracing::debug;

/// What the executor did with a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The path had no next step; the agent stayed put.
    Held,
    /// The agent advanced one step.
    Moved {
        /// Pose before the step.
        from: Cell,
        /// Pose after the step.
        to: Cell,
    },
}

/// Advance `pose` to `path[1]`, keeping the environment and planner in
/// sync with the new pose.
///
/// The destination is checked against ground truth, not belief. On
/// success the environment start and the planner start both equal the
/// new pose.
///
/// # Errors
///
/// - [`NavError::Desynchronization`] if `path[1]` has no coordinates, or
///   the environment or planner rejects the new start. In the latter
///   case `pose` has already advanced.
/// - [`NavError::UnsafeMove`] if the destination is a ground-truth
///   obstacle. `pose` is unchanged.
pub fn execute_step(
    path: &[StateId],
    pose: &mut Cell,
    truth: &CostGrid,
    env: &mut dyn Environment,
    planner: &mut dyn Planner,
) -> Result<StepOutcome, NavError> {
    let Some(&next) = path.get(1) else {
        return Ok(StepOutcome::Held);
    };
    let desync = NavError::Desynchronization { state: next };

    let to = env.coord_of_state(next).ok_or_else(|| desync.clone())?;
    let cost = truth.cost(to).ok_or_else(|| desync.clone())?;
    if cost >= env.obstacle_threshold() {
        return Err(NavError::UnsafeMove { cell: to, cost });
    }

    let from = *pose;
    *pose = to;
    debug!(%from, %to, "moved");

    env.set_start(to).map_err(|_| desync.clone())?;
    planner.set_start(next).map_err(|_| desync)?;
    Ok(StepOutcome::Moved { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom_grid::{Connectivity, GridEnvironment};
    use fathom_test_utils::{grid_from_ascii, PlannerCall, RecordingPlanner, ScriptedPlanner};

    fn setup() -> (CostGrid, GridEnvironment) {
        let truth = grid_from_ascii(
            "
            ..#
            ...
            ",
        )
        .unwrap();
        let env = GridEnvironment::with_uniform_belief(3, 2, 0, Connectivity::Eight, 1).unwrap();
        (truth, env)
    }

    fn id(env: &GridEnvironment, x: i32, y: i32) -> StateId {
        env.state_of_coord(Cell::new(x, y)).unwrap()
    }

    #[test]
    fn short_path_holds_position() {
        let (truth, mut env) = setup();
        let mut planner = RecordingPlanner::new(ScriptedPlanner::new(vec![]));
        let log = planner.log();
        let mut pose = Cell::new(0, 0);
        for path in [vec![], vec![id(&env, 0, 0)]] {
            let out = execute_step(&path, &mut pose, &truth, &mut env, &mut planner).unwrap();
            assert_eq!(out, StepOutcome::Held);
        }
        assert_eq!(pose, Cell::new(0, 0));
        assert!(log.calls().is_empty());
    }

    #[test]
    fn move_syncs_environment_and_planner() {
        let (truth, mut env) = setup();
        let mut planner = RecordingPlanner::new(ScriptedPlanner::new(vec![]));
        let log = planner.log();
        let mut pose = Cell::new(0, 0);
        let path = vec![id(&env, 0, 0), id(&env, 1, 1), id(&env, 2, 1)];
        let out = execute_step(&path, &mut pose, &truth, &mut env, &mut planner).unwrap();
        assert_eq!(
            out,
            StepOutcome::Moved {
                from: Cell::new(0, 0),
                to: Cell::new(1, 1)
            }
        );
        assert_eq!(pose, Cell::new(1, 1));
        assert_eq!(env.start(), Cell::new(1, 1));
        assert_eq!(log.calls(), vec![PlannerCall::SetStart(id(&env, 1, 1))]);
    }

    #[test]
    fn obstacle_in_ground_truth_aborts() {
        // Belief says (2, 0) is free; ground truth disagrees.
        let (truth, mut env) = setup();
        let mut planner = ScriptedPlanner::new(vec![]);
        let mut pose = Cell::new(1, 0);
        let path = vec![id(&env, 1, 0), id(&env, 2, 0)];
        let err = execute_step(&path, &mut pose, &truth, &mut env, &mut planner).unwrap_err();
        assert_eq!(
            err,
            NavError::UnsafeMove {
                cell: Cell::new(2, 0),
                cost: 255
            }
        );
        assert_eq!(pose, Cell::new(1, 0));
    }

    #[test]
    fn unknown_state_is_desynchronization() {
        let (truth, mut env) = setup();
        let mut planner = ScriptedPlanner::new(vec![]);
        let mut pose = Cell::new(0, 0);
        let path = vec![StateId(0), StateId(99)];
        assert_eq!(
            execute_step(&path, &mut pose, &truth, &mut env, &mut planner),
            Err(NavError::Desynchronization { state: StateId(99) })
        );
        assert_eq!(pose, Cell::new(0, 0));
    }

    #[test]
    fn rejected_start_is_desynchronization() {
        let (truth, mut env) = setup();
        let mut planner = ScriptedPlanner::new(vec![]).rejecting_start_after(0);
        let mut pose = Cell::new(0, 0);
        let next = id(&env, 1, 0);
        let path = vec![StateId(0), next];
        assert_eq!(
            execute_step(&path, &mut pose, &truth, &mut env, &mut planner),
            Err(NavError::Desynchronization { state: next })
        );
    }
}
