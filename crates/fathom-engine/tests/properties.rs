//! Property tests: loop invariants over random obstacle maps.

use std::collections::VecDeque;

use fathom_core::{Cell, Environment, NavError, PlannerCapabilities, StateId};
use fathom_engine::{CycleStatus, Invalidation, NavConfig, NavigationLoop, SENSOR_RADIUS};
use fathom_grid::{Connectivity, CostGrid, GridEnvironment};
use fathom_planner::AnytimePlanner;
use fathom_test_utils::{PlannerCall, RecordingPlanner, WALL};
use proptest::prelude::*;

const SIDE: u32 = 8;
const CYCLE_CAP: u64 = 400;

/// Is `goal` reachable from `start` when every cost is known?
fn reachable(truth: &CostGrid, conn: Connectivity, start: Cell, goal: Cell) -> bool {
    let env = GridEnvironment::new(truth.clone(), conn, 1);
    let (Some(s), Some(g)) = (env.state_of_coord(start), env.state_of_coord(goal)) else {
        return false;
    };
    let mut seen = vec![false; env.state_count()];
    let mut queue = VecDeque::from([s]);
    seen[s.0 as usize] = true;
    while let Some(cur) = queue.pop_front() {
        if cur == g {
            return true;
        }
        for (next, _) in env.successors(cur) {
            if !seen[next.0 as usize] {
                seen[next.0 as usize] = true;
                queue.push_back(next);
            }
        }
    }
    false
}

fn arb_world() -> impl Strategy<Value = (CostGrid, Connectivity)> {
    let cells = (SIDE * SIDE) as usize;
    (
        prop::collection::vec(prop::bool::weighted(0.25), cells),
        prop_oneof![
            Just(Connectivity::Four),
            Just(Connectivity::Eight),
            Just(Connectivity::Sixteen),
        ],
    )
        .prop_map(|(walls, conn)| {
            let mut grid = CostGrid::new(SIDE, SIDE, 0).unwrap();
            for (i, wall) in walls.into_iter().enumerate() {
                if wall {
                    let cell = grid.cell_at(i).unwrap();
                    grid.set_cost(cell, WALL).unwrap();
                }
            }
            let corner = (SIDE - 1) as i32;
            grid.set_cost(Cell::new(0, 0), 0).unwrap();
            grid.set_cost(Cell::new(corner, corner), 0).unwrap();
            (grid, conn)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn loop_invariants_hold((truth, conn) in arb_world(), targeted in any::<bool>()) {
        let goal = Cell::new((SIDE - 1) as i32, (SIDE - 1) as i32);
        let mut config = NavConfig::new(truth.clone(), Cell::new(0, 0), goal);
        config.connectivity = conn;
        config.max_cycles = Some(CYCLE_CAP);

        let caps = if targeted {
            PlannerCapabilities::TARGETED
        } else {
            PlannerCapabilities::FULL
        };
        let planner = AnytimePlanner::builder()
            .state_count(truth.len())
            .capabilities(caps)
            .build()
            .unwrap();
        let planner = RecordingPlanner::new(planner);
        let log = planner.log();
        let mut nav = NavigationLoop::new(config, Box::new(planner)).unwrap();

        let outcome = loop {
            let report = match nav.step() {
                Ok(report) => report,
                Err(e) => break Err(e),
            };
            if report.status == CycleStatus::Arrived {
                break Ok(());
            }

            // Sensing bound and no duplicate notifications.
            for (i, c) in report.changes.iter().enumerate() {
                prop_assert!(report.pose.chebyshev(c.cell) <= SENSOR_RADIUS as u32);
                prop_assert!(report.changes[i + 1..].iter().all(|o| o.cell != c.cell));
            }

            // Belief convergence: the sensed window now matches ground truth.
            for dx in -SENSOR_RADIUS..=SENSOR_RADIUS {
                for dy in -SENSOR_RADIUS..=SENSOR_RADIUS {
                    let cell = report.pose.offset(dx, dy);
                    if let Some(cost) = truth.cost(cell) {
                        prop_assert_eq!(nav.environment().cost(cell), Some(cost));
                    }
                }
            }

            // Safety and start synchronization.
            if let CycleStatus::Moved { to, .. } = report.status {
                prop_assert!(truth.cost(to).unwrap() < WALL);
                let last_start = log.calls().into_iter().rev().find_map(|c| match c {
                    PlannerCall::SetStart(s) => Some(s),
                    _ => None,
                });
                prop_assert_eq!(last_start, nav.pose_state());
            }
        };

        // Termination: arrival iff the goal is reachable in ground truth.
        match outcome {
            Ok(()) => prop_assert_eq!(nav.pose(), goal),
            Err(NavError::NoSolutionFound { .. }) => {
                prop_assert!(!reachable(&truth, conn, nav.pose(), goal));
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn known_map_sees_no_changes((truth, conn) in arb_world()) {
        let start = Cell::new(0, 0);
        let goal = Cell::new((SIDE - 1) as i32, (SIDE - 1) as i32);
        prop_assume!(reachable(&truth, conn, start, goal));

        // The agent starts out knowing the map exactly.
        let mut config = NavConfig::new(truth.clone(), start, goal);
        config.connectivity = conn;
        config.prior = Some(truth.clone());
        config.max_cycles = Some(CYCLE_CAP);
        let planner = RecordingPlanner::new(
            AnytimePlanner::builder()
                .state_count(truth.len())
                .capabilities(PlannerCapabilities::BOTH)
                .build()
                .unwrap(),
        );
        let log = planner.log();
        let mut nav = NavigationLoop::new(config, Box::new(planner)).unwrap();

        let mut cycles = 0;
        loop {
            let report = nav.step().unwrap();
            if report.status == CycleStatus::Arrived {
                break;
            }
            cycles += 1;
            prop_assert!(report.changes.is_empty());
            prop_assert_eq!(report.invalidation, Invalidation::None);
        }
        prop_assert_eq!(log.invalidations(), 0);
        prop_assert_eq!(log.replans(), cycles);
        prop_assert_eq!(nav.pose_state(), Some(StateId(SIDE * SIDE - 1)));
    }
}
