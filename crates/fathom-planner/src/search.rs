//! Deadline-bounded weighted A*.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use fathom_core::{Environment, StateId};

/// Expansions between deadline checks.
const DEADLINE_CHECK_INTERVAL: u32 = 256;

/// Outcome of a single weighted search.
#[derive(Debug, PartialEq)]
pub(crate) enum SearchResult {
    /// A path whose cost is within `eps` of optimal.
    Found {
        /// States from start to goal inclusive.
        path: Vec<StateId>,
        /// Total edge cost.
        cost: u64,
        /// Number of states expanded.
        expansions: u64,
    },
    /// The open list emptied: the goal is unreachable under current costs.
    Exhausted,
    /// The deadline passed before the goal was expanded.
    TimedOut,
}

/// Run weighted A* (`f = g + eps * h`) from `start` to `goal`.
///
/// The deadline is polled every [`DEADLINE_CHECK_INTERVAL`] expansions,
/// so small searches always run to completion.
pub(crate) fn weighted_astar(
    env: &dyn Environment,
    start: StateId,
    goal: StateId,
    eps: f64,
    deadline: Instant,
) -> SearchResult {
    let n = env.state_count();
    if start.0 as usize >= n || goal.0 as usize >= n {
        return SearchResult::Exhausted;
    }
    let mut g = vec![u64::MAX; n];
    let mut parent: Vec<Option<StateId>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();

    let f = |g: u64, s: StateId| g + (eps * f64::from(env.heuristic(s, goal))) as u64;

    g[start.0 as usize] = 0;
    open.push(Reverse((f(0, start), 0u64, start.0)));

    let mut expansions: u64 = 0;
    let mut since_check = 0u32;

    while let Some(Reverse((_, gs, s))) = open.pop() {
        let si = s as usize;
        if closed[si] || gs > g[si] {
            continue;
        }
        if s == goal.0 {
            return SearchResult::Found {
                path: reconstruct(&parent, goal),
                cost: gs,
                expansions,
            };
        }
        closed[si] = true;
        expansions += 1;

        since_check += 1;
        if since_check >= DEADLINE_CHECK_INTERVAL {
            since_check = 0;
            if Instant::now() >= deadline {
                return SearchResult::TimedOut;
            }
        }

        for (t, c) in env.successors(StateId(s)) {
            let ti = t.0 as usize;
            if closed[ti] {
                continue;
            }
            let cand = gs + u64::from(c);
            if cand < g[ti] {
                g[ti] = cand;
                parent[ti] = Some(StateId(s));
                open.push(Reverse((f(cand, t), cand, t.0)));
            }
        }
    }
    SearchResult::Exhausted
}

fn reconstruct(parent: &[Option<StateId>], goal: StateId) -> Vec<StateId> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(p) = parent[cur.0 as usize] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom_core::Cell;
    use fathom_grid::{Connectivity, GridEnvironment};
    use fathom_test_utils::grid_from_ascii;
    use std::time::Duration;

    fn far() -> Instant {
        Instant::now() + Duration::from_secs(10)
    }

    fn env_from(map: &str, conn: Connectivity) -> GridEnvironment {
        GridEnvironment::new(grid_from_ascii(map).unwrap(), conn, 1)
    }

    #[test]
    fn straight_corridor_is_optimal() {
        let env = env_from("....", Connectivity::Four);
        let start = env.state_of_coord(Cell::new(0, 0)).unwrap();
        let goal = env.state_of_coord(Cell::new(3, 0)).unwrap();
        match weighted_astar(&env, start, goal, 1.0, far()) {
            SearchResult::Found { path, cost, .. } => {
                assert_eq!(path.len(), 4);
                assert_eq!(path[0], start);
                assert_eq!(*path.last().unwrap(), goal);
                assert_eq!(cost, 3000);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn start_equal_to_goal_is_single_state() {
        let env = env_from("...", Connectivity::Eight);
        let s = StateId(1);
        assert_eq!(
            weighted_astar(&env, s, s, 2.0, far()),
            SearchResult::Found {
                path: vec![s],
                cost: 0,
                expansions: 0
            }
        );
    }

    #[test]
    fn walled_goal_is_exhausted() {
        let env = env_from(
            "\
..#..
..#..
..#..",
            Connectivity::Eight,
        );
        let start = env.state_of_coord(Cell::new(0, 0)).unwrap();
        let goal = env.state_of_coord(Cell::new(4, 2)).unwrap();
        assert_eq!(
            weighted_astar(&env, start, goal, 1.0, far()),
            SearchResult::Exhausted
        );
    }

    #[test]
    fn inflated_search_stays_within_bound() {
        let env = env_from(
            "\
..........
.####.....
....#.###.
.##.#...#.
..#...#...",
            Connectivity::Eight,
        );
        let start = env.state_of_coord(Cell::new(0, 0)).unwrap();
        let goal = env.state_of_coord(Cell::new(9, 4)).unwrap();
        let cost_at = |eps| match weighted_astar(&env, start, goal, eps, far()) {
            SearchResult::Found { cost, .. } => cost,
            other => panic!("expected Found, got {other:?}"),
        };
        let optimal = cost_at(1.0);
        let inflated = cost_at(3.0);
        assert!(inflated >= optimal);
        assert!(inflated as f64 <= 3.0 * optimal as f64);
    }

    #[test]
    fn expired_deadline_times_out_large_search() {
        let grid = fathom_grid::CostGrid::new(200, 200, 0).unwrap();
        let env = GridEnvironment::new(grid, Connectivity::Eight, 1);
        let start = StateId(0);
        let goal = StateId(200 * 200 - 1);
        // A zero heuristic weight forces a wide Dijkstra sweep.
        assert_eq!(
            weighted_astar(&env, start, goal, 0.0, Instant::now()),
            SearchResult::TimedOut
        );
    }
}
