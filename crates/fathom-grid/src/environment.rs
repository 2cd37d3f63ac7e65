//! [`GridEnvironment`]: the belief-side environment model.
//!
//! Owns the agent's working copy of the cost grid and answers every
//! query the planner and the navigation loop make against it. State ids
//! are row-major cell indices.

use fathom_core::{Cell, CellChange, Cost, EnvError, Environment, StateId, StateSet, Successors};

use crate::connectivity::{Connectivity, Move, DIAGONAL_UNITS, STRAIGHT_UNITS};
use crate::error::GridError;
use crate::grid::CostGrid;

/// A 2D navigation environment over a believed cost grid.
///
/// Edge cost for a move is `units * (max cost over source, swept cells and
/// target + 1)`. A move exists only if the source, every swept cell and
/// the target are in bounds and below the obstacle threshold.
#[derive(Clone, Debug)]
pub struct GridEnvironment {
    belief: CostGrid,
    connectivity: Connectivity,
    obstacle_threshold: Cost,
    start: Cell,
    goal: Cell,
}

impl GridEnvironment {
    /// Create an environment over `belief`. Start and goal default to
    /// `(0, 0)` until set.
    pub fn new(belief: CostGrid, connectivity: Connectivity, obstacle_threshold: Cost) -> Self {
        Self {
            belief,
            connectivity,
            obstacle_threshold,
            start: Cell::default(),
            goal: Cell::default(),
        }
    }

    /// Create an environment whose belief is uniformly `fill`.
    pub fn with_uniform_belief(
        width: u32,
        height: u32,
        fill: Cost,
        connectivity: Connectivity,
        obstacle_threshold: Cost,
    ) -> Result<Self, GridError> {
        let belief = CostGrid::new(width, height, fill)?;
        Ok(Self::new(belief, connectivity, obstacle_threshold))
    }

    /// The believed cost grid.
    pub fn belief(&self) -> &CostGrid {
        &self.belief
    }

    /// The planning neighbourhood.
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    fn passable(&self, cell: Cell) -> Option<Cost> {
        self.belief
            .cost(cell)
            .filter(|&c| c < self.obstacle_threshold)
    }

    /// Cost of taking `m` from `src`, or `None` if the move is blocked.
    fn edge_cost(&self, src: Cell, m: &Move) -> Option<u32> {
        let mut worst = self.passable(src)?;
        worst = worst.max(self.passable(src.offset(m.dx, m.dy))?);
        for &(vx, vy) in m.via {
            worst = worst.max(self.passable(src.offset(vx, vy))?);
        }
        Some(m.units * (u32::from(worst) + 1))
    }

    fn state(&self, cell: Cell) -> Option<StateId> {
        self.belief.index(cell).map(|i| StateId(i as u32))
    }
}

impl Environment for GridEnvironment {
    fn state_count(&self) -> usize {
        self.belief.len()
    }

    fn obstacle_threshold(&self) -> Cost {
        self.obstacle_threshold
    }

    fn cost(&self, cell: Cell) -> Option<Cost> {
        self.belief.cost(cell)
    }

    fn set_cost(&mut self, cell: Cell, cost: Cost) -> Result<(), EnvError> {
        self.belief
            .set_cost(cell, cost)
            .map(|_| ())
            .map_err(|_| EnvError::CellOutOfBounds { cell })
    }

    fn coord_of_state(&self, state: StateId) -> Option<Cell> {
        self.belief.cell_at(state.0 as usize)
    }

    fn state_of_coord(&self, cell: Cell) -> Option<StateId> {
        self.state(cell)
    }

    fn successors(&self, state: StateId) -> Successors {
        let mut out = Successors::new();
        let Some(src) = self.coord_of_state(state) else {
            return out;
        };
        for m in self.connectivity.moves() {
            if let Some(cost) = self.edge_cost(src, m) {
                if let Some(dst) = self.state(src.offset(m.dx, m.dy)) {
                    out.push((dst, cost));
                }
            }
        }
        out
    }

    fn predecessors(&self, state: StateId) -> Successors {
        let mut out = Successors::new();
        let Some(dst) = self.coord_of_state(state) else {
            return out;
        };
        for m in self.connectivity.moves() {
            let src = dst.offset(-m.dx, -m.dy);
            if let Some(cost) = self.edge_cost(src, m) {
                if let Some(id) = self.state(src) {
                    out.push((id, cost));
                }
            }
        }
        out
    }

    fn heuristic(&self, from: StateId, to: StateId) -> u32 {
        let (Some(a), Some(b)) = (self.coord_of_state(from), self.coord_of_state(to)) else {
            return 0;
        };
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        match self.connectivity {
            Connectivity::Four => STRAIGHT_UNITS * (dx + dy),
            Connectivity::Eight => {
                let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
                DIAGONAL_UNITS * lo + STRAIGHT_UNITS * (hi - lo)
            }
            // Knight moves cost slightly under 1000 per unit of Euclidean
            // length, so scale down to stay admissible.
            Connectivity::Sixteen => {
                let d = f64::from(dx).hypot(f64::from(dy));
                (d * 999.0) as u32
            }
        }
    }

    fn predecessors_of_changed_cells(&self, cells: &[CellChange]) -> StateSet {
        let mut affected = StateSet::new();
        for change in cells {
            let c = change.cell;
            for m in self.connectivity.moves() {
                // A move out of `p` touches p itself, its target and its
                // swept cells; `p` is affected if any of them is `c`.
                let touched = [(0, 0), (m.dx, m.dy)];
                for &(ox, oy) in touched.iter().chain(m.via) {
                    if let Some(id) = self.state(c.offset(-ox, -oy)) {
                        affected.insert(id);
                    }
                }
            }
        }
        affected
    }

    fn set_start(&mut self, cell: Cell) -> Result<StateId, EnvError> {
        let id = self.state(cell).ok_or(EnvError::CellOutOfBounds { cell })?;
        self.start = cell;
        Ok(id)
    }

    fn set_goal(&mut self, cell: Cell) -> Result<StateId, EnvError> {
        let id = self.state(cell).ok_or(EnvError::CellOutOfBounds { cell })?;
        self.goal = cell;
        Ok(id)
    }

    fn start(&self) -> Cell {
        self.start
    }

    fn goal(&self) -> Cell {
        self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open(w: u32, h: u32, conn: Connectivity) -> GridEnvironment {
        GridEnvironment::with_uniform_belief(w, h, 0, conn, 1).unwrap()
    }

    fn id(env: &GridEnvironment, x: i32, y: i32) -> StateId {
        env.state_of_coord(Cell::new(x, y)).unwrap()
    }

    #[test]
    fn state_ids_are_row_major() {
        let env = open(5, 4, Connectivity::Eight);
        assert_eq!(id(&env, 0, 0), StateId(0));
        assert_eq!(id(&env, 4, 0), StateId(4));
        assert_eq!(id(&env, 0, 1), StateId(5));
        assert_eq!(env.coord_of_state(StateId(19)), Some(Cell::new(4, 3)));
        assert_eq!(env.coord_of_state(StateId(20)), None);
        assert_eq!(env.state_of_coord(Cell::new(5, 0)), None);
    }

    #[test]
    fn interior_successor_counts() {
        for (conn, n) in [
            (Connectivity::Four, 4),
            (Connectivity::Eight, 8),
            (Connectivity::Sixteen, 16),
        ] {
            let env = open(7, 7, conn);
            assert_eq!(env.successors(id(&env, 3, 3)).len(), n, "{conn:?}");
        }
    }

    #[test]
    fn corner_successor_count_eight() {
        let env = open(5, 5, Connectivity::Eight);
        assert_eq!(env.successors(id(&env, 0, 0)).len(), 3);
    }

    #[test]
    fn edge_cost_scales_with_worst_cell() {
        let mut env =
            GridEnvironment::with_uniform_belief(3, 1, 0, Connectivity::Four, 10).unwrap();
        env.set_cost(Cell::new(1, 0), 4).unwrap();
        let succ = env.successors(id(&env, 0, 0));
        assert_eq!(succ.as_slice(), &[(id(&env, 1, 0), 5 * STRAIGHT_UNITS)]);
    }

    #[test]
    fn obstacles_block_moves_and_corners() {
        let mut env = open(3, 3, Connectivity::Eight);
        env.set_cost(Cell::new(1, 0), 255).unwrap();
        let succ: Vec<_> = env
            .successors(id(&env, 0, 0))
            .into_iter()
            .map(|(s, _)| env.coord_of_state(s).unwrap())
            .collect();
        // East is blocked and the diagonal would cut the blocked corner.
        assert_eq!(succ, vec![Cell::new(0, 1)]);
    }

    #[test]
    fn obstacle_cells_have_no_edges() {
        let mut env = open(3, 3, Connectivity::Eight);
        env.set_cost(Cell::new(1, 1), 1).unwrap();
        assert!(env.successors(id(&env, 1, 1)).is_empty());
        assert!(env.predecessors(id(&env, 1, 1)).is_empty());
    }

    #[test]
    fn predecessors_mirror_successors() {
        let mut env = open(6, 6, Connectivity::Sixteen);
        env.set_cost(Cell::new(2, 3), 200).unwrap();
        env.set_cost(Cell::new(4, 1), 7).unwrap();
        for s in 0..env.state_count() as u32 {
            for (t, c) in env.successors(StateId(s)) {
                assert!(
                    env.predecessors(t).contains(&(StateId(s), c)),
                    "edge {s}->{t} missing from predecessors"
                );
            }
        }
    }

    #[test]
    fn heuristic_never_overestimates_open_grid() {
        for conn in [Connectivity::Four, Connectivity::Eight, Connectivity::Sixteen] {
            let env = open(9, 9, conn);
            let goal = id(&env, 8, 8);
            // Brute-force Dijkstra from the goal over reversed edges.
            let mut dist = vec![u32::MAX; env.state_count()];
            dist[goal.0 as usize] = 0;
            let mut changed = true;
            while changed {
                changed = false;
                for s in 0..env.state_count() as u32 {
                    for (t, c) in env.successors(StateId(s)) {
                        let via = dist[t.0 as usize].saturating_add(c);
                        if via < dist[s as usize] {
                            dist[s as usize] = via;
                            changed = true;
                        }
                    }
                }
            }
            for s in 0..env.state_count() as u32 {
                assert!(env.heuristic(StateId(s), goal) <= dist[s as usize], "{conn:?} at {s}");
            }
        }
    }

    #[test]
    fn changed_cell_predecessors_cover_touching_edges() {
        let mut env = open(7, 7, Connectivity::Sixteen);
        let changed = Cell::new(3, 3);
        let before: Vec<_> = (0..env.state_count() as u32)
            .map(|s| env.successors(StateId(s)))
            .collect();
        env.set_cost(changed, 5).unwrap();
        let affected = env.predecessors_of_changed_cells(&[CellChange {
            cell: changed,
            cost: 5,
        }]);
        for s in 0..env.state_count() as u32 {
            if env.successors(StateId(s)) != before[s as usize] {
                assert!(affected.contains(&StateId(s)), "state {s} changed but not reported");
            }
        }
    }

    #[test]
    fn changed_cell_predecessors_are_clipped_and_unique() {
        let env = open(4, 4, Connectivity::Eight);
        let changes = [
            CellChange {
                cell: Cell::new(0, 0),
                cost: 9,
            },
            CellChange {
                cell: Cell::new(1, 0),
                cost: 9,
            },
        ];
        let affected = env.predecessors_of_changed_cells(&changes);
        // Union of the 3x3 blocks around (0,0) and (1,0), clipped.
        assert_eq!(affected.len(), 6);
        for s in &affected {
            assert!(env.coord_of_state(*s).is_some());
        }
    }

    #[test]
    fn set_start_and_goal_reject_out_of_bounds() {
        let mut env = open(3, 3, Connectivity::Four);
        assert_eq!(env.set_start(Cell::new(2, 2)), Ok(StateId(8)));
        assert_eq!(env.start(), Cell::new(2, 2));
        assert_eq!(
            env.set_goal(Cell::new(3, 0)),
            Err(EnvError::CellOutOfBounds {
                cell: Cell::new(3, 0)
            })
        );
        assert_eq!(env.goal(), Cell::new(0, 0));
    }

    proptest! {
        #[test]
        fn state_coord_round_trip(w in 1u32..20, h in 1u32..20, s in 0u32..400) {
            let env = open(w, h, Connectivity::Eight);
            match env.coord_of_state(StateId(s)) {
                Some(cell) => prop_assert_eq!(env.state_of_coord(cell), Some(StateId(s))),
                None => prop_assert!(s as usize >= env.state_count()),
            }
        }
    }
}
