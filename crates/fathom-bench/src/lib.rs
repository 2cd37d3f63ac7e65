//! Benchmark profiles and utilities for the Fathom navigation loop.
//!
//! Provides seeded random maps and pre-built [`NavConfig`] profiles for
//! benchmarking and examples:
//!
//! - [`random_obstacle_grid`]: reproducible obstacle scatter from a seed
//! - [`reference_profile`]: 64x64 map, corner to corner
//! - [`stress_profile`]: 256x256 map, corner to corner
//! - [`reference_planner`]: the anytime planner sized for a profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Duration;

use fathom_core::{Cell, PlannerCapabilities};
use fathom_engine::NavConfig;
use fathom_grid::{Connectivity, CostGrid};
use fathom_planner::AnytimePlanner;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Cost written for obstacles in generated maps.
pub const OBSTACLE: u8 = 255;

/// Scatter obstacles over a `width` x `height` grid.
///
/// Each cell independently becomes an obstacle with probability
/// `density`; the same seed always yields the same grid.
///
/// # Errors
///
/// Returns `Err` if `density` is outside `[0, 1]` or the dimensions are
/// rejected by [`CostGrid::new`].
pub fn random_obstacle_grid(
    width: u32,
    height: u32,
    density: f64,
    seed: u64,
) -> Result<CostGrid, String> {
    if !(0.0..=1.0).contains(&density) {
        return Err(format!("density must be in [0, 1], got {density}"));
    }
    let mut grid = CostGrid::new(width, height, 0).map_err(|e| e.to_string())?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for index in 0..grid.len() {
        if rng.random::<f64>() < density {
            if let Some(cell) = grid.cell_at(index) {
                grid.set_cost(cell, OBSTACLE).map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(grid)
}

/// Clear a 3x3 patch around `center` so endpoints are never boxed in.
fn clear_around(grid: &mut CostGrid, center: Cell) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            let _ = grid.set_cost(center.offset(dx, dy), 0);
        }
    }
}

fn corner_profile(side: u32, density: f64, seed: u64) -> Result<NavConfig, String> {
    let far = side as i32 - 1;
    let start = Cell::new(0, 0);
    let goal = Cell::new(far, far);
    let mut grid = random_obstacle_grid(side, side, density, seed)?;
    clear_around(&mut grid, start);
    clear_around(&mut grid, goal);

    let mut config = NavConfig::new(grid, start, goal);
    config.connectivity = Connectivity::Eight;
    config.replan_budget = Duration::from_millis(200);
    config.max_cycles = Some(u64::from(side) * u64::from(side));
    Ok(config)
}

/// Build a reference benchmark profile: 64x64 grid (4K cells), 20%
/// obstacles, start at the top-left corner and goal at the bottom-right.
pub fn reference_profile(seed: u64) -> Result<NavConfig, String> {
    corner_profile(64, 0.2, seed)
}

/// Build a stress benchmark profile: 256x256 grid (~65K cells).
///
/// Same layout as [`reference_profile`] at 16x the cell count.
pub fn stress_profile(seed: u64) -> Result<NavConfig, String> {
    corner_profile(256, 0.2, seed)
}

/// Anytime planner sized for `config`'s grid.
pub fn reference_planner(
    config: &NavConfig,
    capabilities: PlannerCapabilities,
) -> Result<AnytimePlanner, String> {
    AnytimePlanner::builder()
        .state_count(config.ground_truth.len())
        .capabilities(capabilities)
        .build()
}
