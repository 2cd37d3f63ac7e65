//! Fathom Quickstart: navigate a partially known map end to end.
//!
//! Demonstrates:
//!   1. Building a ground-truth grid the agent does not know about
//!   2. Configuring a NavConfig and the reference anytime planner
//!   3. Stepping the loop manually and printing what each cycle saw
//!   4. Writing the solution trace with its timing summary
//!
//! Run with:
//!   RUST_LOG=fathom_engine=debug cargo run --example quickstart

use std::time::Duration;

use fathom_core::{Cell, PlannerCapabilities};
use fathom_engine::{CycleStatus, Invalidation, NavConfig, NavigationLoop, TraceWriter};
use fathom_grid::{Connectivity, CostGrid};
use fathom_planner::AnytimePlanner;

// ─── Map ────────────────────────────────────────────────────────

const WIDTH: u32 = 16;
const HEIGHT: u32 = 10;
const WALL: u8 = 255;

/// An L-shaped wall between start and goal, plus a patch of rough ground.
fn ground_truth() -> Result<CostGrid, Box<dyn std::error::Error>> {
    let mut grid = CostGrid::new(WIDTH, HEIGHT, 0)?;
    for y in 0..8 {
        grid.set_cost(Cell::new(8, y), WALL)?;
    }
    for x in 3..8 {
        grid.set_cost(Cell::new(x, 7), WALL)?;
    }
    for (x, y) in [(10, 8), (11, 8), (10, 9), (11, 9)] {
        grid.set_cost(Cell::new(x, y), 3)?;
    }
    Ok(grid)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fathom_engine=info".parse()?),
        )
        .init();

    // ─── Configure ──────────────────────────────────────────────

    let truth = ground_truth()?;
    let mut config = NavConfig::new(truth.clone(), Cell::new(1, 1), Cell::new(14, 2));
    config.connectivity = Connectivity::Eight;
    config.obstacle_threshold = 10;
    config.replan_budget = Duration::from_millis(100);
    config.max_cycles = Some(200);

    let planner = AnytimePlanner::builder()
        .name("anytime")
        .state_count(truth.len())
        .capabilities(PlannerCapabilities::TARGETED)
        .build()?;

    // ─── Step by hand ───────────────────────────────────────────

    let mut nav = NavigationLoop::new(config.clone(), Box::new(planner))?;
    loop {
        let report = nav.step()?;
        match report.status {
            CycleStatus::Arrived => break,
            CycleStatus::Moved { from, to } => {
                let told = match &report.invalidation {
                    Invalidation::None => "nothing".to_string(),
                    Invalidation::Full => "invalidate all".to_string(),
                    Invalidation::Targeted { states } => format!("{} states", states.len()),
                };
                println!(
                    "cycle {:>3}: {from} -> {to}  sensed {} change(s), planner told {told}",
                    report.cycle,
                    report.changes.len(),
                );
            }
            CycleStatus::Held => println!("cycle {:>3}: held", report.cycle),
        }
    }
    println!("arrived at {} after {} cycles", nav.pose(), nav.cycle());
    println!("{}", nav.histogram());

    // ─── Same run, traced ───────────────────────────────────────

    let planner = AnytimePlanner::builder()
        .state_count(truth.len())
        .capabilities(PlannerCapabilities::FULL)
        .build()?;
    let mut nav = NavigationLoop::new(config, Box::new(planner))?;
    let mut trace = TraceWriter::new(Vec::new());
    nav.run_traced(&mut trace)?;
    print!("{}", String::from_utf8(trace.into_inner())?);

    Ok(())
}
