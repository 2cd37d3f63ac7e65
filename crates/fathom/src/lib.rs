//! Fathom: online navigation through partially known grid worlds.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Fathom sub-crates. For most users, adding `fathom` as a single dependency is
//! sufficient.
//!
//! An agent starts with an optimistic belief about the map, senses the
//! true costs around itself each cycle, tells its planner what changed,
//! replans within a fixed time budget, and takes one step.
//!
//! # Quick start
//!
//! ```rust
//! use fathom::prelude::*;
//!
//! // Ground truth the agent has never seen: a wall with a gap at the bottom.
//! let mut truth = CostGrid::new(10, 6, 0).unwrap();
//! for y in 0..5 {
//!     truth.set_cost(Cell::new(5, y), 255).unwrap();
//! }
//!
//! let mut config = NavConfig::new(truth, Cell::new(0, 0), Cell::new(9, 0));
//! config.connectivity = Connectivity::Eight;
//!
//! let planner = AnytimePlanner::builder()
//!     .state_count(60)
//!     .capabilities(PlannerCapabilities::TARGETED)
//!     .build()
//!     .unwrap();
//!
//! let mut nav = NavigationLoop::new(config, Box::new(planner)).unwrap();
//! let cycles = nav.run().unwrap();
//! assert_eq!(nav.pose(), Cell::new(9, 0));
//! assert!(cycles > 9);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fathom-core` | IDs, cells, errors, `Planner` and `Environment` traits |
//! | [`grid`] | `fathom-grid` | Cost grids, connectivity, the grid environment |
//! | [`planner`] | `fathom-planner` | Reference anytime planner |
//! | [`engine`] | `fathom-engine` | Sensor, notifier, scheduler, executor, loop driver, trace |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`fathom-core`).
///
/// Contains cells, state and cycle ids, the error taxonomy, and the two
/// collaborator contracts ([`types::Planner`], [`types::Environment`]).
pub use fathom_core as types;

/// Cost grids and the grid environment (`fathom-grid`).
///
/// [`grid::CostGrid`] stores costs; [`grid::GridEnvironment`] is the
/// belief-side [`types::Environment`] a planner searches over.
pub use fathom_grid as grid;

/// Reference planner (`fathom-planner`).
///
/// [`planner::AnytimePlanner`] is a small time-bounded anytime search.
/// Any other [`types::Planner`] implementation plugs in unchanged.
pub use fathom_planner as planner;

/// The navigation loop (`fathom-engine`).
///
/// [`engine::NavigationLoop`] drives the cycle; the stages are also
/// exposed individually for custom drivers.
pub use fathom_engine as engine;

/// Common imports for typical Fathom usage.
///
/// ```rust
/// use fathom::prelude::*;
/// ```
///
/// This imports the most frequently used types: the loop and its
/// configuration, grids, the planner contract, and the reference planner.
pub mod prelude {
    // Core types and traits
    pub use fathom_core::{
        Cell, CellChange, Cost, CycleId, Environment, Planner, PlannerCapabilities, SearchMode,
        StateId,
    };

    // Errors
    pub use fathom_core::{NavError, PlannerError};

    // Grid
    pub use fathom_grid::{Connectivity, CostGrid, GridEnvironment};

    // Planner
    pub use fathom_planner::AnytimePlanner;

    // Engine
    pub use fathom_engine::{
        CycleReport, CycleStatus, NavConfig, NavigationLoop, PlanTimeHistogram, TraceWriter,
    };
}
