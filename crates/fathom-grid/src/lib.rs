//! Cost grids and the grid environment model for Fathom.
//!
//! # Types
//!
//! - [`CostGrid`]: dense row-major grid of `u8` costs, used for both
//!   ground truth and belief
//! - [`Connectivity`]: 4-, 8- or 16-connected move tables
//! - [`GridEnvironment`]: the [`Environment`](fathom_core::Environment)
//!   implementation the planner searches over

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod connectivity;
pub mod environment;
pub mod error;
pub mod grid;

pub use connectivity::{Connectivity, Move};
pub use environment::GridEnvironment;
pub use error::GridError;
pub use grid::CostGrid;
