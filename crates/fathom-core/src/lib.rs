//! Core types and traits for the Fathom navigation loop.
//!
//! This is the leaf crate with no internal dependencies. It defines
//! the vocabulary shared by every other Fathom crate: state and cycle
//! identifiers, grid cells and costs, the error taxonomy, and the two
//! collaborator contracts the control loop is written against
//! ([`Planner`] and [`Environment`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod id;
pub mod traits;

pub use cell::{Cell, CellChange, Cost};
pub use error::{EnvError, NavError, PlannerError, StateRole};
pub use id::{CycleId, StateId, StateSet};
pub use traits::{Environment, Planner, PlannerCapabilities, SearchMode, Successors};
