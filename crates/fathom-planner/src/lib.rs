//! Reference planner for the Fathom navigation loop.
//!
//! [`AnytimePlanner`] implements the [`Planner`](fathom_core::Planner)
//! contract with repeated deadline-bounded weighted-A* searches over any
//! [`Environment`](fathom_core::Environment). Its invalidation
//! capabilities are chosen at construction, so the same planner can
//! stand in for a non-incremental (full invalidation) or an incremental
//! (targeted invalidation) search.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod anytime;
mod search;

pub use anytime::{AnytimePlanner, AnytimePlannerBuilder};
