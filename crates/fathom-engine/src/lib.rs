//! Online navigation control loop for Fathom.
//!
//! Provides [`NavigationLoop`], which repeatedly senses the world around
//! the agent, corrects its belief, notifies the planner, replans within
//! a fixed time budget, and executes a single step. The loop is
//! single-threaded and synchronous; every error is fatal.
//!
//! The individual stages are exposed as free functions ([`sense`],
//! [`notify`], [`replan_once`], [`execute_step`]) so that custom drivers
//! and tests can run them in isolation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod executor;
pub mod metrics;
pub mod notifier;
pub mod scheduler;
pub mod sensor;
pub mod trace;

pub use config::{ConfigError, NavConfig, DEFAULT_INITIAL_EPSILON, DEFAULT_REPLAN_BUDGET};
pub use driver::{CycleReport, CycleStatus, NavigationLoop};
pub use executor::{execute_step, StepOutcome};
pub use metrics::{CycleMetrics, PlanTimeHistogram};
pub use notifier::{notify, Invalidation};
pub use scheduler::{replan_once, ReplanOutcome};
pub use sensor::{sense, SENSOR_RADIUS};
pub use trace::TraceWriter;
