//! Formwright Refiner
//!
//! The refinement orchestrator: resolves the form schema, builds the source
//! corpus once, runs the chosen extraction provider, then alternates quality
//! assessment and correction until the quality gate is met, the assessor has
//! nothing left to propose, or the iteration bound is reached.
//!
//! # State machine
//!
//! ```text
//! Initializing -> Extracting -> Assessing <-> Correcting -> Finalizing -> Done
//!       \______________________________________________________________-> Failed
//! ```
//!
//! Only a missing schema (or an invalid iteration bound) fails a run. Source,
//! provider and output problems are recorded in the run's diagnostics; a
//! failed write is reported separately and keeps `success = true`.
//!
//! # Configuration
//!
//! ```toml
//! max_iterations = 3
//! quality_gate = 0.9
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod refiner;
mod report;

pub use config::RefinerConfig;
pub use error::RefineError;
pub use refiner::Refiner;
pub use report::{OutputStatus, RunReport, RunRequest};
