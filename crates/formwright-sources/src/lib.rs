//! Formwright Source Layer
//!
//! Turns heterogeneous inputs (literal text, local files, web pages) into
//! the single [`SourceCorpus`](formwright_domain::SourceCorpus) an extraction
//! run works from, and resolves command-line locators (paths, directories,
//! glob patterns, environment base directories) into source descriptors.
//!
//! Per-source failures never abort aggregation: they are recorded in the
//! run's diagnostics and replaced by a short inline note.

#![warn(missing_docs)]

pub mod aggregator;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod glob;
pub mod markup;
pub mod readers;
pub mod resolve;

pub use aggregator::SourceAggregator;
pub use config::SourceConfig;
pub use descriptor::SourceDescriptor;
pub use error::{Result, SourceError};
pub use resolve::{BaseDirs, ExpandOptions, LocatorResolver};
