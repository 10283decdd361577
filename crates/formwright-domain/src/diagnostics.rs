//! Run-scoped diagnostics sink
//!
//! Absorbed failures (unreadable sources, provider fallbacks, parse errors,
//! write failures) are recorded here instead of being raised. Every entry
//! is mirrored to `tracing` so operators see it in the logs as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Severity of a diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Detail useful when debugging
    Debug,
    /// Normal progress information
    Info,
    /// Degraded but continuing
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        f.write_str(s)
    }
}

/// One recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Component that produced the entry (e.g. `sources`, `extractor`)
    pub component: String,
    /// Human-readable message
    pub message: String,
}

/// Ordered, append-only diagnostics for a single run
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry
    pub fn record(&self, severity: Severity, component: &str, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Debug => debug!(component, "{}", message),
            Severity::Info => info!(component, "{}", message),
            Severity::Warning => warn!(component, "{}", message),
        }

        let entry = Diagnostic {
            severity,
            component: component.to_string(),
            message,
        };
        // A poisoned lock still holds valid entries
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }

    /// Record a debug entry
    pub fn debug(&self, component: &str, message: impl Into<String>) {
        self.record(Severity::Debug, component, message);
    }

    /// Record an info entry
    pub fn info(&self, component: &str, message: impl Into<String>) {
        self.record(Severity::Info, component, message);
    }

    /// Record a warning
    pub fn warn(&self, component: &str, message: impl Into<String>) {
        self.record(Severity::Warning, component, message);
    }

    /// Snapshot of all entries in recording order
    pub fn entries(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Snapshot of warnings only
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.entries()
            .into_iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let diagnostics = Diagnostics::new();
        diagnostics.info("sources", "read notes.txt");
        diagnostics.warn("extractor", "provider fell back");
        diagnostics.debug("refiner", "iteration 2");

        let entries = diagnostics.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].component, "sources");
        assert_eq!(entries[1].severity, Severity::Warning);
        assert_eq!(diagnostics.warnings().len(), 1);
    }
}
