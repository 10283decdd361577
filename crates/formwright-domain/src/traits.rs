//! Trait definitions for the external form tool
//!
//! Implemented by the infrastructure layer (formwright-pdftk).

use crate::diagnostics::Diagnostics;
use crate::error::{SchemaError, WriteError};
use crate::field::FieldSchema;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

/// Reads a target form's field schema
#[async_trait]
pub trait FormSchemaReader: Send + Sync {
    /// Ordered list of fields declared by the form at `form`
    ///
    /// Recoverable oddities in the form (unknown field types, duplicate
    /// names) are recorded in `diagnostics`.
    async fn read_schema(
        &self,
        form: &Path,
        diagnostics: &Diagnostics,
    ) -> Result<Vec<FieldSchema>, SchemaError>;
}

/// Writes a populated copy of a target form
#[async_trait]
pub trait FormWriter: Send + Sync {
    /// Write `values` into a copy of `form` at `destination`
    ///
    /// Empty values are not written.
    async fn write_form(
        &self,
        form: &Path,
        values: &BTreeMap<String, String>,
        destination: &Path,
    ) -> Result<(), WriteError>;
}
