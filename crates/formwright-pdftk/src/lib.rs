//! Formwright pdftk adapters
//!
//! Implements the form-tool boundary with the `pdftk` command-line tool:
//!
//! - [`FormSchemaReader`](formwright_domain::traits::FormSchemaReader) via
//!   `pdftk <form> dump_data_fields`
//! - [`FormWriter`](formwright_domain::traits::FormWriter) via an FDF 1.2
//!   document and `pdftk <form> fill_form <fdf> output <dest>`
//!
//! A missing pdftk binary is reported as a tool-unavailable error with
//! installation hints, distinct from a form pdftk cannot read.

#![warn(missing_docs)]

mod config;
mod dump;
mod error;
mod fdf;
mod form;
mod runner;

pub use config::PdftkConfig;
pub use dump::{parse_field_dump, FieldDump};
pub use error::{PdftkError, INSTALL_HINT};
pub use fdf::{escape_literal, render_fdf};
pub use form::PdftkForm;
