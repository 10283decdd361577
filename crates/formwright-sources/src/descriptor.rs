//! Source descriptors

use std::fmt;
use std::path::PathBuf;

/// One input source, already classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Literal text used as-is
    Text(String),
    /// Local file read by extension
    File(PathBuf),
    /// Remote page fetched and stripped of markup
    Url(String),
    /// Nothing to read
    Empty,
}

impl SourceDescriptor {
    /// Whether the descriptor contributes nothing
    pub fn is_empty(&self) -> bool {
        match self {
            SourceDescriptor::Empty => true,
            SourceDescriptor::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDescriptor::Text(text) => write!(f, "text ({} chars)", text.chars().count()),
            SourceDescriptor::File(path) => write!(f, "{}", path.display()),
            SourceDescriptor::Url(url) => f.write_str(url),
            SourceDescriptor::Empty => f.write_str("(empty)"),
        }
    }
}
