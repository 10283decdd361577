//! Aggregated source corpus for one run

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Content contributed by one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SourceContent {
    /// Readable text (possibly a diagnostic placeholder)
    Text(String),
    /// Binary document left for a capable provider to analyse natively
    BinaryRef(PathBuf),
}

/// One source's contribution, with the origin shown in its header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSegment {
    /// Short, possibly truncated identifier of the source
    pub origin: String,
    /// Resolved content
    pub content: SourceContent,
}

impl CorpusSegment {
    fn body(&self, binaries: BinaryRendering) -> Option<String> {
        match (&self.content, binaries) {
            (SourceContent::Text(text), _) => Some(text.clone()),
            (SourceContent::BinaryRef(path), BinaryRendering::Token) => {
                Some(format!("[Binary document: {}]", path.display()))
            }
            (SourceContent::BinaryRef(_), BinaryRendering::Omit) => None,
        }
    }
}

/// How binary references are rendered into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryRendering {
    /// Render as a `[Binary document: <path>]` token
    Token,
    /// Leave them out (used when the binary travels as an attachment)
    Omit,
}

/// Concatenated corpus built once per run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCorpus {
    segments: Vec<CorpusSegment>,
}

impl SourceCorpus {
    /// Empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Corpus from a single literal text
    pub fn from_text(origin: impl Into<String>, text: impl Into<String>) -> Self {
        let mut corpus = Self::new();
        corpus.push(origin, SourceContent::Text(text.into()));
        corpus
    }

    /// Append a segment
    pub fn push(&mut self, origin: impl Into<String>, content: SourceContent) {
        self.segments.push(CorpusSegment {
            origin: origin.into(),
            content,
        });
    }

    /// All segments in source order
    pub fn segments(&self) -> &[CorpusSegment] {
        &self.segments
    }

    /// Whether there are no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Paths of binary documents referenced by the corpus
    pub fn binary_refs(&self) -> Vec<&Path> {
        self.segments
            .iter()
            .filter_map(|s| match &s.content {
                SourceContent::BinaryRef(path) => Some(path.as_path()),
                SourceContent::Text(_) => None,
            })
            .collect()
    }

    /// Render the corpus as one text blob
    ///
    /// Each segment is preceded by an `=== Source: <origin> ===` header.
    pub fn render(&self, binaries: BinaryRendering) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let Some(body) = segment.body(binaries) else {
                continue;
            };
            out.push_str("\n\n=== Source: ");
            out.push_str(&segment.origin);
            out.push_str(" ===\n");
            out.push_str(&body);
        }
        out
    }

    /// Headed rendering with binary tokens, as shown to a model
    pub fn text(&self) -> String {
        self.render(BinaryRendering::Token)
    }

    /// Segment bodies only, for rule-based matching
    ///
    /// Headers and binary references are left out so that source names and
    /// paths can never be matched as field values.
    pub fn content_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| segment.body(BinaryRendering::Omit))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Truncate an identifier for use in a segment header
///
/// Identifiers longer than `max_chars` are cut and suffixed with `...`.
pub fn truncate_origin(identifier: &str, max_chars: usize) -> String {
    if identifier.chars().count() <= max_chars {
        identifier.to_string()
    } else {
        let cut: String = identifier.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_headers() {
        let mut corpus = SourceCorpus::new();
        corpus.push("notes.txt", SourceContent::Text("Case Number: 24STFL00615".into()));
        corpus.push("intake.pdf", SourceContent::BinaryRef(PathBuf::from("/data/intake.pdf")));

        let text = corpus.text();
        assert!(text.contains("=== Source: notes.txt ===\nCase Number: 24STFL00615"));
        assert!(text.contains("[Binary document: /data/intake.pdf]"));

        let omitted = corpus.render(BinaryRendering::Omit);
        assert!(!omitted.contains("intake.pdf"));
        assert!(omitted.contains("24STFL00615"));
    }

    #[test]
    fn test_content_text_has_no_headers() {
        let mut corpus = SourceCorpus::new();
        corpus.push("/data/client_names.txt", SourceContent::Text("Name: Maria Lopez".into()));
        corpus.push("intake.pdf", SourceContent::BinaryRef(PathBuf::from("/data/intake.pdf")));
        corpus.push("inline text #1", SourceContent::Text("Phone: 555-123-4567".into()));

        let content = corpus.content_text();
        assert_eq!(content, "Name: Maria Lopez\n\nPhone: 555-123-4567");
        assert!(!content.contains("client_names"));
        assert!(!content.contains("intake.pdf"));
    }

    #[test]
    fn test_binary_refs() {
        let mut corpus = SourceCorpus::from_text("inline text #1", "hello");
        corpus.push("a.pdf", SourceContent::BinaryRef(PathBuf::from("a.pdf")));
        assert_eq!(corpus.binary_refs(), vec![Path::new("a.pdf")]);
    }

    #[test]
    fn test_truncate_origin() {
        assert_eq!(truncate_origin("short", 50), "short");
        let long = "x".repeat(60);
        let truncated = truncate_origin(&long, 50);
        assert_eq!(truncated.len(), 53);
        assert!(truncated.ends_with("..."));
    }
}
