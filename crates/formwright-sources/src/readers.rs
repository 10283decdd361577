//! Extension-specific file readers

use crate::error::{Result, SourceError};
use crate::markup::strip_markup;
use formwright_domain::SourceContent;
use std::path::Path;

/// Extensions picked up when expanding a directory
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "csv", "json", "toml", "html", "htm"];

/// How a file extension is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRule {
    /// Plain text, used verbatim
    Verbatim,
    /// JSON, re-serialised pretty-printed
    Json,
    /// TOML, re-serialised pretty-printed
    Toml,
    /// HTML, markup stripped
    Markup,
    /// Binary document, passed by reference
    Binary,
}

impl ReadRule {
    /// Rule for an extension (case-insensitive), `None` when unsupported
    pub fn for_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "md" | "csv" | "tsv" | "log" => Some(ReadRule::Verbatim),
            "json" => Some(ReadRule::Json),
            "toml" => Some(ReadRule::Toml),
            "html" | "htm" => Some(ReadRule::Markup),
            "pdf" => Some(ReadRule::Binary),
            _ => None,
        }
    }
}

/// Lower-cased extension of `path`, empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Read a local file into source content
pub async fn read_file(path: &Path) -> Result<SourceContent> {
    let ext = extension_of(path);
    let rule = ReadRule::for_extension(&ext).ok_or_else(|| SourceError::UnsupportedType(ext.clone()))?;

    let text = match rule {
        ReadRule::Binary => {
            // Passed by reference; the file only has to exist
            tokio::fs::metadata(path)
                .await
                .map_err(|source| read_error(path, source))?;
            return Ok(SourceContent::BinaryRef(path.to_path_buf()));
        }
        ReadRule::Verbatim => read_text(path).await?,
        ReadRule::Markup => strip_markup(&read_text(path).await?),
        ReadRule::Json => {
            let raw = read_text(path).await?;
            let value: serde_json::Value =
                serde_json::from_str(&raw).map_err(|e| structured("json", path, e.to_string()))?;
            serde_json::to_string_pretty(&value).map_err(|e| structured("json", path, e.to_string()))?
        }
        ReadRule::Toml => {
            let raw = read_text(path).await?;
            let value: toml::Value =
                toml::from_str(&raw).map_err(|e| structured("toml", path, e.to_string()))?;
            toml::to_string_pretty(&value).map_err(|e| structured("toml", path, e.to_string()))?
        }
    };

    Ok(SourceContent::Text(text))
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| read_error(path, source))
}

fn read_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Read {
        path: path.to_path_buf(),
        source,
    }
}

fn structured(format: &'static str, path: &Path, message: String) -> SourceError {
    SourceError::Structured {
        format,
        path: path.to_path_buf(),
        message,
    }
}
