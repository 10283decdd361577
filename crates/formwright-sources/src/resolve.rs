//! Command-line locator resolution
//!
//! Classifies each locator as a URL, file, directory, glob pattern or
//! literal text, consulting the `FORMS_DIR` / `DATA_DIR` / `OUTPUT_DIR`
//! base directories only when a relative path is not found as given.

use crate::descriptor::SourceDescriptor;
use crate::glob;
use crate::readers::{extension_of, RECOGNIZED_EXTENSIONS};
use formwright_domain::Diagnostics;
use std::env;
use std::path::{Path, PathBuf};

const COMPONENT: &str = "sources";

/// Environment variable for the forms base directory
pub const FORMS_DIR_VAR: &str = "FORMS_DIR";
/// Environment variable for the data base directory
pub const DATA_DIR_VAR: &str = "DATA_DIR";
/// Environment variable for the output base directory
pub const OUTPUT_DIR_VAR: &str = "OUTPUT_DIR";

/// Base directories for relative locators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseDirs {
    /// Where target forms live
    pub forms: Option<PathBuf>,
    /// Where data sources live
    pub data: Option<PathBuf>,
    /// Where filled forms are written
    pub output: Option<PathBuf>,
}

impl BaseDirs {
    /// Read the base directories from the environment
    pub fn from_env() -> Self {
        let var = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };
        Self {
            forms: var(FORMS_DIR_VAR),
            data: var(DATA_DIR_VAR),
            output: var(OUTPUT_DIR_VAR),
        }
    }

    /// Fill unset entries from `fallback`
    pub fn or(self, fallback: BaseDirs) -> Self {
        Self {
            forms: self.forms.or(fallback.forms),
            data: self.data.or(fallback.data),
            output: self.output.or(fallback.output),
        }
    }
}

/// Directory expansion options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Extra extensions picked up from directories (without the dot)
    pub include_extensions: Vec<String>,
}

/// Resolves form, source and output locators
#[derive(Debug, Clone, Default)]
pub struct LocatorResolver {
    dirs: BaseDirs,
    options: ExpandOptions,
}

impl LocatorResolver {
    /// Create a resolver
    pub fn new(dirs: BaseDirs, options: ExpandOptions) -> Self {
        let options = ExpandOptions {
            include_extensions: options
                .include_extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            ..options
        };
        Self { dirs, options }
    }

    /// Base directories in use
    pub fn dirs(&self) -> &BaseDirs {
        &self.dirs
    }

    /// Locate the target form, or `None` when it does not exist
    pub fn resolve_form(&self, locator: &str) -> Option<PathBuf> {
        let path = PathBuf::from(locator);
        if path.is_file() {
            return Some(path);
        }
        if path.is_relative() {
            if let Some(forms) = &self.dirs.forms {
                let candidate = forms.join(&path);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Classify every locator, in order
    pub fn resolve_sources(
        &self,
        locators: &[String],
        diagnostics: &Diagnostics,
    ) -> Vec<SourceDescriptor> {
        locators
            .iter()
            .flat_map(|locator| self.classify(locator, diagnostics))
            .collect()
    }

    /// Classify one locator into zero or more descriptors
    pub fn classify(&self, locator: &str, diagnostics: &Diagnostics) -> Vec<SourceDescriptor> {
        if locator.trim().is_empty() {
            return vec![SourceDescriptor::Empty];
        }
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return vec![SourceDescriptor::Url(locator.to_string())];
        }

        if let Some(found) = self.classify_path(Path::new(locator), diagnostics) {
            return found;
        }

        let path = Path::new(locator);
        if path.is_relative() && !locator.contains('\n') {
            if let Some(data) = &self.dirs.data {
                if let Some(found) = self.classify_path(&data.join(path), diagnostics) {
                    diagnostics.debug(
                        COMPONENT,
                        format!("Resolved '{}' under {}", locator, data.display()),
                    );
                    return found;
                }
            }
        }

        vec![SourceDescriptor::Text(locator.to_string())]
    }

    /// File, directory or glob interpretation of a path, if any applies
    fn classify_path(&self, path: &Path, diagnostics: &Diagnostics) -> Option<Vec<SourceDescriptor>> {
        if path.is_file() {
            return Some(vec![SourceDescriptor::File(path.to_path_buf())]);
        }
        if path.is_dir() {
            let files = self.expand_directory(path);
            diagnostics.info(
                COMPONENT,
                format!("Directory {} expanded to {} file(s)", path.display(), files.len()),
            );
            return Some(files.into_iter().map(SourceDescriptor::File).collect());
        }

        let text = path.to_string_lossy();
        if looks_like_glob(&text) {
            let files = glob::expand(&text);
            if files.is_empty() {
                diagnostics.warn(COMPONENT, format!("No files match pattern '{}'", text));
            }
            return Some(files.into_iter().map(SourceDescriptor::File).collect());
        }
        None
    }

    /// Files of recognised extensions in `dir`, sorted by path
    pub fn expand_directory(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.collect_directory(dir, &mut files);
        files.sort();
        files
    }

    fn collect_directory(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            // Symlinked directories are not descended into
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if self.options.recursive {
                    self.collect_directory(&path, out);
                }
            } else if path.is_file() && self.accepts(&path) {
                out.push(path);
            }
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        let ext = extension_of(path);
        !ext.is_empty()
            && (RECOGNIZED_EXTENSIONS.contains(&ext.as_str())
                || self.options.include_extensions.contains(&ext))
    }

    /// Where the filled form is written
    ///
    /// Defaults to `<form-stem>_filled.pdf` in `OUTPUT_DIR`, or next to the
    /// form. Relative explicit destinations go under `OUTPUT_DIR` when set.
    pub fn output_destination(&self, form: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => match (&self.dirs.output, path.is_relative()) {
                (Some(output), true) => output.join(path),
                _ => path.to_path_buf(),
            },
            None => {
                let stem = form
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "form".to_string());
                let name = format!("{}_filled.pdf", stem);
                match &self.dirs.output {
                    Some(output) => output.join(name),
                    None => form.parent().unwrap_or(Path::new("")).join(name),
                }
            }
        }
    }
}

/// Glob metacharacters without whitespace; prose with a `?` stays literal
fn looks_like_glob(text: &str) -> bool {
    glob::is_glob(text) && !text.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_glob() {
        assert!(looks_like_glob("data/*.txt"));
        assert!(!looks_like_glob("What is the case number?"));
        assert!(!looks_like_glob("notes.txt"));
    }

    #[test]
    fn test_default_output_next_to_form() {
        let resolver = LocatorResolver::default();
        let dest = resolver.output_destination(Path::new("/forms/FL-100.pdf"), None);
        assert_eq!(dest, PathBuf::from("/forms/FL-100_filled.pdf"));
    }

    #[test]
    fn test_output_dir_applies_to_relative_only() {
        let dirs = BaseDirs {
            output: Some(PathBuf::from("/out")),
            ..Default::default()
        };
        let resolver = LocatorResolver::new(dirs, ExpandOptions::default());
        let form = Path::new("/forms/FL-100.pdf");
        assert_eq!(
            resolver.output_destination(form, None),
            PathBuf::from("/out/FL-100_filled.pdf")
        );
        assert_eq!(
            resolver.output_destination(form, Some(Path::new("done.pdf"))),
            PathBuf::from("/out/done.pdf")
        );
        assert_eq!(
            resolver.output_destination(form, Some(Path::new("/abs/done.pdf"))),
            PathBuf::from("/abs/done.pdf")
        );
    }

    #[test]
    fn test_base_dirs_or() {
        let env = BaseDirs {
            data: Some(PathBuf::from("/env/data")),
            ..Default::default()
        };
        let config = BaseDirs {
            data: Some(PathBuf::from("/cfg/data")),
            forms: Some(PathBuf::from("/cfg/forms")),
            output: None,
        };
        let merged = env.or(config);
        assert_eq!(merged.data, Some(PathBuf::from("/env/data")));
        assert_eq!(merged.forms, Some(PathBuf::from("/cfg/forms")));
    }

    #[test]
    fn test_include_extensions_normalised() {
        let resolver = LocatorResolver::new(
            BaseDirs::default(),
            ExpandOptions {
                recursive: false,
                include_extensions: vec![".LOG".to_string(), " ".to_string()],
            },
        );
        assert_eq!(resolver.options.include_extensions, vec!["log".to_string()]);
    }
}
