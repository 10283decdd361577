//! Glob pattern expansion
//!
//! Supports `*`, `?` and `[...]` within a path component and `**` for any
//! number of directories. Matching files are returned sorted.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Whether the text contains glob metacharacters
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand `pattern` into the sorted list of matching files
pub fn expand(pattern: &str) -> Vec<PathBuf> {
    let path = Path::new(pattern);
    let mut base = PathBuf::new();
    let mut rest: Vec<String> = Vec::new();

    for component in path.components() {
        let part = component.as_os_str().to_string_lossy().to_string();
        if rest.is_empty() && !is_glob(&part) {
            base.push(component);
            continue;
        }
        if matches!(component, Component::Normal(_)) {
            rest.push(part);
        }
    }

    let mut matches = Vec::new();
    let relative = base.as_os_str().is_empty();
    let start = if relative { PathBuf::from(".") } else { base };
    walk(&start, &rest, &mut matches);

    let mut files: Vec<PathBuf> = matches
        .into_iter()
        .filter(|p| p.is_file())
        .map(|p| {
            if relative {
                p.strip_prefix(".").map(Path::to_path_buf).unwrap_or(p)
            } else {
                p
            }
        })
        .collect();
    files.sort();
    files.dedup();
    debug!(pattern, matches = files.len(), "Expanded glob");
    files
}

fn walk(dir: &Path, parts: &[String], out: &mut Vec<PathBuf>) {
    let Some((part, remaining)) = parts.split_first() else {
        out.push(dir.to_path_buf());
        return;
    };

    if part == "**" {
        walk(dir, remaining, out);
        for sub in subdirectories(dir) {
            walk(&sub, parts, out);
        }
        return;
    }

    if !is_glob(part) {
        let next = dir.join(part);
        if next.exists() {
            walk(&next, remaining, out);
        }
        return;
    }

    let Some(matcher) = component_regex(part) else {
        return;
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if matcher.is_match(&name) {
            walk(&entry.path(), remaining, out);
        }
    }
}

/// Real subdirectories of `dir`; symlinks are skipped so `**` cannot cycle
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs
}

/// Translate one glob component into an anchored regex
fn component_regex(part: &str) -> Option<Regex> {
    let mut pattern = String::from("^");
    let mut chars = part.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '[' => {
                pattern.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    pattern.push('^');
                }
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                    if inner == '\\' || inner == '[' {
                        pattern.push('\\');
                    }
                    pattern.push(inner);
                }
                pattern.push(']');
            }
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}
