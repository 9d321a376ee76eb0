// src/policy/ignore.rs
// =============================================================================
// Decides whether a document path is covered by an ignore pattern.
//
// Two kinds of pattern, chosen by the first character:
//   "./docs/old"  -> prefix mode: the cleaned path must start with the
//                    cleaned pattern, on a path component boundary
//   "vendor"      -> segment mode: "/vendor/" must appear in "/<path>/"
//
// So "ignore" matches "foo/ignore/bar.md" but never "not-ignore-me/file.md".
// =============================================================================

use std::path::Path;

/// Returns true when ANY pattern covers `path`.
///
/// `path` is tried as given and, when it lives under `base_path`, relative to
/// it, so patterns may be written either way.
pub fn is_path_ignored(path: &str, patterns: &[String], base_path: &Path) -> bool {
    let forms = candidate_forms(path, base_path);

    patterns
        .iter()
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| forms.iter().any(|form| pattern_matches(pattern, form)))
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern.starts_with('.') {
        matches_prefix(pattern, path)
    } else {
        contains_segment(pattern, path)
    }
}

fn matches_prefix(pattern: &str, path: &str) -> bool {
    let prefix = clean_path(pattern);
    if prefix.is_empty() {
        // "." or "./" covers the whole tree
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
}

fn contains_segment(pattern: &str, path: &str) -> bool {
    let segment = pattern.trim_matches('/');
    if segment.is_empty() {
        return false;
    }
    let rooted = format!("/{}/", path);
    rooted.contains(&format!("/{}/", segment))
}

fn candidate_forms(path: &str, base_path: &Path) -> Vec<String> {
    let cleaned = clean_path(path);
    let mut forms = vec![cleaned.clone()];

    let base = clean_path(&base_path.to_string_lossy());
    if !base.is_empty() {
        if let Some(rest) = cleaned.strip_prefix(base.as_str()) {
            if let Some(relative) = rest.strip_prefix('/') {
                forms.push(relative.to_string());
            }
        }
    }
    forms
}

/// Lexically cleans a slash-separated path: drops `.` and empty components,
/// folds `name/..`, and removes trailing slashes. `"."` cleans to `""`.
pub fn clean_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
