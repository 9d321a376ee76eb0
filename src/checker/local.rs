// src/checker/local.rs
// =============================================================================
// Checks for links that stay on disk:
// - Internal: another file, optionally with a `#header` in that file
// - HashInternal: a `#header` in the document itself
// =============================================================================

use std::fs;
use std::path::Path;

use super::link::{split_fragment, CheckResult, Link};
use super::markdown::extract_headers;
use super::slug::{header_exists, slugify};

pub const FILE_MISSING: &str = "The specified file doesn't exist";
pub const HEADER_MISSING: &str = "The specified header doesn't exist in file";

/// Checks a link to another local file.
///
/// The fragment, if any, is slug-normalised (case and spaces) before it is
/// compared, so `other.md#Some Header` finds `## Some Header`.
pub fn check_internal(link: &Link) -> CheckResult {
    let (file, fragment) = split_fragment(link.resolved());

    if !Path::new(file).exists() {
        return CheckResult::failed(FILE_MISSING);
    }

    let fragment = match fragment {
        None | Some("") => return CheckResult::ok(),
        Some(fragment) => fragment,
    };

    match fs::read_to_string(file) {
        Ok(markdown) if header_exists(&slugify(fragment), &extract_headers(&markdown)) => {
            CheckResult::ok()
        }
        Ok(_) => CheckResult::failed(HEADER_MISSING),
        Err(e) => {
            log::debug!("could not read {} for header lookup: {}", file, e);
            CheckResult::failed(HEADER_MISSING)
        }
    }
}

/// Checks a `#fragment` against the document's own headers.
///
/// A document without headers fails every such link.
pub fn check_hash(link: &Link, headers: &[String]) -> CheckResult {
    if header_exists(link.resolved(), headers) {
        CheckResult::ok()
    } else {
        CheckResult::failed(HEADER_MISSING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("target.md"),
            "# Title\n\n## Some Header\n\ntext\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "plain").unwrap();
        dir
    }

    fn internal(dir: &TempDir, raw: &str) -> Link {
        Link::classify(raw, &dir.path().to_string_lossy(), Path::new("")).unwrap()
    }

    #[test]
    fn test_missing_file() {
        let dir = fixture();
        assert_eq!(
            check_internal(&internal(&dir, "nope.md")),
            CheckResult::failed(FILE_MISSING)
        );
    }

    #[test]
    fn test_existing_file_without_fragment() {
        let dir = fixture();
        assert!(check_internal(&internal(&dir, "target.md")).is_ok());
        assert!(check_internal(&internal(&dir, "./notes.txt")).is_ok());
        assert!(check_internal(&internal(&dir, "target.md#")).is_ok());
    }

    #[test]
    fn test_header_in_other_file() {
        let dir = fixture();
        assert!(check_internal(&internal(&dir, "target.md#some-header")).is_ok());
        assert!(check_internal(&internal(&dir, "target.md#Some-Header")).is_ok());
        assert_eq!(
            check_internal(&internal(&dir, "target.md#other-header")),
            CheckResult::failed(HEADER_MISSING)
        );
    }

    #[test]
    fn test_hash_links() {
        let headers = vec!["First Header".to_string()];
        let hit = Link::classify("#first-header", "", Path::new("")).unwrap();
        let miss = Link::classify("#missing-header", "", Path::new("")).unwrap();

        assert!(check_hash(&hit, &headers).is_ok());
        assert_eq!(check_hash(&miss, &headers), CheckResult::failed(HEADER_MISSING));
        assert_eq!(check_hash(&hit, &[]), CheckResult::failed(HEADER_MISSING));
    }
}
