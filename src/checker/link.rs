// src/checker/link.rs
// =============================================================================
// Link candidates and check results.
//
// A Link's kind is decided once, from the syntax of its target:
//   "https://..." / "http://..."  -> External
//   "#fragment"                   -> HashInternal (same document)
//   anything without a scheme     -> Internal (another local file)
// Other schemes (mailto:, tel:, ftp:, ...) are not links we can check.
// =============================================================================

use serde::Serialize;
use std::path::Path;

use crate::policy::{clean_path, LinkPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    External,
    Internal,
    HashInternal,
}

/// One link occurrence in a document.
///
/// Fields are private so the kind can't drift away from the target after
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    kind: LinkKind,
    /// The target exactly as written in the markdown.
    target: String,
    /// URL for external links, cwd-relative path (plus `#fragment`) for
    /// internal links, the fragment itself for hash links.
    resolved: String,
}

impl Link {
    /// Classifies a raw link destination found in a document living in `dir`.
    ///
    /// Internal targets are resolved against `dir`, or against `base_path`
    /// when they start with `/`. Returns None for targets that aren't
    /// checkable (empty, foreign scheme, protocol-relative).
    pub fn classify(raw: &str, dir: &str, base_path: &Path) -> Option<Link> {
        let target = raw.trim();
        if target.is_empty() {
            return None;
        }

        if is_http_link(target) {
            return Some(Link {
                kind: LinkKind::External,
                target: target.to_string(),
                resolved: target.to_string(),
            });
        }

        if target.starts_with('#') {
            return Some(Link {
                kind: LinkKind::HashInternal,
                target: target.to_string(),
                resolved: target.to_string(),
            });
        }

        if has_scheme(target) || target.starts_with("//") {
            return None;
        }

        let (file, fragment) = split_fragment(target);
        let joined = match file.strip_prefix('/') {
            Some(rooted) => join(&base_path.to_string_lossy(), rooted),
            None => join(dir, file),
        };
        let mut resolved = clean_path(&joined);
        if resolved.is_empty() {
            resolved.push('.');
        }
        if let Some(fragment) = fragment {
            resolved.push('#');
            resolved.push_str(fragment);
        }

        Some(Link {
            kind: LinkKind::Internal,
            target: target.to_string(),
            resolved,
        })
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn resolved(&self) -> &str {
        &self.resolved
    }
}

/// Splits on the first `#`: (path, optional fragment).
pub fn split_fragment(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (target, None),
    }
}

fn join(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}

fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Outcome of checking one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub status: bool,
    /// Why it failed, or a note (redirect target) when it passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    pub fn ok() -> Self {
        Self {
            status: true,
            message: None,
        }
    }

    pub fn ok_with(note: impl Into<String>) -> Self {
        Self {
            status: true,
            message: Some(note.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status
    }
}

/// A link together with the policy it was checked under and its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedLink {
    #[serde(flatten)]
    pub link: Link,
    pub policy: LinkPolicy,
    #[serde(flatten)]
    pub result: CheckResult,
}
