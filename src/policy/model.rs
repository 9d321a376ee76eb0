// src/policy/model.rs
// =============================================================================
// The three layers of settings and their resolved forms.
//
//   GlobalPolicy      - built once from CLI flags + config file, never mutated
//   DocumentOverride  - optional per-document block, every field tri-state
//   LinkOverride      - optional per-link block (timeout/repeats/redirect)
//
// `Option<T>` is the tri-state: None = inherit, Some(v) = explicit override.
// The resolved forms (DocumentPolicy, LinkPolicy) carry no Options at all.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::duration;

/// Process-wide defaults after CLI flags and the config file were merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalPolicy {
    pub base_path: PathBuf,
    /// Seconds; 0 means "use the 30 second fallback".
    pub timeout: u64,
    /// 0 means a single attempt.
    pub request_repeats: u32,
    pub backoff: Duration,
    pub allow_redirect: bool,
    pub allow_code_blocks: bool,
    pub ignore_external: bool,
    pub ignore_internal: bool,
    pub external_links_to_ignore: BTreeSet<String>,
    pub internal_links_to_ignore: BTreeSet<String>,
    pub files_to_ignore: Vec<String>,
    pub files_to_ignore_internal_links_in: Vec<String>,
}

impl Default for GlobalPolicy {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            timeout: 0,
            request_repeats: 0,
            backoff: DEFAULT_BACKOFF,
            allow_redirect: false,
            allow_code_blocks: false,
            ignore_external: false,
            ignore_internal: false,
            external_links_to_ignore: BTreeSet::new(),
            internal_links_to_ignore: BTreeSet::new(),
            files_to_ignore: Vec::new(),
            files_to_ignore_internal_links_in: Vec::new(),
        }
    }
}

pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Per-document override block (`files[].config` in the config file).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentOverride {
    pub timeout: Option<u64>,
    pub request_repeats: Option<u32>,
    #[serde(default, deserialize_with = "duration::deserialize_option")]
    pub backoff: Option<Duration>,
    pub allow_redirect: Option<bool>,
    pub allow_code_blocks: Option<bool>,
    pub ignore_external: Option<bool>,
    pub ignore_internal: Option<bool>,
    #[serde(default)]
    pub external_links_to_ignore: Vec<String>,
    #[serde(default)]
    pub internal_links_to_ignore: Vec<String>,
}

/// Per-link override block (`files[].links[].config`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkOverride {
    pub timeout: Option<u64>,
    pub request_repeats: Option<u32>,
    pub allow_redirect: Option<bool>,
}

/// One `files[]` entry: which document, its overrides, and its link overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentDeclaration {
    pub path: String,
    #[serde(default)]
    pub config: Option<DocumentOverride>,
    #[serde(default)]
    pub links: Vec<LinkDeclaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkDeclaration {
    pub path: String,
    #[serde(default)]
    pub config: Option<LinkOverride>,
}

/// Everything the resolver needs for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub global: GlobalPolicy,
    pub documents: Vec<DocumentDeclaration>,
}

/// Fully resolved policy for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    pub timeout: u64,
    pub request_repeats: u32,
    pub backoff: Duration,
    pub allow_redirect: bool,
    pub allow_code_blocks: bool,
    pub ignore_external: bool,
    pub ignore_internal: bool,
    pub external_links_to_ignore: BTreeSet<String>,
    pub internal_links_to_ignore: BTreeSet<String>,
    /// Link-level declarations carried over from the matching `files[]` entry.
    pub links: Vec<LinkDeclaration>,
}

/// Fully resolved policy for one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkPolicy {
    pub timeout: u64,
    pub request_repeats: u32,
    pub allow_redirect: bool,
    #[serde(skip)]
    pub backoff: Duration,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            timeout: 0,
            request_repeats: 0,
            allow_redirect: false,
            backoff: DEFAULT_BACKOFF,
        }
    }
}
