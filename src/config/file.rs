// src/config/file.rs
// =============================================================================
// The YAML config file: its shape and how it is loaded.
//
// Example:
//
//   timeout: 10
//   request-repeats: 3
//   backoff: 2s
//   external-links-to-ignore: [localhost, abc.com]
//   files-to-ignore-internal-links-in: [./generated]
//   files:
//     - path: ./docs/faq.md
//       config:
//         allow-redirect: true
//       links:
//         - path: https://slow.example.com
//           config:
//             timeout: 60
// =============================================================================

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::duration;
use crate::error::{AuditError, Result};
use crate::policy::DocumentDeclaration;

/// Global section of the config file. Unset scalars fall back to flags or
/// built-in defaults during the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConfigFile {
    pub files: Vec<DocumentDeclaration>,
    pub external_links_to_ignore: Vec<String>,
    pub internal_links_to_ignore: Vec<String>,
    pub files_to_ignore: Vec<String>,
    pub files_to_ignore_internal_links_in: Vec<String>,
    pub timeout: Option<u64>,
    pub request_repeats: Option<u32>,
    #[serde(deserialize_with = "duration::deserialize_option")]
    pub backoff: Option<Duration>,
    pub allow_redirect: Option<bool>,
    pub allow_code_blocks: Option<bool>,
    pub ignore_external: Option<bool>,
    pub ignore_internal: Option<bool>,
}

impl ConfigFile {
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        // An empty file is an empty config, not a parse error
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| AuditError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Loads the config file at `path`.
///
/// A missing file is fine when the user didn't name one (`required` false);
/// a named file that is missing or malformed stops the run.
pub fn load_config(path: &Path, required: bool) -> Result<ConfigFile> {
    if !path.exists() {
        if required {
            return Err(AuditError::ConfigNotFound(path.to_path_buf()));
        }
        log::debug!("no config file at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let text = fs::read_to_string(path).map_err(|source| AuditError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded config file {}", path.display());
    ConfigFile::parse(path, &text)
}
