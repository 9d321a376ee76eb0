// src/error.rs
// =============================================================================
// Fatal setup errors. These abort the run before any link is checked.
//
// A broken link is NOT an error in this sense: per-link outcomes are always
// captured as a CheckResult and never bubble up through `?`.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Config file '{}' doesn't exist", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Could not read config file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("The specified file '{}' doesn't exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("The specified file '{}' isn't a markdown file", .0.display())]
    NotMarkdown(PathBuf),

    #[error("Could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
