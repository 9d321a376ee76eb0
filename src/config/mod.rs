// src/config/mod.rs
// =============================================================================
// Loading the YAML config file and merging it with command-line flags.
//
// Submodules:
// - file: the config file shape and loader
// - merge: flags + file -> Settings
// - duration: "2s" / "500ms" style durations
// =============================================================================

pub mod duration;
mod file;
mod merge;

pub use duration::parse_duration;
pub use file::load_config;
pub use merge::merge;

use crate::cli::Cli;
use crate::error::Result;
use crate::policy::Settings;

/// Reads the config file the CLI points at and merges the flags over it.
pub fn settings_from_cli(cli: &Cli) -> Result<Settings> {
    let required = !cli.config_file_is_default();
    let file = load_config(&cli.config_path(), required)?;
    Ok(merge(file, cli))
}
