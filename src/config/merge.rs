// src/config/merge.rs
// =============================================================================
// Folds command-line flags and the config file into the run's Settings.
//
// - scalar: flag if typed, else config file, else built-in default
// - list: union of flag values and config file values
// =============================================================================

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::file::ConfigFile;
use crate::cli::Cli;
use crate::policy::{GlobalPolicy, Settings, DEFAULT_BACKOFF};

pub fn merge(file: ConfigFile, cli: &Cli) -> Settings {
    let global = GlobalPolicy {
        base_path: cli.base_path.clone().unwrap_or_else(PathBuf::new),
        timeout: cli.timeout.or(file.timeout).unwrap_or(0),
        request_repeats: cli.request_repeats.or(file.request_repeats).unwrap_or(0),
        backoff: cli.backoff.or(file.backoff).unwrap_or(DEFAULT_BACKOFF),
        allow_redirect: cli.allow_redirect.or(file.allow_redirect).unwrap_or(false),
        allow_code_blocks: cli
            .allow_code_blocks
            .or(file.allow_code_blocks)
            .unwrap_or(false),
        ignore_external: cli.ignore_external.or(file.ignore_external).unwrap_or(false),
        ignore_internal: cli.ignore_internal.or(file.ignore_internal).unwrap_or(false),
        external_links_to_ignore: unique(
            &file.external_links_to_ignore,
            &cli.external_links_to_ignore,
        )
        .collect(),
        internal_links_to_ignore: unique(
            &file.internal_links_to_ignore,
            &cli.internal_links_to_ignore,
        )
        .collect(),
        files_to_ignore: unique(&file.files_to_ignore, &cli.files_to_ignore).collect(),
        files_to_ignore_internal_links_in: unique(
            &file.files_to_ignore_internal_links_in,
            &cli.files_to_ignore_internal_links_in,
        )
        .collect(),
    };

    Settings {
        global,
        documents: file.files,
    }
}

fn unique<'a>(a: &'a [String], b: &'a [String]) -> impl Iterator<Item = String> + 'a {
    let set: BTreeSet<String> = a
        .iter()
        .chain(b.iter())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    set.into_iter()
}
