// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every setting that also exists in the config file is an Option here:
// `Some` means the user typed the flag, and a typed flag beats the file.
// Boolean flags accept an explicit value too, so `--allow-redirect=false`
// can switch off something the config file turned on.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::parse_duration;

pub const DEFAULT_CONFIG_FILE: &str = "link-auditor.config.yaml";

#[derive(Parser, Debug)]
#[command(
    name = "link-auditor",
    version,
    about = "Audit markdown documents for broken external, internal and anchor links",
    long_about = "link-auditor checks every link in a tree of markdown documents: web links, \
                  links to other local files, and links to headers. Settings come from flags, \
                  a YAML config file, and per-file / per-link overrides declared in that file."
)]
pub struct Cli {
    /// Markdown files to audit (default: every *.md under the base path)
    pub files: Vec<String>,

    /// Root directory; rooted links (/x.md) and the config file are resolved against it
    #[arg(long)]
    pub base_path: Option<PathBuf>,

    /// YAML config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Substrings of external links to skip (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub external_links_to_ignore: Vec<String>,

    /// Substrings of internal links to skip (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub internal_links_to_ignore: Vec<String>,

    /// Path patterns of documents to skip entirely (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub files_to_ignore: Vec<String>,

    /// Path patterns of documents whose internal links are not checked
    #[arg(long, value_delimiter = ',')]
    pub files_to_ignore_internal_links_in: Vec<String>,

    /// Timeout in seconds for each external request (0 = 30s)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per external link
    #[arg(long)]
    pub request_repeats: Option<u32>,

    /// Wait after a 429 response, e.g. "2s" or "500ms"
    #[arg(long, value_parser = parse_duration)]
    pub backoff: Option<Duration>,

    /// Accept 3xx responses (and skip anchor checks)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub allow_redirect: Option<bool>,

    /// Also check links written inside code blocks
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub allow_code_blocks: Option<bool>,

    /// Skip all external links
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ignore_external: Option<bool>,

    /// Skip all internal and same-document links
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ignore_internal: Option<bool>,

    /// Maximum number of external requests in flight
    #[arg(long, default_value_t = 16)]
    pub concurrency: usize,

    /// Give up on remaining external checks after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// List every checked link and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The config file path, joined onto the base path when one is given.
    pub fn config_path(&self) -> PathBuf {
        match &self.base_path {
            Some(base) if self.config_file.is_relative() => base.join(&self.config_file),
            _ => self.config_file.clone(),
        }
    }

    pub fn config_file_is_default(&self) -> bool {
        self.config_file.as_os_str() == DEFAULT_CONFIG_FILE
    }
}
