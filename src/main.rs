// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the config file and merge the flags over it
// 3. Collect the documents to audit
// 4. Check every link and print the report
// 5. Exit with proper code (0 = all links ok, 1 = broken links, 2 = error)
// =============================================================================

mod audit; // src/audit/ - per-document pipeline and the run over documents
mod checker; // src/checker/ - link checking logic
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config/ - YAML config file and flag merging
mod error; // src/error.rs - fatal setup errors
mod policy; // src/policy/ - configuration cascade
mod report; // src/report.rs - table / JSON output

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use checker::{ExternalChecker, Validator};
use cli::Cli;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every validated link passed
//   Ok(1) = at least one link is broken
//   Err   = setup failed (config, unreadable input); main maps it to 2
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli);

    let settings = config::settings_from_cli(&cli).context("could not load settings")?;

    let files = if cli.files.is_empty() {
        audit::discover_files(&settings.global.base_path)
    } else {
        cli.files.clone()
    };
    let documents = audit::collect_documents(&files, &settings)?;

    if documents.is_empty() {
        if !cli.json {
            println!("⚠️  No markdown files to audit");
        }
        return Ok(0);
    }

    if !cli.json {
        println!("🔍 Auditing {} document(s)...\n", documents.len());
    }

    let deadline = cli
        .deadline
        .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));
    let checker = ExternalChecker::new(cli.concurrency)?.with_deadline(deadline);
    let validator = Validator::new(checker);

    let audited = audit::run_audit(documents, &validator).await;
    let summary = report::print_report(&audited, cli.json, cli.verbose)?;

    if summary.passed() {
        if !cli.json {
            println!("\nNO ISSUES :-)");
        }
        Ok(0)
    } else {
        Ok(1)
    }
}

// Diagnostics go to stderr so they never mix with the report (or JSON)
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
        // hyper/reqwest internals are extremely noisy at debug
        builder.filter_module("hyper", log::LevelFilter::Warn);
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("html5ever", log::LevelFilter::Warn);
        builder.filter_module("selectors", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();
}
