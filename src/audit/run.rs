// src/audit/run.rs
// =============================================================================
// Runs the audit over a set of documents.
//
// - Without explicit files, every *.md under the base path is audited
//   (hidden directories are skipped)
// - Documents matching `files-to-ignore` are dropped before loading
// - Documents are audited concurrently; results keep input order
// =============================================================================

use futures::stream::{self, StreamExt};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::document::{AuditedDocument, Document};
use crate::checker::Validator;
use crate::error::Result;
use crate::policy::{is_path_ignored, Settings};

const DOCUMENTS_IN_FLIGHT: usize = 4;

/// Finds every markdown file under `root`, sorted by path.
pub fn discover_files(root: &Path) -> Vec<String> {
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("md"))
        .map(|entry| entry.path().to_string_lossy().into_owned())
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Loads the documents to audit. Any unreadable or non-markdown file named
/// here stops the run.
pub fn collect_documents(files: &[String], settings: &Settings) -> Result<Vec<Document>> {
    let global = &settings.global;
    files
        .iter()
        .filter(|path| {
            let ignored = is_path_ignored(path, &global.files_to_ignore, &global.base_path);
            if ignored {
                log::info!("ignoring {}", path);
            }
            !ignored
        })
        .map(|path| Document::load(path, settings))
        .collect()
}

/// Audits every document and returns them in the order given.
pub async fn run_audit(documents: Vec<Document>, validator: &Validator) -> Vec<AuditedDocument> {
    stream::iter(documents)
        .map(|document| document.audit(validator))
        .buffered(DOCUMENTS_IN_FLIGHT)
        .collect()
        .await
}
