// src/audit/mod.rs
// =============================================================================
// The per-document pipeline and the run over all documents.
//
// Submodules:
// - document: load a document, filter its links, validate, summarise
// - run: discover files, drop ignored ones, audit them concurrently
// =============================================================================

mod document;
mod run;

pub use document::AuditedDocument;
pub use run::{collect_documents, discover_files, run_audit};
