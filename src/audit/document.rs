// src/audit/document.rs
// =============================================================================
// One markdown document moving through the audit pipeline:
//
//   load -> extract links -> drop ignored -> extract headers
//        -> resolve link policies -> validate -> summarise
//
// Each stage takes what the last one produced; nothing is mutated after it
// is returned, and every link result is written exactly once.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::checker::{extract_headers, extract_links, CheckedLink, Link, LinkKind, Validator};
use crate::error::{AuditError, Result};
use crate::policy::{resolve_document_policy, resolve_link_policy, DocumentPolicy, Settings};

// Links of one document validated at the same time. External requests are
// additionally capped run-wide by the checker's semaphore.
const LINKS_IN_FLIGHT: usize = 8;

#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    dir: String,
    base_path: PathBuf,
    content: String,
    pub policy: DocumentPolicy,
}

impl Document {
    /// Reads a markdown document and resolves its policy.
    ///
    /// Fails (fatally) when the path isn't a `.md` file or doesn't exist.
    pub fn load(path: &str, settings: &Settings) -> Result<Document> {
        let file = Path::new(path);
        if file.extension().and_then(|e| e.to_str()) != Some("md") {
            return Err(AuditError::NotMarkdown(file.to_path_buf()));
        }
        if !file.is_file() {
            return Err(AuditError::FileNotFound(file.to_path_buf()));
        }
        let content = fs::read_to_string(file).map_err(|source| AuditError::Io {
            path: file.to_path_buf(),
            source,
        })?;

        Ok(Self::from_content(path, content, settings))
    }

    pub fn from_content(path: &str, content: String, settings: &Settings) -> Document {
        let dir = Path::new(path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Document {
            path: path.to_string(),
            dir,
            base_path: settings.global.base_path.clone(),
            content,
            policy: resolve_document_policy(path, &settings.global, &settings.documents),
        }
    }

    /// Links that will be validated: everything extracted, minus ignore-list
    /// hits and the kinds this document's policy switches off.
    pub fn links(&self) -> Vec<Link> {
        extract_links(
            &self.content,
            &self.dir,
            &self.base_path,
            self.policy.allow_code_blocks,
        )
        .into_iter()
        .filter(|link| self.keeps(link))
        .collect()
    }

    pub fn headers(&self) -> Vec<String> {
        extract_headers(&self.content)
    }

    fn keeps(&self, link: &Link) -> bool {
        let policy = &self.policy;
        match link.kind() {
            LinkKind::External => {
                !policy.ignore_external
                    && !policy
                        .external_links_to_ignore
                        .iter()
                        .any(|s| link.resolved().contains(s.as_str()))
            }
            LinkKind::Internal | LinkKind::HashInternal => {
                !policy.ignore_internal
                    && !policy
                        .internal_links_to_ignore
                        .iter()
                        .any(|s| link.target().contains(s.as_str()))
            }
        }
    }

    /// Runs the rest of the pipeline and returns the finished document.
    pub async fn audit(self, validator: &Validator) -> AuditedDocument {
        let links = self.links();
        let headers = self.headers();
        log::debug!("{}: {} link(s), {} header(s)", self.path, links.len(), headers.len());

        let policy = &self.policy;
        let headers_ref = &headers;
        let checked: Vec<CheckedLink> = stream::iter(links)
            .map(|link| async move {
                let link_policy = resolve_link_policy(&link, policy);
                let result = validator.validate(&link, &link_policy, headers_ref).await;
                CheckedLink {
                    link,
                    policy: link_policy,
                    result,
                }
            })
            .buffered(LINKS_IN_FLIGHT)
            .collect()
            .await;

        AuditedDocument::new(self.path, headers, checked)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub success: usize,
    pub failed: usize,
}

/// A document after validation. `status` is true when no link failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditedDocument {
    pub path: String,
    pub status: bool,
    pub stats: DocumentStats,
    #[serde(skip)]
    pub headers: Vec<String>,
    pub links: Vec<CheckedLink>,
}

impl AuditedDocument {
    fn new(path: String, headers: Vec<String>, links: Vec<CheckedLink>) -> Self {
        let success = links.iter().filter(|l| l.result.is_ok()).count();
        let stats = DocumentStats {
            success,
            failed: links.len() - success,
        };
        Self {
            path,
            status: stats.failed == 0,
            stats,
            headers,
            links,
        }
    }

    pub fn failed_links(&self) -> impl Iterator<Item = &CheckedLink> {
        self.links.iter().filter(|l| !l.result.is_ok())
    }
}
