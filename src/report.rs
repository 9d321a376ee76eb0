// src/report.rs
// =============================================================================
// Prints audit results either as a human-readable table or as JSON.
//
// The table lists failed links per document (every link with --verbose),
// followed by a run summary. JSON output carries everything.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::audit::AuditedDocument;
use crate::checker::{CheckedLink, LinkKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub documents: usize,
    pub failed_documents: usize,
    pub ok: usize,
    pub failed: usize,
    pub total: usize,
}

impl Summary {
    pub fn of(documents: &[AuditedDocument]) -> Self {
        let ok: usize = documents.iter().map(|d| d.stats.success).sum();
        let failed: usize = documents.iter().map(|d| d.stats.failed).sum();
        Self {
            documents: documents.len(),
            failed_documents: documents.iter().filter(|d| !d.status).count(),
            ok,
            failed,
            total: ok + failed,
        }
    }

    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    documents: &'a [AuditedDocument],
    summary: &'a Summary,
}

pub fn print_report(documents: &[AuditedDocument], json: bool, verbose: bool) -> Result<Summary> {
    let summary = Summary::of(documents);
    if json {
        let report = JsonReport {
            documents,
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(documents, verbose);
        print_summary(&summary);
    }
    Ok(summary)
}

fn print_table(documents: &[AuditedDocument], verbose: bool) {
    for document in documents {
        if document.status && !verbose {
            continue;
        }

        let icon = if document.status { "✅" } else { "❌" };
        println!(
            "{} {} ({} ok, {} failed)",
            icon, document.path, document.stats.success, document.stats.failed
        );
        if verbose {
            println!("   {} header(s)", document.headers.len());
        }

        let rows: Vec<&CheckedLink> = if verbose {
            document.links.iter().collect()
        } else {
            document.failed_links().collect()
        };
        if rows.is_empty() {
            continue;
        }

        println!("   {:<60} {:<10} {:<8} MESSAGE", "LINK", "KIND", "STATUS");
        for row in rows {
            let status = if row.result.is_ok() { "OK" } else { "BROKEN" };
            let message = row.result.message.as_deref().unwrap_or("");
            println!(
                "   {:<60} {:<10} {:<8} {}",
                truncate(row.link.target(), 57),
                kind_label(row.link.kind()),
                status,
                message
            );
        }
        println!();
    }
}

fn print_summary(summary: &Summary) {
    println!("📊 Summary:");
    println!(
        "   📄 Documents: {} ({} with broken links)",
        summary.documents, summary.failed_documents
    );
    println!("   ✅ OK: {}", summary.ok);
    println!("   ❌ Broken: {}", summary.failed);
    println!("   📋 Total: {}", summary.total);
}

fn kind_label(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::External => "external",
        LinkKind::Internal => "internal",
        LinkKind::HashInternal => "anchor",
    }
}

// Truncates on a char boundary
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn test_empty_run_passes() {
        let summary = Summary::of(&[]);
        assert_eq!(summary, Summary::default());
        assert!(summary.passed());
    }
}
