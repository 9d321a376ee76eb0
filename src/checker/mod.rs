// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - link: Link classification and CheckResult
// - markdown: Extracts links and headers from markdown text
// - html: Extracts anchor ids from fetched HTML pages
// - slug: Header text -> anchor id
// - http: External link checks (retries, rate-limit backoff, anchors)
// - local: Internal file and same-document header checks
// - backoff: The Waiter used after 429 responses
// - suggest: Closest-anchor matching for "did you mean" messages
// - validate: Dispatch by link kind
//
// This file (mod.rs) is the module root - it re-exports the public API.
// =============================================================================

mod backoff;
mod html;
mod http;
mod link;
mod local;
mod markdown;
mod slug;
mod suggest;
mod validate;

#[cfg(test)]
pub(crate) mod stub;

pub use http::ExternalChecker;
pub use link::{CheckResult, CheckedLink, Link, LinkKind};
pub use markdown::{extract_headers, extract_links};
pub use validate::Validator;
