// src/policy/resolve.rs
// =============================================================================
// The configuration cascade: global -> document -> link.
//
// Rules:
// - scalars: the most specific explicit value wins
// - ignore lists: union of global and document, never overridden
// - ignore-internal: global flag, forced on by a path pattern, and finally
//   the document's explicit value (in either direction) when it has one
//
// Both functions are pure. The same inputs always give equal outputs.
// =============================================================================

use std::collections::BTreeSet;

use super::ignore::{clean_path, is_path_ignored};
use super::model::{
    DocumentDeclaration, DocumentOverride, DocumentPolicy, GlobalPolicy, LinkPolicy,
};
use crate::checker::Link;

/// Computes the effective policy for the document at `path`.
///
/// A declaration matches when its path equals `path` after lexical cleaning
/// (`./a.md` and `a.md` are the same document). There is no globbing.
pub fn resolve_document_policy(
    path: &str,
    global: &GlobalPolicy,
    documents: &[DocumentDeclaration],
) -> DocumentPolicy {
    let declaration = find_declaration(path, documents);
    let no_override = DocumentOverride::default();
    let overrides = declaration
        .and_then(|d| d.config.as_ref())
        .unwrap_or(&no_override);

    DocumentPolicy {
        timeout: overrides.timeout.unwrap_or(global.timeout),
        request_repeats: overrides.request_repeats.unwrap_or(global.request_repeats),
        backoff: overrides.backoff.unwrap_or(global.backoff),
        allow_redirect: overrides.allow_redirect.unwrap_or(global.allow_redirect),
        allow_code_blocks: overrides
            .allow_code_blocks
            .unwrap_or(global.allow_code_blocks),
        ignore_external: overrides.ignore_external.unwrap_or(global.ignore_external),
        ignore_internal: ignore_internal_policy(path, global, overrides),
        external_links_to_ignore: union(
            &global.external_links_to_ignore,
            &overrides.external_links_to_ignore,
        ),
        internal_links_to_ignore: union(
            &global.internal_links_to_ignore,
            &overrides.internal_links_to_ignore,
        ),
        links: declaration.map(|d| d.links.clone()).unwrap_or_default(),
    }
}

/// Computes the effective policy for one link of a resolved document.
///
/// The declaration may name the link as written or in its resolved form.
/// Unset fields fall back to the document, which already folded in global.
pub fn resolve_link_policy(link: &Link, document: &DocumentPolicy) -> LinkPolicy {
    let overrides = document
        .links
        .iter()
        .find(|decl| decl.path == link.target() || decl.path == link.resolved())
        .and_then(|decl| decl.config.as_ref());

    let inherited = LinkPolicy {
        timeout: document.timeout,
        request_repeats: document.request_repeats,
        allow_redirect: document.allow_redirect,
        backoff: document.backoff,
    };

    match overrides {
        Some(o) => LinkPolicy {
            timeout: o.timeout.unwrap_or(inherited.timeout),
            request_repeats: o.request_repeats.unwrap_or(inherited.request_repeats),
            allow_redirect: o.allow_redirect.unwrap_or(inherited.allow_redirect),
            ..inherited
        },
        None => inherited,
    }
}

fn find_declaration<'a>(
    path: &str,
    documents: &'a [DocumentDeclaration],
) -> Option<&'a DocumentDeclaration> {
    let wanted = clean_path(path);
    documents.iter().find(|d| clean_path(&d.path) == wanted)
}

fn ignore_internal_policy(
    path: &str,
    global: &GlobalPolicy,
    overrides: &DocumentOverride,
) -> bool {
    if let Some(explicit) = overrides.ignore_internal {
        return explicit;
    }
    global.ignore_internal
        || is_path_ignored(
            path,
            &global.files_to_ignore_internal_links_in,
            &global.base_path,
        )
}

fn union(global: &BTreeSet<String>, document: &[String]) -> BTreeSet<String> {
    global
        .iter()
        .chain(document.iter())
        .filter(|s| !s.is_empty())
        .cloned()
        .collect()
}
