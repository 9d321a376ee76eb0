// src/policy/mod.rs
// =============================================================================
// Settings layers, the cascade resolver, and the path-ignore matcher.
//
// Submodules:
// - model: GlobalPolicy, per-document / per-link overrides, resolved policies
// - resolve: global -> document -> link resolution
// - ignore: path pattern matching for files-to-ignore style settings
// =============================================================================

mod ignore;
mod model;
mod resolve;

pub use ignore::{clean_path, is_path_ignored};
pub use model::{
    DocumentDeclaration, DocumentPolicy, GlobalPolicy, LinkPolicy, Settings, DEFAULT_BACKOFF,
};
pub use resolve::{resolve_document_policy, resolve_link_policy};

// Override types are built by deserialization; tests construct them directly
#[cfg(test)]
pub use model::{DocumentOverride, LinkDeclaration, LinkOverride};
