// src/checker/validate.rs
// Dispatches a link to the check for its kind.

use super::http::ExternalChecker;
use super::link::{CheckResult, Link, LinkKind};
use super::local::{check_hash, check_internal};
use crate::policy::LinkPolicy;

pub struct Validator {
    external: ExternalChecker,
}

impl Validator {
    pub fn new(external: ExternalChecker) -> Self {
        Self { external }
    }

    /// `headers` are the owning document's headers, used by hash links only.
    pub async fn validate(
        &self,
        link: &Link,
        policy: &LinkPolicy,
        headers: &[String],
    ) -> CheckResult {
        match link.kind() {
            LinkKind::External => self.external.check(link, policy).await,
            LinkKind::Internal => check_internal(link),
            LinkKind::HashInternal => check_hash(link, headers),
        }
    }
}
