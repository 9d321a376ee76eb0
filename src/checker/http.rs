// src/checker/http.rs
// =============================================================================
// This module checks external links by making HTTP GET requests.
//
// Key functionality:
// - Repeats failed requests up to the link's `request-repeats`
// - Backs off (via the Waiter) when the server says 429 Too Many Requests
// - Verifies `#fragment` anchors against the ids in the fetched page
// - Caps in-flight requests across all links with a semaphore
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Arc<dyn Trait>: Shared, swappable collaborators (waiter, matcher)
// - Semaphore permits: RAII guards that are released when dropped
// =============================================================================

use percent_encoding::percent_decode_str;
use reqwest::{redirect, Client, Response, StatusCode};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use url::Url;

use super::backoff::{SleepWaiter, Waiter};
use super::html::extract_anchors;
use super::link::{CheckResult, Link};
use super::suggest::{ClosestMatch, NgramMatcher};
use crate::error::Result;
use crate::policy::LinkPolicy;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 10;

pub const TOO_MANY_REQUESTS: &str = "Too many requests";
pub const DEADLINE_EXCEEDED: &str = "Deadline exceeded";
pub const ANCHOR_MISSING: &str = "The specified anchor doesn't exist";

// What a single attempt concluded
enum Attempt {
    /// Stop repeating, this is the answer
    Done(CheckResult),
    /// Failed, but another attempt may help
    Retry(CheckResult),
    /// 429: wait, then try again
    RateLimited,
}

/// Checks external links. One instance is shared by every document of a run.
pub struct ExternalChecker {
    client: Client,
    waiter: Arc<dyn Waiter>,
    matcher: Arc<dyn ClosestMatch>,
    permits: Arc<Semaphore>,
    deadline: Option<Instant>,
}

impl ExternalChecker {
    /// Builds a checker with the production HTTP client and waiter.
    ///
    /// Redirects are followed (up to MAX_REDIRECTS). A 3xx the client could
    /// not follow only passes when the link's policy allows redirects.
    pub fn new(max_in_flight: usize) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("link-auditor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, Arc::new(SleepWaiter), max_in_flight))
    }

    pub fn with_client(client: Client, waiter: Arc<dyn Waiter>, max_in_flight: usize) -> Self {
        Self {
            client,
            waiter,
            matcher: Arc::new(NgramMatcher::default()),
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
            deadline: None,
        }
    }

    /// After `deadline` no new request starts and in-flight ones are dropped.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Checks one external link under its resolved policy.
    ///
    /// Never fails: every problem ends up in the returned CheckResult.
    pub async fn check(&self, link: &Link, policy: &LinkPolicy) -> CheckResult {
        let parsed = match Url::parse(link.resolved()) {
            Ok(url) => url,
            Err(e) => return CheckResult::failed(e.to_string()),
        };

        // The request goes to scheme://host/path; the fragment is kept
        // (decoded, like the page's ids) for the anchor check.
        let mut target = parsed.clone();
        target.set_fragment(None);
        target.set_query(None);
        let fragment = parsed
            .fragment()
            .map(|f| percent_decode_str(f).decode_utf8_lossy().into_owned())
            .filter(|f| !f.is_empty());

        let timeout = match policy.timeout {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        let attempts = policy.request_repeats.max(1);

        let mut result = CheckResult::failed(DEADLINE_EXCEEDED);
        for attempt in 1..=attempts {
            if self.deadline_passed() {
                result = CheckResult::failed(DEADLINE_EXCEEDED);
                break;
            }

            log::debug!("GET {} (attempt {}/{})", target, attempt, attempts);
            match self.attempt(&target, fragment.as_deref(), policy, timeout).await {
                Attempt::Done(done) => {
                    result = done;
                    break;
                }
                Attempt::Retry(failed) => result = failed,
                Attempt::RateLimited => {
                    result = CheckResult::failed(TOO_MANY_REQUESTS);
                    if self.within_deadline(self.waiter.wait(policy.backoff)).await.is_none() {
                        result = CheckResult::failed(DEADLINE_EXCEEDED);
                        break;
                    }
                }
            }
        }

        if !result.is_ok() {
            log::debug!("{} failed: {:?}", link.resolved(), result.message);
        }
        result
    }

    async fn attempt(
        &self,
        target: &Url,
        fragment: Option<&str>,
        policy: &LinkPolicy,
        timeout: Duration,
    ) -> Attempt {
        // Held for the request and body read only, never across a backoff
        let Ok(_permit) = self.permits.acquire().await else {
            return Attempt::Done(CheckResult::failed("Request pool closed"));
        };

        let request = self.client.get(target.as_str()).timeout(timeout).send();
        let response = match self.within_deadline(request).await {
            None => return Attempt::Done(CheckResult::failed(DEADLINE_EXCEEDED)),
            Some(Err(e)) => return Attempt::Retry(CheckResult::failed(e.to_string())),
            Some(Ok(response)) => response,
        };

        self.analyze_response(response, fragment, policy).await
    }

    // HTTP status codes (after the client followed what it could):
    // - 2xx: success (3xx too when redirects are allowed)
    // - 429: rate limited, back off and retry
    // - anything else: failure with the status line, retry
    async fn analyze_response(
        &self,
        response: Response,
        fragment: Option<&str>,
        policy: &LinkPolicy,
    ) -> Attempt {
        let status = response.status();

        let accepted =
            status.is_success() || (policy.allow_redirect && status.is_redirection());
        if accepted {
            if !policy.allow_redirect {
                if let Some(fragment) = fragment.filter(|f| starts_with_letter(f)) {
                    return Attempt::Done(self.verify_anchor(response, fragment).await);
                }
            }
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                return Attempt::Done(CheckResult::ok_with(format!("Redirects to {}", location)));
            }
            return Attempt::Done(CheckResult::ok());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Attempt::RateLimited;
        }

        // e.g. "404 Not Found"
        Attempt::Retry(CheckResult::failed(status.to_string()))
    }

    async fn verify_anchor(&self, response: Response, fragment: &str) -> CheckResult {
        let body = match self.within_deadline(response.text()).await {
            None => return CheckResult::failed(DEADLINE_EXCEEDED),
            Some(Err(e)) => return CheckResult::failed(e.to_string()),
            Some(Ok(body)) => body,
        };

        let anchors = extract_anchors(&body);
        if anchors.iter().any(|a| a == fragment) {
            return CheckResult::ok();
        }

        match self.matcher.best_match(&anchors, fragment) {
            Some(closest) => CheckResult::failed(format!(
                "{} in website. Did you mean #{}?",
                ANCHOR_MISSING, closest
            )),
            None => CheckResult::failed(ANCHOR_MISSING),
        }
    }

    async fn within_deadline<F: Future>(&self, fut: F) -> Option<F::Output> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
            None => Some(fut.await),
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

// Numeric or symbolic fragments (#L10, #123, #/route) are often rendered
// client-side, so only letter-leading ones are verified.
fn starts_with_letter(fragment: &str) -> bool {
    fragment
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the permit dropped before the waiter runs?
//    - `attempt` owns the permit; it goes out of scope when attempt returns
//    - The backoff sleep happens afterwards in `check`
//    - So a rate-limited link never keeps a request slot busy while asleep
//
// 2. Why are attempts a plain `for` loop?
//    - A link's attempts must stay strictly ordered
//    - Concurrency happens across links (see audit::run), never within one
//
// 3. What does timeout_at do on expiry?
//    - It drops the inner future, which aborts the request (or backoff sleep)
//    - Results already produced elsewhere are left untouched
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::stub::{closed_port_url, StubResponse, StubServer};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingWaiter {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Waiter for CountingWaiter {
        async fn wait(&self, _backoff: Duration) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn test_client() -> Client {
        Client::builder()
            .no_proxy()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .unwrap()
    }

    fn checker(waiter: Arc<CountingWaiter>) -> ExternalChecker {
        ExternalChecker::with_client(test_client(), waiter, 4)
    }

    fn link(url: &str) -> Link {
        Link::classify(url, "", Path::new("")).unwrap()
    }

    fn repeats(n: u32) -> LinkPolicy {
        LinkPolicy {
            request_repeats: n,
            timeout: 5,
            ..LinkPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_ok_without_fragment() {
        let server = StubServer::start(vec![StubResponse::new(200, "OK")]).await;
        let result = checker(Arc::default())
            .check(&link(&server.url("/page")), &repeats(0))
            .await;
        assert_eq!(result, CheckResult::ok());
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_not_found_reports_status_line() {
        let server = StubServer::start(vec![StubResponse::new(404, "Not Found")]).await;
        let result = checker(Arc::default())
            .check(&link(&server.url("/missing")), &repeats(0))
            .await;
        assert_eq!(result, CheckResult::failed("404 Not Found"));
    }

    #[tokio::test]
    async fn test_rate_limited_then_ok() {
        let server = StubServer::start(vec![
            StubResponse::new(429, "Too Many Requests"),
            StubResponse::new(200, "OK"),
        ])
        .await;
        let waiter = Arc::new(CountingWaiter::default());

        let result = checker(Arc::clone(&waiter))
            .check(&link(&server.url("/")), &repeats(2))
            .await;

        assert_eq!(result, CheckResult::ok());
        assert_eq!(waiter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_rate_limited_every_time() {
        let server = StubServer::start(vec![StubResponse::new(429, "Too Many Requests")]).await;
        let waiter = Arc::new(CountingWaiter::default());

        let result = checker(Arc::clone(&waiter))
            .check(&link(&server.url("/")), &repeats(3))
            .await;

        assert_eq!(result, CheckResult::failed(TOO_MANY_REQUESTS));
        assert_eq!(waiter.calls.load(Ordering::SeqCst), 3);
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_server_error_is_retried_without_backoff() {
        let server = StubServer::start(vec![
            StubResponse::new(500, "Internal Server Error"),
            StubResponse::new(200, "OK"),
        ])
        .await;
        let waiter = Arc::new(CountingWaiter::default());

        let once = checker(Arc::clone(&waiter))
            .check(&link(&server.url("/")), &repeats(1))
            .await;
        assert_eq!(once, CheckResult::failed("500 Internal Server Error"));

        let again = checker(Arc::clone(&waiter))
            .check(&link(&server.url("/")), &repeats(3))
            .await;
        assert_eq!(again, CheckResult::ok());
        assert_eq!(server.hits(), 2);
        assert_eq!(waiter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_anchor_present() {
        let page = r#"<h2 id="section-one">One</h2><h2 id="section-two">Two</h2>"#;
        let server = StubServer::start(vec![StubResponse::new(200, "OK").body(page)]).await;
        let result = checker(Arc::default())
            .check(&link(&server.url("/doc#section-two")), &repeats(0))
            .await;
        assert_eq!(result, CheckResult::ok());
    }

    #[tokio::test]
    async fn test_anchor_typo_gets_a_suggestion() {
        let page = r#"<h2 id="section-one">One</h2><h2 id="section-two">Two</h2>"#;
        let server = StubServer::start(vec![StubResponse::new(200, "OK").body(page)]).await;

        let result = checker(Arc::default())
            .check(&link(&server.url("/doc#secion-one")), &repeats(0))
            .await;

        assert!(!result.status);
        let message = result.message.unwrap();
        assert!(message.contains("Did you mean"), "{}", message);
        assert!(message.contains("section-one"), "{}", message);
    }

    #[tokio::test]
    async fn test_anchor_without_any_close_match() {
        let page = r#"<h2 id="install">Install</h2>"#;
        let server = StubServer::start(vec![StubResponse::new(200, "OK").body(page)]).await;
        let result = checker(Arc::default())
            .check(&link(&server.url("/doc#zzz")), &repeats(0))
            .await;
        assert_eq!(result, CheckResult::failed(ANCHOR_MISSING));
    }

    #[tokio::test]
    async fn test_numeric_fragment_skips_anchor_check() {
        let server = StubServer::start(vec![StubResponse::new(200, "OK").body("<p></p>")]).await;
        let result = checker(Arc::default())
            .check(&link(&server.url("/file#L10")), &repeats(0))
            .await;
        // 'L' is a letter, so this one IS verified
        assert!(!result.status);

        let result = checker(Arc::default())
            .check(&link(&server.url("/file#123")), &repeats(0))
            .await;
        assert_eq!(result, CheckResult::ok());
    }

    #[tokio::test]
    async fn test_percent_encoded_fragment_matches_decoded_id() {
        let page = r#"<h2 id="café">Café</h2><h2 id="my anchor">Mine</h2>"#;
        let server = StubServer::start(vec![StubResponse::new(200, "OK").body(page)]).await;

        for fragment in ["#café", "#caf%C3%A9", "#my%20anchor"] {
            let url = server.url(&format!("/doc{}", fragment));
            let result = checker(Arc::default()).check(&link(&url), &repeats(0)).await;
            assert_eq!(result, CheckResult::ok(), "{}", fragment);
        }
    }

    #[tokio::test]
    async fn test_followed_redirect_passes_by_default() {
        let page = r#"<h2 id="anchor">Here</h2>"#;
        let target = StubServer::start(vec![StubResponse::new(200, "OK").body(page)]).await;
        let origin = StubServer::start(vec![
            StubResponse::new(301, "Moved Permanently").header("Location", &target.url("/new"))
        ])
        .await;

        let result = checker(Arc::default())
            .check(&link(&origin.url("/old#anchor")), &repeats(0))
            .await;

        assert_eq!(result, CheckResult::ok());
        assert_eq!(origin.hits(), 1);
        assert_eq!(target.hits(), 1);
    }

    #[tokio::test]
    async fn test_unfollowed_redirect_depends_on_policy() {
        // 300 is never followed by the client
        let server = StubServer::start(vec![
            StubResponse::new(300, "Multiple Choices").header("Location", "https://example.com/new")
        ])
        .await;
        let url = server.url("/old#anchor");

        let strict = checker(Arc::default()).check(&link(&url), &repeats(0)).await;
        assert_eq!(strict, CheckResult::failed("300 Multiple Choices"));

        let relaxed = LinkPolicy {
            allow_redirect: true,
            ..repeats(0)
        };
        let allowed = checker(Arc::default()).check(&link(&url), &relaxed).await;
        assert_eq!(
            allowed,
            CheckResult::ok_with("Redirects to https://example.com/new")
        );
    }

    #[tokio::test]
    async fn test_malformed_url() {
        let result = checker(Arc::default())
            .check(&link("http://[oops"), &repeats(3))
            .await;
        assert!(!result.status);
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn test_transport_error_is_retried() {
        let server = StubServer::start(vec![
            StubResponse::hang_up(),
            StubResponse::new(200, "OK"),
        ])
        .await;
        let waiter = Arc::new(CountingWaiter::default());

        let result = checker(Arc::clone(&waiter))
            .check(&link(&server.url("/")), &repeats(2))
            .await;

        assert_eq!(result, CheckResult::ok());
        assert_eq!(server.hits(), 2);
        assert_eq!(waiter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_error_is_recorded() {
        let url = closed_port_url().await;
        let result = checker(Arc::default()).check(&link(&url), &repeats(2)).await;
        assert!(!result.status);
        assert!(!result.message.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_deadline_makes_no_request() {
        let server = StubServer::start(vec![StubResponse::new(200, "OK")]).await;
        let checker = checker(Arc::default()).with_deadline(Some(Instant::now()));

        let result = checker.check(&link(&server.url("/")), &repeats(2)).await;

        assert_eq!(result, CheckResult::failed(DEADLINE_EXCEEDED));
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_backoff_is_cut_short_by_deadline() {
        let server = StubServer::start(vec![StubResponse::new(429, "Too Many Requests")]).await;
        let checker = ExternalChecker::with_client(test_client(), Arc::new(SleepWaiter), 4)
            .with_deadline(Some(Instant::now() + Duration::from_millis(300)));
        let policy = LinkPolicy {
            backoff: Duration::from_secs(30),
            ..repeats(3)
        };

        let started = Instant::now();
        let result = checker.check(&link(&server.url("/")), &policy).await;

        assert_eq!(result, CheckResult::failed(DEADLINE_EXCEEDED));
        assert_eq!(server.hits(), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
