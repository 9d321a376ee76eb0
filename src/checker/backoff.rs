// src/checker/backoff.rs
// =============================================================================
// The delay taken after a server answers "429 Too Many Requests".
//
// It is a trait so tests can count calls instead of sleeping. The production
// waiter uses tokio::time::sleep, which only suspends the link that hit the
// rate limit; every other link keeps going.
// =============================================================================

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Waiter: Send + Sync {
    async fn wait(&self, backoff: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SleepWaiter;

#[async_trait]
impl Waiter for SleepWaiter {
    async fn wait(&self, backoff: Duration) {
        log::debug!("rate limited, backing off for {:?}", backoff);
        tokio::time::sleep(backoff).await;
    }
}
