use std::thread;
use std::time::Duration;

use crate::client::{LookupAnswer, LookupClient, LookupRequest};
use crate::error::LookupError;

/// Bounded retry with exponential backoff for transient lookup failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each retry.
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }
}

pub struct Retrying<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: LookupClient> Retrying<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Retrying { inner, policy }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: LookupClient> LookupClient for Retrying<C> {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff;
        let mut attempt = 1;

        loop {
            match self.inner.lookup(request) {
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    tracing::debug!(
                        transcript = %request.transcript_id,
                        coordinate = %request.coordinate,
                        attempt,
                        error = %e,
                        "lookup: retry attempt {}/{} after {:?}",
                        attempt + 1,
                        max_attempts,
                        backoff
                    );
                    thread::sleep(backoff);
                    backoff = (backoff * 2).min(self.policy.max_backoff);
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        tracing::warn!(
                            transcript = %request.transcript_id,
                            coordinate = %request.coordinate,
                            "lookup: all {} attempts failed: {}",
                            max_attempts,
                            e
                        );
                    }
                    return Err(e);
                }
                ok => return ok,
            }
        }
    }
}
