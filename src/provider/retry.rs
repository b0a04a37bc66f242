//! Exponential backoff for rate-limited providers

use super::chat::{ChatMessage, ChatModel, CompletionParams, ProviderError};
use rand::Rng;
use std::time::Duration;
use tracing::warn;

/// Delay schedule between retries
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry
    pub initial: Duration,
    /// Growth factor per attempt
    pub factor: f64,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Give up after this many retries; `None` retries forever
    pub max_retries: Option<u32>,
    /// Draw each delay uniformly from `[0, delay]`
    pub jitter: bool,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            factor: 2.0,
            max_delay: Duration::from_secs(60),
            max_retries: None,
            jitter: true,
        }
    }
}

impl BackoffPolicy {
    /// Un-jittered delay before retry number `attempt` (0-based)
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let scale = self.factor.powi(attempt.min(i32::MAX as u32) as i32);
        let secs = (self.initial.as_secs_f64() * scale).min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Whether another retry is allowed after `attempt` retries
    #[must_use]
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_retries.is_none_or(|max| attempt < max)
    }
}

type Sleeper = Box<dyn Fn(Duration) + Send + Sync>;

/// Wraps a model and retries rate-limited calls with growing delays
///
/// Non-transient failures are returned immediately.
pub struct RetryingModel<M> {
    inner: M,
    policy: BackoffPolicy,
    sleep: Sleeper,
}

impl<M: ChatModel> RetryingModel<M> {
    pub fn new(inner: M, policy: BackoffPolicy) -> Self {
        Self {
            inner,
            policy,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the blocking sleep, e.g. to record delays
    #[must_use]
    pub fn with_sleeper(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    fn wait_time(&self, attempt: u32) -> Duration {
        let delay = self.policy.delay(attempt);
        if self.policy.jitter {
            delay.mul_f64(rand::rng().random_range(0.0..=1.0))
        } else {
            delay
        }
    }
}

impl<M: ChatModel> ChatModel for RetryingModel<M> {
    fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(messages, params) {
                Ok(reply) => return Ok(reply),
                Err(err) if err.is_transient() && self.policy.allows(attempt) => {
                    let wait = self.wait_time(attempt);
                    warn!(attempt, wait_ms = wait.as_millis() as u64, %err, "retrying completion");
                    (self.sleep)(wait);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
