//! Bounded retry loop around a remote model endpoint.

use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::classify::{ErrorClass, ErrorClassifier, UpstreamFailure};
use super::request::InferenceRequest;

/// Default total number of calls per invocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wait when upstream rate-limits without a usable hint.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_millis(10_000);

/// Fixed margin added on top of an upstream-requested wait.
pub const RATE_LIMIT_SAFETY_MARGIN: Duration = Duration::from_millis(2000);

/// Default cooldown suggested to users once retries are exhausted.
pub const DEFAULT_COOLDOWN_HINT: Duration = Duration::from_secs(120);

/// Remote generative endpoint the orchestrator drives.
#[allow(async_fn_in_trait)]
pub trait ModelEndpoint {
    type Error: UpstreamFailure;

    /// Send the full request content and return the raw response text.
    ///
    /// Zero-length text is a valid response; callers decide what an empty
    /// completion means.
    async fn generate(&self, request: &InferenceRequest) -> Result<String, Self::Error>;
}

/// Retry configuration for a single invocation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of calls allowed, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Wait between attempts when upstream gives no usable hint.
    pub default_wait: Duration,
    /// Cooldown suggested in the exhaustion message. User-facing copy, not a
    /// timing guarantee.
    pub cooldown_hint: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_wait: DEFAULT_RATE_LIMIT_WAIT,
            cooldown_hint: DEFAULT_COOLDOWN_HINT,
        }
    }
}

impl RetryPolicy {
    /// Set the total number of calls allowed. Clamped to at least one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the fallback wait used when upstream gives no hint.
    pub fn with_default_wait(mut self, default_wait: Duration) -> Self {
        self.default_wait = default_wait;
        self
    }

    /// Set the cooldown mentioned in the exhaustion message.
    pub fn with_cooldown_hint(mut self, cooldown_hint: Duration) -> Self {
        self.cooldown_hint = cooldown_hint;
        self
    }
}

/// Outcome of one upstream call.
#[derive(Debug)]
pub enum AttemptOutcome<E> {
    /// Raw response text, possibly empty.
    Success(String),
    /// Upstream rate-limited; wait this long before the next call.
    RateLimited { wait: Duration },
    /// Non-retryable failure.
    Failed(E),
}

/// Transient record of one call made during an invocation.
#[derive(Debug)]
pub struct InferenceAttempt<E> {
    /// 0-based position of the call within the invocation.
    pub index: u32,
    pub outcome: AttemptOutcome<E>,
}

/// Terminal failures surfaced by [`Orchestrator::invoke`].
#[derive(Debug, Error)]
pub enum InferenceError<E: UpstreamFailure> {
    /// Every allowed call was rate-limited.
    #[error(
        "service is currently busy (rate limit), please try again in {} minute(s)",
        cooldown_minutes(.cooldown_hint)
    )]
    RateLimitExhausted {
        /// Total calls made, all of them rate-limited.
        attempts: u32,
        /// Suggested cooldown from the active policy.
        cooldown_hint: Duration,
    },
    /// First non-rate-limit failure from the endpoint, unmodified.
    #[error("upstream failure: {0}")]
    Upstream(#[source] E),
}

fn cooldown_minutes(cooldown: &Duration) -> u64 {
    cooldown.as_secs().div_ceil(60).max(1)
}

/// Drives a [`ModelEndpoint`] with transparent rate-limit retries.
///
/// Rate-limited attempts are absorbed and retried up to the policy's attempt
/// budget, waiting the upstream-hinted delay plus a fixed safety margin (or
/// the policy default when no hint is present). Any other failure propagates
/// on first occurrence.
///
/// The orchestrator is stateless across invocations and holds no shared
/// mutable state; concurrent callers may invoke it in parallel. The only
/// suspension point is the wait between attempts, which parks the calling
/// task only.
pub struct Orchestrator<E, C> {
    endpoint: E,
    classifier: C,
}

impl<E, C> Orchestrator<E, C>
where
    E: ModelEndpoint,
    C: ErrorClassifier<E::Error>,
{
    /// Create a new orchestrator over the given endpoint and classifier.
    pub fn new(endpoint: E, classifier: C) -> Self {
        Self {
            endpoint,
            classifier,
        }
    }

    /// Borrow the wrapped endpoint.
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Send the request, retrying while upstream signals rate limiting.
    ///
    /// Returns the raw response text of the first successful call. Fails
    /// with [`InferenceError::Upstream`] on the first non-rate-limit failure
    /// and with [`InferenceError::RateLimitExhausted`] once the attempt
    /// budget is consumed.
    pub async fn invoke(
        &self,
        request: &InferenceRequest,
        policy: &RetryPolicy,
    ) -> Result<String, InferenceError<E::Error>> {
        let max_attempts = policy.max_attempts.max(1);

        for index in 0..max_attempts {
            let attempt = self.attempt(request, policy, index).await;
            match attempt.outcome {
                AttemptOutcome::Success(text) => {
                    debug!("attempt {} succeeded ({} bytes)", index, text.len());
                    return Ok(text);
                }
                AttemptOutcome::Failed(error) => {
                    debug!("attempt {} failed, not retrying: {}", index, error);
                    return Err(InferenceError::Upstream(error));
                }
                AttemptOutcome::RateLimited { wait } => {
                    // No point sleeping when the budget is already spent.
                    if index + 1 < max_attempts {
                        warn!(
                            "rate limited on attempt {}/{}, waiting {}ms before retrying",
                            index + 1,
                            max_attempts,
                            wait.as_millis()
                        );
                        sleep(wait).await;
                    }
                }
            }
        }

        Err(InferenceError::RateLimitExhausted {
            attempts: max_attempts,
            cooldown_hint: policy.cooldown_hint,
        })
    }

    /// Make a single classified call without retrying.
    ///
    /// Rate-limited outcomes carry the wait the policy would impose: the
    /// upstream hint plus [`RATE_LIMIT_SAFETY_MARGIN`], or the policy default
    /// when the hint is missing or malformed.
    pub async fn attempt(
        &self,
        request: &InferenceRequest,
        policy: &RetryPolicy,
        index: u32,
    ) -> InferenceAttempt<E::Error> {
        let outcome = match self.endpoint.generate(request).await {
            Ok(text) => AttemptOutcome::Success(text),
            Err(error) => match self.classifier.classify(&error) {
                ErrorClass::RateLimited { hint } => AttemptOutcome::RateLimited {
                    wait: hint
                        .map(|h| h + RATE_LIMIT_SAFETY_MARGIN)
                        .unwrap_or(policy.default_wait),
                },
                ErrorClass::Fatal => AttemptOutcome::Failed(error),
            },
        };

        InferenceAttempt { index, outcome }
    }
}
