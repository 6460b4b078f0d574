//! Retrying remote-inference client.
//!
//! [`Orchestrator`] drives a [`ModelEndpoint`] with a bounded retry loop:
//! rate-limit responses are absorbed and retried after an upstream-directed
//! wait, any other failure surfaces immediately.

mod classify;
mod orchestrator;
mod request;

pub use classify::{retry_hint, ErrorClass, ErrorClassifier, RetryHintClassifier, UpstreamFailure};
pub use orchestrator::{
    AttemptOutcome, InferenceAttempt, InferenceError, ModelEndpoint, Orchestrator, RetryPolicy,
    DEFAULT_COOLDOWN_HINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_RATE_LIMIT_WAIT,
    RATE_LIMIT_SAFETY_MARGIN,
};
pub use request::{InferencePart, InferenceRequest};
