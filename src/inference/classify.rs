//! Classification of upstream failures.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Matches the first `retry in <seconds>s` hint in an upstream message.
static RETRY_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"retry in (\d+(?:\.\d+)?)s").expect("retry hint pattern"));

/// How the orchestrator should react to a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Upstream asked us to slow down. `hint` carries the delay it requested
    /// when the message contained a usable one.
    RateLimited { hint: Option<Duration> },
    /// Anything else. Surfaced to the caller without another attempt.
    Fatal,
}

/// Upstream failure shape the default classifier understands.
///
/// Implemented by each endpoint's error type so classification stays
/// decoupled from any one SDK's error layout.
pub trait UpstreamFailure: std::error::Error + Send + Sync + 'static {
    /// HTTP status reported by the upstream, when one exists.
    fn status_code(&self) -> Option<u16> {
        None
    }
}

/// Decides whether a failed attempt is worth retrying.
pub trait ErrorClassifier<E> {
    fn classify(&self, failure: &E) -> ErrorClass;
}

/// Default classifier: HTTP 429, a literal `429` marker, or a
/// `retry in <n>s` phrase all count as rate limiting.
///
/// Matching provider message strings is brittle; swap in another
/// [`ErrorClassifier`] when an upstream exposes structured retry metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryHintClassifier;

impl<E: UpstreamFailure> ErrorClassifier<E> for RetryHintClassifier {
    fn classify(&self, failure: &E) -> ErrorClass {
        let message = failure.to_string();
        let hint = retry_hint(&message);
        if failure.status_code() == Some(429) || message.contains("429") || hint.is_some() {
            ErrorClass::RateLimited { hint }
        } else {
            ErrorClass::Fatal
        }
    }
}

/// Parse the first `retry in <seconds>s` hint out of an error message.
///
/// The seconds value may be fractional; the result rounds up to whole
/// milliseconds. A malformed or missing value yields `None`, leaving the
/// caller on its default wait.
pub fn retry_hint(message: &str) -> Option<Duration> {
    let captures = RETRY_HINT.captures(message)?;
    let seconds: f64 = captures[1].parse().ok()?;
    Some(Duration::from_millis((seconds * 1000.0).ceil() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("{message}")]
    struct FakeFailure {
        status: Option<u16>,
        message: String,
    }

    impl FakeFailure {
        fn new(status: Option<u16>, message: &str) -> Self {
            Self {
                status,
                message: message.to_string(),
            }
        }
    }

    impl UpstreamFailure for FakeFailure {
        fn status_code(&self) -> Option<u16> {
            self.status
        }
    }

    #[test]
    fn test_retry_hint_whole_seconds() {
        assert_eq!(
            retry_hint("quota exceeded, retry in 5s"),
            Some(Duration::from_millis(5000))
        );
    }

    #[test]
    fn test_retry_hint_fractional_seconds_round_up() {
        assert_eq!(
            retry_hint("retry in 2.5s"),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(
            retry_hint("retry in 0.001s"),
            Some(Duration::from_millis(1))
        );
    }

    #[test]
    fn test_retry_hint_first_match_wins() {
        assert_eq!(
            retry_hint("retry in 3s (or retry in 9s at the latest)"),
            Some(Duration::from_millis(3000))
        );
    }

    #[test]
    fn test_retry_hint_malformed_value() {
        assert_eq!(retry_hint("retry in abcs"), None);
        assert_eq!(retry_hint("please retry later"), None);
    }

    #[test]
    fn test_classify_status_429() {
        let failure = FakeFailure::new(Some(429), "too many requests");
        assert_eq!(
            RetryHintClassifier.classify(&failure),
            ErrorClass::RateLimited { hint: None }
        );
    }

    #[test]
    fn test_classify_429_marker_in_message() {
        let failure = FakeFailure::new(None, "upstream said: 429 resource exhausted");
        assert_eq!(
            RetryHintClassifier.classify(&failure),
            ErrorClass::RateLimited { hint: None }
        );
    }

    #[test]
    fn test_classify_retry_phrase_with_hint() {
        let failure = FakeFailure::new(None, "quota exceeded, retry in 5s");
        assert_eq!(
            RetryHintClassifier.classify(&failure),
            ErrorClass::RateLimited {
                hint: Some(Duration::from_millis(5000))
            }
        );
    }

    #[test]
    fn test_classify_other_failures_fatal() {
        let failure = FakeFailure::new(Some(500), "internal error");
        assert_eq!(RetryHintClassifier.classify(&failure), ErrorClass::Fatal);

        let failure = FakeFailure::new(None, "connection reset by peer");
        assert_eq!(RetryHintClassifier.classify(&failure), ErrorClass::Fatal);
    }
}
