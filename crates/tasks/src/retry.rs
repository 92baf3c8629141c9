//! Retry rule for task deployment.
//!
//! Deployment is the only call that is retried. The rule is a fixed number of
//! attempts with a fixed delay between them, applied only to the error kinds
//! the policy lists (connection failures by default). Everything else fails
//! on the first attempt.
//!
//! The rule does not know whether a failed deploy reached the service, so a
//! retried deploy can run twice server-side.

use std::time::Duration;

use crate::{ErrorKind, HorizonError, RetryPolicy};

/// Attempt budget for a deployment, including the first attempt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Pause between two deployment attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Fixed-count, fixed-delay retry rule used by `deploy_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRetryPolicy {
    max_attempts: u32,
    delay: Duration,
    retriable: Vec<ErrorKind>,
}

impl Default for DeployRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
            retriable: vec![ErrorKind::Connection],
        }
    }
}

impl DeployRetryPolicy {
    /// Creates a policy that retries connection failures.
    ///
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            ..Self::default()
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Replaces the set of error kinds treated as transient.
    pub fn with_retriable(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retriable = kinds.into_iter().collect();
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` if `error` is of a kind this policy retries.
    pub fn is_retriable(&self, error: &HorizonError) -> bool {
        self.retriable.contains(&error.kind())
    }

    /// Decides what follows failed attempt number `attempt` (1-based).
    ///
    /// Retryable only when the error kind is listed and another attempt is
    /// left in the budget; the delay is this policy's fixed delay.
    pub fn next_attempt(&self, attempt: u32, error: &HorizonError) -> RetryPolicy {
        if self.is_retriable(error) && attempt < self.max_attempts {
            RetryPolicy::Retryable {
                after: Some(self.delay),
            }
        } else {
            RetryPolicy::NonRetryable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection_error() -> HorizonError {
        HorizonError::Connection {
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_default_policy_shape() {
        let policy = DeployRetryPolicy::default();
        assert_eq!(policy.max_attempts(), 10);
        assert_eq!(policy.delay(), Duration::from_secs(10));
        assert!(policy.is_retriable(&connection_error()));
    }

    #[test]
    fn test_connection_errors_retry_until_last_attempt() {
        let policy = DeployRetryPolicy::default();
        for attempt in 1..10 {
            assert_eq!(
                policy.next_attempt(attempt, &connection_error()),
                RetryPolicy::Retryable {
                    after: Some(Duration::from_secs(10))
                }
            );
        }
        assert_eq!(
            policy.next_attempt(10, &connection_error()),
            RetryPolicy::NonRetryable
        );
    }

    #[test]
    fn test_remote_errors_are_never_retried() {
        let policy = DeployRetryPolicy::default();
        let err = HorizonError::RemoteApi {
            status: 503,
            body: String::new(),
        };
        assert!(!policy.is_retriable(&err));
        assert_eq!(policy.next_attempt(1, &err), RetryPolicy::NonRetryable);
    }

    #[test]
    fn test_zero_attempts_is_clamped_to_one() {
        let policy = DeployRetryPolicy::new(0, Duration::from_millis(5));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(
            policy.next_attempt(1, &connection_error()),
            RetryPolicy::NonRetryable
        );
    }

    #[test]
    fn test_custom_retriable_kinds() {
        let policy = DeployRetryPolicy::new(3, Duration::ZERO)
            .with_retriable([ErrorKind::Connection, ErrorKind::Transport]);
        let timeout = HorizonError::Transport {
            message: "timed out".to_string(),
        };
        assert!(policy.is_retriable(&timeout));
        assert_eq!(
            policy.next_attempt(2, &timeout),
            RetryPolicy::Retryable {
                after: Some(Duration::ZERO)
            }
        );
    }
}
