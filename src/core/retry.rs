use std::time::Duration;

/// Exponential backoff: retry `n` (0-based) waits `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
    }

    /// Upper bound on calls made, first attempt included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Lifecycle of a fetch that retries on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    /// `attempt` counts from 1.
    Loading { attempt: u32 },
    Ready(T),
    Retrying {
        attempt: u32,
        error: String,
        delay: Duration,
    },
    Failed { attempts: u32, error: String },
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. } | FetchState::Retrying { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Retrying { error, .. } | FetchState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// State after `attempt` failed: another try after a backoff, or final failure.
    pub fn after_failure(attempt: u32, error: String, policy: &RetryPolicy) -> Self {
        let retries_done = attempt.saturating_sub(1);
        if retries_done < policy.max_retries {
            FetchState::Retrying {
                attempt,
                error,
                delay: policy.delay_for(retries_done),
            }
        } else {
            FetchState::Failed {
                attempts: attempt,
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_is_one_two_four_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn test_after_failure_transitions() {
        let policy = RetryPolicy::default();

        let state: FetchState<()> = FetchState::after_failure(1, "boom".to_string(), &policy);
        assert_eq!(
            state,
            FetchState::Retrying {
                attempt: 1,
                error: "boom".to_string(),
                delay: Duration::from_secs(1)
            }
        );

        let state: FetchState<()> = FetchState::after_failure(3, "boom".to_string(), &policy);
        assert!(matches!(state, FetchState::Retrying { delay, .. } if delay == Duration::from_secs(4)));

        let state: FetchState<()> = FetchState::after_failure(4, "boom".to_string(), &policy);
        assert_eq!(
            state,
            FetchState::Failed {
                attempts: 4,
                error: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_zero_retries_fails_immediately() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        let state: FetchState<()> = FetchState::after_failure(1, "down".to_string(), &policy);
        assert!(matches!(state, FetchState::Failed { attempts: 1, .. }));
        assert_eq!(state.error(), Some("down"));
    }
}
