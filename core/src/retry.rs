//! Retry strategy for the fetch primitive.
//!
//! # Design
//! The attempt bound and the pause between attempts live in a `RetryPolicy`
//! value carried by `ClientConfig`. The default reproduces the API's
//! historical client: three attempts, no delay, and only connection failures
//! and timeouts are retried.

use std::time::Duration;

use crate::error::TransportError;

/// Number of attempts made when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Pause inserted between two consecutive attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Same pause before every retry.
    Fixed(Duration),
    /// `base * 2^(n-1)` before retry `n`, capped at `max`. With `jitter`, the
    /// delay is scaled by a random factor in `[0.5, 1.0]`.
    Exponential {
        base: Duration,
        max: Duration,
        jitter: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::None,
        }
    }
}

impl RetryPolicy {
    /// Policy making at most `max_attempts` attempts. Zero is raised to one:
    /// every fetch dispatches at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Whether a failed attempt should be followed by another one.
    pub fn is_retryable(&self, err: &TransportError) -> bool {
        err.is_transient()
    }

    /// Pause to take after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max, jitter } => {
                let shift = attempt.saturating_sub(1).min(31);
                let delay = base.saturating_mul(1u32 << shift).min(max);
                if jitter {
                    delay.mul_f64(0.5 + fastrand::f64() * 0.5)
                } else {
                    delay
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_attempts_without_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_after(1), Duration::ZERO);
        assert_eq!(policy.delay_after(2), Duration::ZERO);
    }

    #[test]
    fn zero_attempts_is_raised_to_one() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }

    #[test]
    fn fixed_backoff_is_constant() {
        let policy = RetryPolicy::new(5).with_backoff(Backoff::Fixed(Duration::from_millis(250)));
        assert_eq!(policy.delay_after(1), Duration::from_millis(250));
        assert_eq!(policy.delay_after(4), Duration::from_millis(250));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(6).with_backoff(Backoff::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(500),
            jitter: false,
        });
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
        assert_eq!(policy.delay_after(4), Duration::from_millis(500));
        assert_eq!(policy.delay_after(40), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_half_to_full_delay() {
        let policy = RetryPolicy::new(3).with_backoff(Backoff::Exponential {
            base: Duration::from_millis(200),
            max: Duration::from_secs(1),
            jitter: true,
        });
        for _ in 0..50 {
            let d = policy.delay_after(2);
            assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(400), "{d:?}");
        }
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(&TransportError::Connect("refused".into())));
        assert!(policy.is_retryable(&TransportError::Timeout("slow".into())));
        assert!(!policy.is_retryable(&TransportError::Other("tls".into())));
    }
}
