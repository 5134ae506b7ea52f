//! Adaptive delay for poll-mode delivery.
//!
//! Idle pages stretch the delay gently so an idle conversation does not
//! hammer the gateway; transport failures stretch it faster and are
//! counted against a consecutive-failure budget.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delay before the first poll retry.
pub const INITIAL_DELAY: Duration = Duration::from_millis(500);
/// Growth factor after a page without a match.
pub const IDLE_FACTOR: f64 = 1.5;
/// Ceiling for idle growth.
pub const IDLE_CEILING: Duration = Duration::from_secs(5);
/// Growth factor after a transport failure.
pub const FAILURE_FACTOR: f64 = 2.0;
/// Ceiling for failure growth.
pub const FAILURE_CEILING: Duration = Duration::from_secs(15);
/// Consecutive failures that end polling.
pub const MAX_FAILURES: u32 = 5;
/// Largest snapshot page requested.
pub const PAGE_LIMIT: u32 = 200;

/// Tunables for poll-mode delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollPolicy {
    pub initial_delay: Duration,
    pub idle_factor: f64,
    pub idle_ceiling: Duration,
    pub failure_factor: f64,
    pub failure_ceiling: Duration,
    pub max_failures: u32,
    pub page_limit: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: INITIAL_DELAY,
            idle_factor: IDLE_FACTOR,
            idle_ceiling: IDLE_CEILING,
            failure_factor: FAILURE_FACTOR,
            failure_ceiling: FAILURE_CEILING,
            max_failures: MAX_FAILURES,
            page_limit: PAGE_LIMIT,
        }
    }
}

/// What the poller should do after a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStep {
    /// Sleep for the delay, then retry.
    Retry(Duration),
    /// The consecutive-failure budget is spent.
    Exhausted { failures: u32 },
}

/// Backoff state for one `await_response` call.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    policy: PollPolicy,
    delay: Duration,
    failures: u32,
}

impl PollBackoff {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            delay: policy.initial_delay,
            policy,
            failures: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// A page arrived (empty or not) without a match.
    ///
    /// Clears the failure streak and returns the next sleep.
    pub fn on_page(&mut self) -> Duration {
        self.failures = 0;
        self.delay = grow(self.delay, self.policy.idle_factor, self.policy.idle_ceiling);
        self.delay
    }

    /// A retryable transport failure happened.
    pub fn on_failure(&mut self) -> BackoffStep {
        self.failures += 1;
        self.delay = grow(
            self.delay,
            self.policy.failure_factor,
            self.policy.failure_ceiling,
        );
        if self.failures >= self.policy.max_failures {
            BackoffStep::Exhausted {
                failures: self.failures,
            }
        } else {
            BackoffStep::Retry(self.delay)
        }
    }
}

/// Saturates at `ceiling` when the product is not a representable duration.
fn grow(delay: Duration, factor: f64, ceiling: Duration) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor)
        .unwrap_or(ceiling)
        .min(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_pages_grow_to_ceiling() {
        let mut backoff = PollBackoff::new(PollPolicy::default());
        let mut previous = backoff.delay();
        let mut reached_ceiling = false;
        for _ in 0..20 {
            let next = backoff.on_page();
            if previous < IDLE_CEILING {
                assert!(next > previous);
            } else {
                reached_ceiling = true;
                assert_eq!(next, IDLE_CEILING);
            }
            previous = next;
        }
        assert!(reached_ceiling);
        assert_eq!(backoff.on_page(), IDLE_CEILING);
    }

    #[test]
    fn test_first_idle_sleep() {
        let mut backoff = PollBackoff::new(PollPolicy::default());
        assert_eq!(backoff.on_page(), Duration::from_millis(750));
    }

    #[test]
    fn test_failures_grow_and_exhaust_on_fifth() {
        let mut backoff = PollBackoff::new(PollPolicy::default());
        let mut delays = Vec::new();
        for _ in 0..4 {
            match backoff.on_failure() {
                BackoffStep::Retry(delay) => delays.push(delay),
                BackoffStep::Exhausted { .. } => panic!("exhausted too early"),
            }
        }
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
        assert_eq!(backoff.on_failure(), BackoffStep::Exhausted { failures: 5 });
    }

    #[test]
    fn test_failure_delay_caps_at_ceiling() {
        let policy = PollPolicy {
            max_failures: 100,
            ..PollPolicy::default()
        };
        let mut backoff = PollBackoff::new(policy);
        for _ in 0..10 {
            backoff.on_failure();
        }
        assert_eq!(backoff.delay(), FAILURE_CEILING);
    }

    #[test]
    fn test_page_resets_failure_streak() {
        let mut backoff = PollBackoff::new(PollPolicy::default());
        for _ in 0..4 {
            backoff.on_failure();
        }
        backoff.on_page();
        assert_eq!(backoff.failures(), 0);
        assert!(matches!(backoff.on_failure(), BackoffStep::Retry(_)));
    }

    #[test]
    fn test_non_finite_factors_saturate_at_ceiling() {
        let policy = PollPolicy {
            idle_factor: f64::INFINITY,
            failure_factor: f64::NAN,
            ..PollPolicy::default()
        };
        let mut backoff = PollBackoff::new(policy.clone());
        assert_eq!(backoff.on_page(), IDLE_CEILING);

        let mut backoff = PollBackoff::new(policy);
        assert_eq!(backoff.on_failure(), BackoffStep::Retry(FAILURE_CEILING));
    }
}
