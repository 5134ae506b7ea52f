//! Delivery parameters: response delivery engine control.
//!
//! [`DeliveryParams`] groups the static settings that steer the
//! [`ResponseDeliveryEngine`](crate::use_cases::await_response::ResponseDeliveryEngine):
//! whether the operator prefers push streaming, how long a silent tail
//! connection may stall, and the poll backoff policy.

use dbl_chat_domain::PollPolicy;
use std::time::Duration;

/// Default read timeout for a silent tail connection before reconnecting.
pub const DEFAULT_TAIL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DeliveryParams {
    /// Use the tail surface when the gateway advertises it.
    pub prefer_streaming: bool,
    /// Reconnect a tail stream that produced nothing for this long.
    pub tail_idle_timeout: Duration,
    /// Poll-mode backoff and page size.
    pub poll: PollPolicy,
}

impl Default for DeliveryParams {
    fn default() -> Self {
        Self {
            prefer_streaming: true,
            tail_idle_timeout: DEFAULT_TAIL_IDLE_TIMEOUT,
            poll: PollPolicy::default(),
        }
    }
}

impl DeliveryParams {
    // ==================== Builder Methods ====================

    pub fn with_prefer_streaming(mut self, prefer: bool) -> Self {
        self.prefer_streaming = prefer;
        self
    }

    pub fn with_tail_idle_timeout(mut self, timeout: Duration) -> Self {
        self.tail_idle_timeout = timeout;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DeliveryParams::default();
        assert!(params.prefer_streaming);
        assert_eq!(params.tail_idle_timeout, Duration::from_secs(30));
        assert_eq!(params.poll.page_limit, 200);
    }

    #[test]
    fn test_builder_chain() {
        let params = DeliveryParams::default()
            .with_prefer_streaming(false)
            .with_tail_idle_timeout(Duration::from_secs(5));
        assert!(!params.prefer_streaming);
        assert_eq!(params.tail_idle_timeout, Duration::from_secs(5));
    }
}
