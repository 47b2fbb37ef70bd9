//! Fixed-interval backoff for reconnection

use std::time::Duration;

/// Constant delay between reconnect attempts.
///
/// Tracks how many consecutive attempts have failed so the reconnect loop
/// can report it; the delay itself never grows.
#[derive(Debug, Clone)]
pub struct FixedBackoff {
    /// Delay before every attempt
    interval: Duration,
    /// Consecutive failures since the last reset
    attempts: u32,
}

impl FixedBackoff {
    /// Create a new backoff
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            attempts: 0,
        }
    }

    /// Record a failed attempt and get the delay before the next one
    pub fn next_delay(&mut self) -> Duration {
        self.attempts = self.attempts.saturating_add(1);
        self.interval
    }

    /// Consecutive failed attempts
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Forget past failures after a successful connection
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_is_constant() {
        let mut backoff = FixedBackoff::new(Duration::from_secs(5));

        let d1 = backoff.next_delay();
        let d2 = backoff.next_delay();
        let d3 = backoff.next_delay();

        assert_eq!(d1, Duration::from_secs(5));
        assert_eq!(d2, Duration::from_secs(5));
        assert_eq!(d3, Duration::from_secs(5));
        assert_eq!(backoff.attempts(), 3);
    }

    #[test]
    fn test_reset_clears_attempts() {
        let mut backoff = FixedBackoff::new(Duration::from_millis(10));
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.attempts(), 0);
    }
}
