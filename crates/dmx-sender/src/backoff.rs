use std::time::Duration;

/// Exponential backoff for sender socket reopen attempts: starts at 1 s,
/// doubles each failure, caps at 30 s. A trimmed-down sibling of the
/// connection-retry policy used for broker reconnects — no circuit
/// breaker here, since a sender with no peer to reach simply keeps
/// reopening at the capped interval forever.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
	initial: Duration,
	max: Duration,
	current: Duration,
}

impl Default for ExponentialBackoff {
	fn default() -> Self {
		Self::new(Duration::from_secs(1), Duration::from_secs(30))
	}
}

impl ExponentialBackoff {
	#[must_use]
	pub fn new(initial: Duration, max: Duration) -> Self {
		Self { initial, max, current: initial }
	}

	/// The delay to wait before the next attempt, doubling for next time.
	pub fn next_delay(&mut self) -> Duration {
		let delay = self.current;
		self.current = (self.current * 2).min(self.max);
		delay
	}

	pub fn reset(&mut self) {
		self.current = self.initial;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn doubles_and_caps_at_thirty_seconds() {
		let mut backoff = ExponentialBackoff::default();
		assert_eq!(backoff.next_delay(), Duration::from_secs(1));
		assert_eq!(backoff.next_delay(), Duration::from_secs(2));
		assert_eq!(backoff.next_delay(), Duration::from_secs(4));
		assert_eq!(backoff.next_delay(), Duration::from_secs(8));
		assert_eq!(backoff.next_delay(), Duration::from_secs(16));
		assert_eq!(backoff.next_delay(), Duration::from_secs(30));
		assert_eq!(backoff.next_delay(), Duration::from_secs(30));
	}

	#[test]
	fn reset_returns_to_initial_delay() {
		let mut backoff = ExponentialBackoff::default();
		backoff.next_delay();
		backoff.next_delay();
		backoff.reset();
		assert_eq!(backoff.next_delay(), Duration::from_secs(1));
	}
}
