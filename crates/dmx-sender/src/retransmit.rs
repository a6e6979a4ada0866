use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Shared retransmit settings every sender task polls independently. When
/// enabled, each sender emits one extra frame every `interval` regardless
/// of its own fps — including senders whose fps is lower than
/// `1/interval`, per the fixed interaction the spec calls out.
#[derive(Debug)]
pub struct RetransmitConfig {
	enabled: AtomicBool,
	interval_secs: AtomicU64,
}

impl Default for RetransmitConfig {
	fn default() -> Self {
		Self {
			enabled: AtomicBool::new(false),
			interval_secs: AtomicU64::new(5),
		}
	}
}

impl RetransmitConfig {
	#[must_use]
	pub fn new(enabled: bool, interval_secs: u64) -> Self {
		Self {
			enabled: AtomicBool::new(enabled),
			interval_secs: AtomicU64::new(interval_secs.max(1)),
		}
	}

	pub fn set(&self, enabled: bool, interval_secs: u64) {
		self.enabled.store(enabled, Ordering::Relaxed);
		self.interval_secs.store(interval_secs.max(1), Ordering::Relaxed);
	}

	#[must_use]
	pub fn enabled(&self) -> bool {
		self.enabled.load(Ordering::Relaxed)
	}

	#[must_use]
	pub fn interval(&self) -> Duration {
		Duration::from_secs(self.interval_secs.load(Ordering::Relaxed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_disabled_five_second_interval() {
		let config = RetransmitConfig::default();
		assert!(!config.enabled());
		assert_eq!(config.interval(), Duration::from_secs(5));
	}

	#[test]
	fn zero_interval_is_floored_to_one_second() {
		let config = RetransmitConfig::new(true, 0);
		assert_eq!(config.interval(), Duration::from_secs(1));
	}
}
