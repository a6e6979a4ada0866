use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic "last activity" clock. The dispatcher touches it on every
/// command that changes universe state; the fallback controller only reads
/// it, so a fallback's own playback never re-arms its own trigger.
#[derive(Debug)]
pub struct ActivityClock(Mutex<Instant>);

impl Default for ActivityClock {
	fn default() -> Self {
		Self(Mutex::new(Instant::now()))
	}
}

impl ActivityClock {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn touch(&self) {
		*self.0.lock().expect("activity clock poisoned") = Instant::now();
	}

	#[must_use]
	pub fn last(&self) -> Instant {
		*self.0.lock().expect("activity clock poisoned")
	}

	#[must_use]
	pub fn idle_for(&self) -> Duration {
		self.last().elapsed()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::thread::sleep;

	#[test]
	fn touch_resets_idle_duration() {
		let clock = ActivityClock::new();
		sleep(Duration::from_millis(20));
		assert!(clock.idle_for() >= Duration::from_millis(20));
		clock.touch();
		assert!(clock.idle_for() < Duration::from_millis(20));
	}
}
