use std::sync::atomic::{AtomicU32, Ordering};

const MIN_TICK_HZ: u32 = 25;
const MAX_TICK_HZ: u32 = 60;
const DEFAULT_TICK_HZ: u32 = 40;

/// Shared engine tick rate, driven by the slowest configured sender's fps
/// (`dmx-sender` updates it as senders are added/removed) and clamped to
/// `[25, 60]` Hz regardless of what's stored.
#[derive(Debug)]
pub struct TickRate(AtomicU32);

impl Default for TickRate {
	fn default() -> Self {
		Self(AtomicU32::new(DEFAULT_TICK_HZ))
	}
}

impl TickRate {
	#[must_use]
	pub fn new(initial_hz: u32) -> Self {
		Self(AtomicU32::new(initial_hz))
	}

	pub fn set(&self, hz: u32) {
		self.0.store(hz, Ordering::Relaxed);
	}

	#[must_use]
	pub fn effective_hz(&self) -> u32 {
		self.0.load(Ordering::Relaxed).clamp(MIN_TICK_HZ, MAX_TICK_HZ)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamps_to_engine_bounds() {
		let rate = TickRate::new(5);
		assert_eq!(rate.effective_hz(), MIN_TICK_HZ);
		rate.set(1000);
		assert_eq!(rate.effective_hz(), MAX_TICK_HZ);
		rate.set(50);
		assert_eq!(rate.effective_hz(), 50);
	}
}
