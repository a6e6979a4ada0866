use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use dmx_model::{Protocol, SenderDescriptor};
use serde::Serialize;
use std::net::IpAddr;

/// Shared, lock-light counters a sender task updates as it runs and the
/// registry reads back for `status()`.
#[derive(Debug, Default)]
pub struct SenderStatus {
	packets_sent: AtomicU64,
	failed: AtomicBool,
	last_error: Mutex<Option<String>>,
}

impl SenderStatus {
	pub fn record_sent(&self) {
		self.packets_sent.fetch_add(1, Ordering::Relaxed);
		self.failed.store(false, Ordering::Relaxed);
	}

	pub fn record_transient_error(&self, message: String) {
		*self.last_error.lock().expect("sender status poisoned") = Some(message);
	}

	pub fn mark_failed(&self, message: String) {
		self.failed.store(true, Ordering::Relaxed);
		*self.last_error.lock().expect("sender status poisoned") = Some(message);
	}

	#[must_use]
	pub fn packets_sent(&self) -> u64 {
		self.packets_sent.load(Ordering::Relaxed)
	}

	#[must_use]
	pub fn is_failed(&self) -> bool {
		self.failed.load(Ordering::Relaxed)
	}

	#[must_use]
	pub fn last_error(&self) -> Option<String> {
		self.last_error.lock().expect("sender status poisoned").clone()
	}
}

/// Public, point-in-time view of one sender for `/api` and MQTT status
/// replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderInfo {
	pub name: String,
	pub protocol: Protocol,
	pub target: IpAddr,
	pub universe: u16,
	pub fps: u32,
	pub packets_sent: u64,
	pub last_error: Option<String>,
}

impl SenderInfo {
	#[must_use]
	pub fn new(descriptor: &SenderDescriptor, status: &SenderStatus) -> Self {
		Self {
			name: descriptor.name.clone(),
			protocol: descriptor.protocol,
			target: descriptor.target,
			universe: descriptor.universe,
			fps: descriptor.fps,
			packets_sent: status.packets_sent(),
			last_error: status.last_error(),
		}
	}
}
