use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use dmx_engine::TickRate;
use dmx_model::{clamp_fps, SenderDescriptor};
use dmx_universe::UniverseBuffer;

use crate::error::SenderError;
use crate::retransmit::RetransmitConfig;
use crate::status::{SenderInfo, SenderStatus};
use crate::task;

struct ManagedSender {
	descriptor: SenderDescriptor,
	status: Arc<SenderStatus>,
	force_send: Arc<Notify>,
	cancel: CancellationToken,
	handle: JoinHandle<()>,
}

/// Owns every running sender task. `add`/`remove` enforce the unique-name
/// invariant; `blackout` zeros the shared universe and wakes the affected
/// tasks for an out-of-band frame instead of waiting for their next tick.
pub struct SenderRegistry {
	universe: Arc<UniverseBuffer>,
	tick_rate: Arc<TickRate>,
	retransmit: Arc<RetransmitConfig>,
	senders: RwLock<HashMap<String, ManagedSender>>,
}

impl SenderRegistry {
	#[must_use]
	pub fn new(universe: Arc<UniverseBuffer>, tick_rate: Arc<TickRate>, retransmit: Arc<RetransmitConfig>) -> Self {
		Self {
			universe,
			tick_rate,
			retransmit,
			senders: RwLock::new(HashMap::new()),
		}
	}

	#[must_use]
	pub fn retransmit(&self) -> &Arc<RetransmitConfig> {
		&self.retransmit
	}

	pub async fn add(&self, mut descriptor: SenderDescriptor) -> Result<(), SenderError> {
		descriptor.fps = clamp_fps(descriptor.fps);
		let mut senders = self.senders.write().await;
		if senders.contains_key(&descriptor.name) {
			return Err(SenderError::Conflict(descriptor.name));
		}

		let status = Arc::new(SenderStatus::default());
		let force_send = Arc::new(Notify::new());
		let cancel = CancellationToken::new();

		let handle = tokio::spawn(task::run(
			descriptor.clone(),
			Arc::clone(&self.universe),
			Arc::clone(&self.retransmit),
			Arc::clone(&status),
			Arc::clone(&force_send),
			cancel.clone(),
		));

		senders.insert(
			descriptor.name.clone(),
			ManagedSender {
				descriptor,
				status,
				force_send,
				cancel,
				handle,
			},
		);
		self.recompute_tick_rate(&senders);
		Ok(())
	}

	pub async fn remove(&self, name: &str) -> Result<(), SenderError> {
		let mut senders = self.senders.write().await;
		let managed = senders.remove(name).ok_or_else(|| SenderError::NotFound(name.to_string()))?;
		managed.cancel.cancel();
		managed.handle.abort();
		self.recompute_tick_rate(&senders);
		Ok(())
	}

	/// Zero the shared universe and force one immediate frame on `name`, or
	/// every sender if `name` is `None`.
	pub async fn blackout(&self, name: Option<&str>) -> Result<(), SenderError> {
		self.universe.blackout();
		let senders = self.senders.read().await;
		match name {
			Some(name) => {
				let managed = senders.get(name).ok_or_else(|| SenderError::NotFound(name.to_string()))?;
				managed.force_send.notify_one();
			}
			None => {
				for managed in senders.values() {
					managed.force_send.notify_one();
				}
			}
		}
		Ok(())
	}

	pub async fn status(&self, name: &str) -> Result<SenderInfo, SenderError> {
		let senders = self.senders.read().await;
		let managed = senders.get(name).ok_or_else(|| SenderError::NotFound(name.to_string()))?;
		Ok(SenderInfo::new(&managed.descriptor, &managed.status))
	}

	pub async fn status_all(&self) -> Vec<SenderInfo> {
		let senders = self.senders.read().await;
		senders.values().map(|managed| SenderInfo::new(&managed.descriptor, &managed.status)).collect()
	}

	pub async fn list_names(&self) -> Vec<String> {
		self.senders.read().await.keys().cloned().collect()
	}

	fn recompute_tick_rate(&self, senders: &HashMap<String, ManagedSender>) {
		let slowest = senders.values().map(|managed| managed.descriptor.fps).min();
		self.tick_rate.set(slowest.unwrap_or(40));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dmx_model::Protocol;

	fn descriptor(name: &str) -> SenderDescriptor {
		SenderDescriptor::new(name, Protocol::ArtNet, "127.0.0.1".parse().unwrap(), 0, 40)
	}

	#[tokio::test]
	async fn rejects_duplicate_names() {
		let universe = Arc::new(UniverseBuffer::new());
		let tick_rate = Arc::new(TickRate::default());
		let retransmit = Arc::new(RetransmitConfig::default());
		let registry = SenderRegistry::new(universe, tick_rate, retransmit);

		registry.add(descriptor("main")).await.unwrap();
		let err = registry.add(descriptor("main")).await.unwrap_err();
		assert!(matches!(err, SenderError::Conflict(name) if name == "main"));
	}

	#[tokio::test]
	async fn remove_then_status_is_not_found() {
		let universe = Arc::new(UniverseBuffer::new());
		let tick_rate = Arc::new(TickRate::default());
		let retransmit = Arc::new(RetransmitConfig::default());
		let registry = SenderRegistry::new(universe, tick_rate, retransmit);

		registry.add(descriptor("main")).await.unwrap();
		registry.remove("main").await.unwrap();
		assert!(registry.status("main").await.is_err());
	}

	#[tokio::test]
	async fn tick_rate_tracks_slowest_sender() {
		let universe = Arc::new(UniverseBuffer::new());
		let tick_rate = Arc::new(TickRate::default());
		let retransmit = Arc::new(RetransmitConfig::default());
		let registry = SenderRegistry::new(universe, Arc::clone(&tick_rate), retransmit);

		registry.add(descriptor("fast")).await.unwrap();
		let mut slow = descriptor("slow");
		slow.fps = 25;
		registry.add(slow).await.unwrap();

		assert_eq!(tick_rate.effective_hz(), 25);
	}
}
