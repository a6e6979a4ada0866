use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use dmx_model::{FallbackConfig, FallbackKind};

use crate::activity::ActivityClock;
use crate::handle::EngineHandle;

/// Polls command inactivity and applies a fallback scene or sequence once
/// the configured delay elapses. Goes through the same [`EngineHandle`]
/// commands a user or the MQTT router would use, so a fallback play
/// preempts exactly like a manual one — and, because it never touches the
/// activity clock itself, never re-arms its own trigger.
pub struct FallbackController {
	engine: EngineHandle,
	config: Arc<RwLock<FallbackConfig>>,
	activity: Arc<ActivityClock>,
	poll_interval: Duration,
	fired_for: Option<Instant>,
}

impl FallbackController {
	#[must_use]
	pub fn new(engine: EngineHandle, config: Arc<RwLock<FallbackConfig>>) -> Self {
		let activity = Arc::clone(engine.activity());
		Self {
			engine,
			config,
			activity,
			poll_interval: Duration::from_millis(250),
			fired_for: None,
		}
	}

	pub async fn run(mut self) {
		let mut ticker = tokio::time::interval(self.poll_interval);
		loop {
			ticker.tick().await;
			self.poll().await;
		}
	}

	async fn poll(&mut self) {
		let last_activity = self.activity.last();
		if self.fired_for == Some(last_activity) {
			return;
		}

		let idle_seconds = self.activity.idle_for().as_secs();
		let slot = {
			let config = self.config.read().expect("fallback config poisoned");
			config.expired_slot(idle_seconds).cloned()
		};
		let Some(slot) = slot else { return };

		let result = match slot.kind {
			FallbackKind::Scene => self.engine.play_scene(slot.target_id.clone(), None).await,
			FallbackKind::Sequence => self.engine.play_sequence(slot.target_id.clone()).await,
		};
		match result {
			Ok(()) => info!(target = %slot.target_id, idle_seconds, "fallback applied after inactivity"),
			Err(err) => warn!(target = %slot.target_id, %err, "fallback target failed to apply"),
		}
		self.fired_for = Some(last_activity);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::actor::EngineActor;
	use dmx_model::{FallbackSlot, Scene};
	use dmx_universe::UniverseBuffer;
	use tokio::time::{sleep, Duration as TokioDuration};

	#[tokio::test]
	async fn fires_scene_fallback_after_idle_delay() {
		let universe = Arc::new(UniverseBuffer::new());
		let (actor, handle) = EngineActor::new(Arc::clone(&universe));
		tokio::spawn(actor.run());
		handle.store().put_scene(Scene::new("blackout_scene", vec![Some(0)]));

		let config = Arc::new(RwLock::new(FallbackConfig {
			scene: Some(FallbackSlot {
				enabled: true,
				target_id: "blackout_scene".into(),
				delay_seconds: 0,
				kind: FallbackKind::Scene,
			}),
			sequence: None,
		}));

		let mut controller = FallbackController::new(handle.clone(), config);
		controller.poll_interval = TokioDuration::from_millis(10);
		tokio::spawn(controller.run());

		sleep(TokioDuration::from_millis(100)).await;
		let status = handle.status().await.unwrap();
		assert_eq!(status.state, dmx_model::PlaybackState::StaticScene { scene_id: "blackout_scene".into() });
	}
}
