use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use dmx_model::{ChannelNumber, PlaybackStatus};

use crate::activity::ActivityClock;
use crate::command::Command;
use crate::error::EngineError;
use crate::store::Store;
use crate::tick::TickRate;

/// Cloneable front for the playback engine actor. Every method sends one
/// command into the actor's queue and awaits its reply, so commands from
/// any number of callers (HTTP handlers, the MQTT router, the fallback
/// controller) are serialized exactly the way §5 requires.
#[derive(Clone)]
pub struct EngineHandle {
	sender: mpsc::Sender<Command>,
	store: Arc<Store>,
	activity: Arc<ActivityClock>,
	tick_rate: Arc<TickRate>,
}

impl EngineHandle {
	pub(crate) fn new(sender: mpsc::Sender<Command>, store: Arc<Store>, activity: Arc<ActivityClock>, tick_rate: Arc<TickRate>) -> Self {
		Self {
			sender,
			store,
			activity,
			tick_rate,
		}
	}

	pub async fn play_scene(&self, id: impl Into<String>, transition_seconds: Option<f64>) -> Result<(), EngineError> {
		let (reply, rx) = oneshot::channel();
		self
			.sender
			.send(Command::PlayScene {
				id: id.into(),
				transition_seconds,
				reply,
			})
			.await
			.map_err(|_| EngineError::ActorUnavailable)?;
		rx.await.map_err(|_| EngineError::ActorUnavailable)?
	}

	pub async fn play_sequence(&self, id: impl Into<String>) -> Result<(), EngineError> {
		let (reply, rx) = oneshot::channel();
		self
			.sender
			.send(Command::PlaySequence { id: id.into(), reply })
			.await
			.map_err(|_| EngineError::ActorUnavailable)?;
		rx.await.map_err(|_| EngineError::ActorUnavailable)?
	}

	pub async fn play_programmable(&self, id: impl Into<String>) -> Result<(), EngineError> {
		let (reply, rx) = oneshot::channel();
		self
			.sender
			.send(Command::PlayProgrammable { id: id.into(), reply })
			.await
			.map_err(|_| EngineError::ActorUnavailable)?;
		rx.await.map_err(|_| EngineError::ActorUnavailable)?
	}

	pub async fn set_channel(&self, channel: ChannelNumber, value: u8) -> Result<(), EngineError> {
		let (reply, rx) = oneshot::channel();
		self
			.sender
			.send(Command::SetChannel { channel, value, reply })
			.await
			.map_err(|_| EngineError::ActorUnavailable)?;
		rx.await.map_err(|_| EngineError::ActorUnavailable)
	}

	pub async fn stop(&self) -> Result<(), EngineError> {
		let (reply, rx) = oneshot::channel();
		self.sender.send(Command::Stop { reply }).await.map_err(|_| EngineError::ActorUnavailable)?;
		rx.await.map_err(|_| EngineError::ActorUnavailable)
	}

	pub async fn status(&self) -> Result<PlaybackStatus, EngineError> {
		let (reply, rx) = oneshot::channel();
		self.sender.send(Command::Status { reply }).await.map_err(|_| EngineError::ActorUnavailable)?;
		rx.await.map_err(|_| EngineError::ActorUnavailable)
	}

	#[must_use]
	pub fn store(&self) -> &Arc<Store> {
		&self.store
	}

	#[must_use]
	pub fn activity(&self) -> &Arc<ActivityClock> {
		&self.activity
	}

	#[must_use]
	pub fn tick_rate(&self) -> &Arc<TickRate> {
		&self.tick_rate
	}
}
