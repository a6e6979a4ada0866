use std::sync::Arc;

use tracing::warn;

use dmx_engine::EngineHandle;
use dmx_model::PlaybackStatus;
use dmx_sender::{SenderInfo, SenderRegistry};

use crate::command::{ConfigAction, ParsedCommand};
use crate::error::CommandError;
use crate::table::DispatchTable;

/// A command's effect, reported back to whichever transport asked for it.
/// `ConfigAction` is handed back rather than acted on here: `dmx-dispatch`
/// has no opinion on where `settings.json`/`config.json` live, that's
/// `apps/dmx-controller`'s job.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchReply {
	Ack,
	Status(PlaybackStatus),
	SenderStatusAll(Vec<SenderInfo>),
	SenderNames(Vec<String>),
	ConfigAction(ConfigAction),
}

/// Single chokepoint between boundary transports (MQTT topics, HTTP
/// routes) and the engine/sender registry. Every state-changing command
/// passes through [`Dispatcher::execute`], which is also where the
/// Fallback Controller's idle clock gets touched.
pub struct Dispatcher {
	engine: EngineHandle,
	senders: Arc<SenderRegistry>,
	table: DispatchTable,
}

impl Dispatcher {
	#[must_use]
	pub fn new(engine: EngineHandle, senders: Arc<SenderRegistry>, sequence_names: impl IntoIterator<Item = String>) -> Self {
		Self {
			engine,
			senders,
			table: DispatchTable::new(sequence_names),
		}
	}

	#[must_use]
	pub fn table(&self) -> &DispatchTable {
		&self.table
	}

	pub fn route_mqtt(&self, topic: &str, payload: &str) -> Result<ParsedCommand, CommandError> {
		self.table.route(topic, payload)
	}

	pub async fn execute(&self, command: ParsedCommand) -> Result<DispatchReply, CommandError> {
		if is_state_changing(&command) {
			self.engine.activity().touch();
		}

		let result = self.execute_inner(command).await;
		if let Err(err) = &result {
			warn!(error = %err, "dispatch command rejected");
		}
		result
	}

	async fn execute_inner(&self, command: ParsedCommand) -> Result<DispatchReply, CommandError> {
		match command {
			ParsedCommand::SetChannel { channel, value } => {
				self.engine.set_channel(channel, value).await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::SetAll { values } => {
				for (channel, value) in values {
					self.engine.set_channel(channel, value).await?;
				}
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::PlayScene { id, transition_seconds } => {
				self.engine.play_scene(id, Some(transition_seconds)).await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::PlaySequence { id } => {
				self.engine.play_sequence(id).await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::PlayProgrammable { id } => {
				self.engine.play_programmable(id).await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::Stop => {
				self.engine.stop().await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::SenderStatus => Ok(DispatchReply::SenderStatusAll(self.senders.status_all().await)),
			ParsedCommand::SenderList => Ok(DispatchReply::SenderNames(self.senders.list_names().await)),
			ParsedCommand::SenderBlackout { name } => {
				self.senders.blackout(name.as_deref()).await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::SenderRemove { name } => {
				self.senders.remove(&name).await?;
				Ok(DispatchReply::Ack)
			}
			ParsedCommand::Config(action) => Ok(DispatchReply::ConfigAction(action)),
		}
	}

	pub async fn status(&self) -> Result<PlaybackStatus, CommandError> {
		Ok(self.engine.status().await?)
	}

	pub async fn sender_status(&self, name: &str) -> Result<SenderInfo, CommandError> {
		Ok(self.senders.status(name).await?)
	}

	#[must_use]
	pub fn engine(&self) -> &EngineHandle {
		&self.engine
	}

	#[must_use]
	pub fn senders(&self) -> &Arc<SenderRegistry> {
		&self.senders
	}
}

fn is_state_changing(command: &ParsedCommand) -> bool {
	matches!(
		command,
		ParsedCommand::SetChannel { .. } | ParsedCommand::SetAll { .. } | ParsedCommand::PlayScene { .. } | ParsedCommand::PlaySequence { .. } | ParsedCommand::PlayProgrammable { .. } | ParsedCommand::Stop
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use dmx_engine::EngineActor;
	use dmx_model::{Protocol, Scene, SenderDescriptor};
	use dmx_sender::RetransmitConfig;
	use dmx_universe::UniverseBuffer;
	use std::time::Duration;

	async fn dispatcher() -> Dispatcher {
		let universe = Arc::new(UniverseBuffer::new());
		let (actor, engine) = EngineActor::new(Arc::clone(&universe));
		engine.store().put_scene(Scene::new("red", vec![Some(255)]));
		tokio::spawn(actor.run());

		let retransmit = Arc::new(RetransmitConfig::default());
		let senders = Arc::new(SenderRegistry::new(universe, Arc::clone(engine.tick_rate()), retransmit));
		senders.add(SenderDescriptor::new("main", Protocol::ArtNet, "127.0.0.1".parse().unwrap(), 0, 40)).await.unwrap();

		Dispatcher::new(engine, senders, ["rainbow".to_string()])
	}

	#[tokio::test]
	async fn set_channel_touches_activity_and_applies() {
		let dispatcher = dispatcher().await;
		dispatcher.engine().activity().touch();
		let idle_before = dispatcher.engine().activity().idle_for();
		tokio::time::sleep(Duration::from_millis(5)).await;

		let cmd = dispatcher.route_mqtt("dmx/set/channel/1", "200").unwrap();
		dispatcher.execute(cmd).await.unwrap();

		assert!(dispatcher.engine().activity().idle_for() < idle_before);
	}

	#[tokio::test]
	async fn sender_status_query_does_not_touch_activity() {
		let dispatcher = dispatcher().await;
		dispatcher.engine().activity().touch();
		let idle_before = dispatcher.engine().activity().idle_for();
		tokio::time::sleep(Duration::from_millis(5)).await;

		let reply = dispatcher.execute(ParsedCommand::SenderStatus).await.unwrap();

		assert!(matches!(reply, DispatchReply::SenderStatusAll(list) if list.len() == 1));
		assert!(dispatcher.engine().activity().idle_for() >= idle_before);
	}

	#[tokio::test]
	async fn unknown_scene_surfaces_not_found() {
		let dispatcher = dispatcher().await;
		let cmd = ParsedCommand::PlayScene {
			id: "missing".to_string(),
			transition_seconds: 0.0,
		};
		let err = dispatcher.execute(cmd).await.unwrap_err();
		assert!(matches!(err, CommandError::NotFound(_)));
	}

	#[tokio::test]
	async fn config_action_is_handed_back_not_executed() {
		let dispatcher = dispatcher().await;
		let cmd = dispatcher.route_mqtt("dmx/config/reload", "").unwrap();
		let reply = dispatcher.execute(cmd).await.unwrap();
		assert_eq!(reply, DispatchReply::ConfigAction(ConfigAction::Reload));
	}
}
