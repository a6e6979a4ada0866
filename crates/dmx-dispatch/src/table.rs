use std::collections::HashSet;
use std::sync::RwLock;

use dmx_model::channel_index;

use crate::command::{ConfigAction, ParsedCommand};
use crate::error::CommandError;
use crate::payload::{parse_dmx_value, parse_transition_seconds};

fn segments(topic: &str) -> Vec<&str> {
	topic.split('/').filter(|s| !s.is_empty()).collect()
}

/// Matches the MQTT topic grammar against a single static topic table.
/// Sequence names are the one dynamic part of the grammar (they're
/// registered at config load/reload instead of being a fixed pattern), so
/// they live in a separate set rebuilt by [`DispatchTable::rebuild`].
pub struct DispatchTable {
	sequence_names: RwLock<HashSet<String>>,
}

impl DispatchTable {
	#[must_use]
	pub fn new(sequence_names: impl IntoIterator<Item = String>) -> Self {
		Self {
			sequence_names: RwLock::new(sequence_names.into_iter().collect()),
		}
	}

	/// Replace the set of sequence-name topics, e.g. after `dmx/config/reload`.
	pub fn rebuild(&self, sequence_names: impl IntoIterator<Item = String>) {
		*self.sequence_names.write().expect("dispatch table poisoned") = sequence_names.into_iter().collect();
	}

	/// Current sequence-name topics, so the MQTT client can (re)subscribe
	/// after a config reload without guessing what changed.
	#[must_use]
	pub fn sequence_names(&self) -> Vec<String> {
		self.sequence_names.read().expect("dispatch table poisoned").iter().cloned().collect()
	}

	pub fn route(&self, topic: &str, payload: &str) -> Result<ParsedCommand, CommandError> {
		let parts = segments(topic);

		match parts.as_slice() {
			["dmx", "set", "channel", n] => {
				let channel = n.parse::<u16>().map_err(|_| CommandError::InvalidInput(format!("bad channel number: {n}")))?;
				if channel_index(channel).is_none() {
					return Err(CommandError::InvalidInput(format!("channel out of range 1..=512: {channel}")));
				}
				let value = parse_dmx_value(payload)?;
				Ok(ParsedCommand::SetChannel { channel, value })
			}
			["dmx", "scene", name] => Ok(ParsedCommand::PlayScene {
				id: (*name).to_string(),
				transition_seconds: parse_transition_seconds(payload)?,
			}),
			["dmx", "sender", "status"] => Ok(ParsedCommand::SenderStatus),
			["dmx", "sender", "list"] => Ok(ParsedCommand::SenderList),
			["dmx", "sender", "blackout"] => Ok(ParsedCommand::SenderBlackout { name: None }),
			["dmx", "sender", "blackout", name] => Ok(ParsedCommand::SenderBlackout { name: Some((*name).to_string()) }),
			["dmx", "sender", "remove", name] => Ok(ParsedCommand::SenderRemove { name: (*name).to_string() }),
			["dmx", "config", "show"] => Ok(ParsedCommand::Config(ConfigAction::Show)),
			["dmx", "config", "reload"] => Ok(ParsedCommand::Config(ConfigAction::Reload)),
			["dmx", "config", "save"] => Ok(ParsedCommand::Config(ConfigAction::Save)),
			[name] if self.sequence_names.read().expect("dispatch table poisoned").contains(*name) => Ok(ParsedCommand::PlaySequence { id: (*name).to_string() }),
			_ => Err(CommandError::NotFound(format!("no route for topic {topic:?}"))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn routes_set_channel() {
		let table = DispatchTable::new([]);
		let cmd = table.route("dmx/set/channel/12", "200").unwrap();
		assert_eq!(cmd, ParsedCommand::SetChannel { channel: 12, value: 200 });
	}

	#[test]
	fn routes_scene_with_empty_transition() {
		let table = DispatchTable::new([]);
		let cmd = table.route("dmx/scene/warmup", "").unwrap();
		assert_eq!(
			cmd,
			ParsedCommand::PlayScene {
				id: "warmup".to_string(),
				transition_seconds: 0.0
			}
		);
	}

	#[test]
	fn routes_registered_sequence_name() {
		let table = DispatchTable::new(["rainbow".to_string()]);
		let cmd = table.route("rainbow", "").unwrap();
		assert_eq!(cmd, ParsedCommand::PlaySequence { id: "rainbow".to_string() });
	}

	#[test]
	fn unregistered_bare_topic_is_not_found() {
		let table = DispatchTable::new([]);
		assert!(table.route("rainbow", "").is_err());
	}

	#[test]
	fn rebuild_replaces_sequence_names() {
		let table = DispatchTable::new(["old".to_string()]);
		table.rebuild(["new".to_string()]);
		assert!(table.route("old", "").is_err());
		assert!(table.route("new", "").is_ok());
	}

	#[test]
	fn rejects_out_of_range_channel() {
		let table = DispatchTable::new([]);
		assert!(table.route("dmx/set/channel/0", "200").is_err());
		assert!(table.route("dmx/set/channel/513", "200").is_err());
	}

	#[test]
	fn routes_blackout_with_and_without_name() {
		let table = DispatchTable::new([]);
		assert_eq!(table.route("dmx/sender/blackout", "").unwrap(), ParsedCommand::SenderBlackout { name: None });
		assert_eq!(
			table.route("dmx/sender/blackout/main", "").unwrap(),
			ParsedCommand::SenderBlackout { name: Some("main".to_string()) }
		);
	}
}
