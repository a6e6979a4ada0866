use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dmx_model::{FollowerMap, Protocol, SenderDescriptor};

use crate::io::{read_json, write_json};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MqttSettings {
	pub host: String,
	pub port: u16,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<String>,
	#[serde(default)]
	pub client_id: Option<String>,
}

impl Default for MqttSettings {
	fn default() -> Self {
		Self {
			host: "localhost".to_string(),
			port: 1883,
			username: None,
			password: None,
			client_id: None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetransmitSettings {
	pub enabled: bool,
	pub interval_seconds: u64,
}

impl Default for RetransmitSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			interval_seconds: 5,
		}
	}
}

/// Everything in `settings.json`: how to reach the broker, what senders to
/// bring up at startup, and the runtime defaults the engine/dispatcher
/// read at load time. Scenes/sequences/programmable scenes live in
/// [`crate::show::ShowConfig`] instead, since they change far more often.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
	#[serde(default)]
	pub mqtt: MqttSettings,
	#[serde(default)]
	pub default_senders: Vec<SenderDescriptor>,
	#[serde(default = "default_fps")]
	pub default_fps: u32,
	#[serde(default)]
	pub default_transition_ms: u64,
	#[serde(default)]
	pub follower_map: FollowerMap,
	#[serde(default)]
	pub retransmit: RetransmitSettings,
	#[serde(default = "default_fallback_delay")]
	pub fallback_delay_seconds: u64,
	#[serde(default)]
	pub frontend_mqtt_passthrough: bool,
}

fn default_fps() -> u32 {
	40
}

fn default_fallback_delay() -> u64 {
	30
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			mqtt: MqttSettings::default(),
			default_senders: Vec::new(),
			default_fps: default_fps(),
			default_transition_ms: 0,
			follower_map: FollowerMap::default(),
			retransmit: RetransmitSettings::default(),
			fallback_delay_seconds: default_fallback_delay(),
			frontend_mqtt_passthrough: false,
		}
	}
}

impl Settings {
	pub fn load(dir: &Path) -> Result<Self, crate::error::ConfigError> {
		read_json(&dir.join("settings.json"))
	}

	pub fn save(&self, dir: &Path) -> Result<(), crate::error::ConfigError> {
		write_json(&dir.join("settings.json"), self)
	}

	/// A default sender suitable for a fresh install: broadcast Art-Net on
	/// universe 0 at the default fps.
	#[must_use]
	pub fn default_sender() -> SenderDescriptor {
		SenderDescriptor::new("main", Protocol::ArtNet, IpAddr::from([255, 255, 255, 255]), 0, default_fps())
	}
}
