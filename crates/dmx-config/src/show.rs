use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dmx_model::{AutostartConfig, FallbackConfig, ProgrammableScene, Scene, Sequence};

use crate::io::{read_json, write_json};

/// Everything in `config.json`: the show itself. Scenes/sequences/
/// programmable scenes are keyed by name; each value's own `id` field is
/// kept in sync with its map key by [`ShowConfig::load`] so callers never
/// see the two disagree.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ShowConfig {
	#[serde(default)]
	pub scenes: HashMap<String, Scene>,
	#[serde(default)]
	pub sequences: HashMap<String, Sequence>,
	#[serde(default)]
	pub programmable_scenes: HashMap<String, ProgrammableScene>,
	#[serde(default)]
	pub fallback: FallbackConfig,
	#[serde(default)]
	pub autostart: AutostartConfig,
}

impl ShowConfig {
	pub fn load(dir: &Path) -> Result<Self, crate::error::ConfigError> {
		let mut show: Self = read_json(&dir.join("config.json"))?;
		for (name, scene) in &mut show.scenes {
			scene.id = name.clone();
		}
		for (name, sequence) in &mut show.sequences {
			sequence.id = name.clone();
		}
		for (name, programmable) in &mut show.programmable_scenes {
			programmable.id = name.clone();
		}
		Ok(show)
	}

	pub fn save(&self, dir: &Path) -> Result<(), crate::error::ConfigError> {
		write_json(&dir.join("config.json"), self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn empty_show_round_trips() {
		let dir = tempdir().unwrap();
		let show = ShowConfig::default();
		show.save(dir.path()).unwrap();
		assert_eq!(ShowConfig::load(dir.path()).unwrap(), show);
	}

	#[test]
	fn load_reconciles_scene_id_with_map_key() {
		let dir = tempdir().unwrap();
		let mut show = ShowConfig::default();
		show.scenes.insert("red".to_string(), Scene::new("stale-id", vec![Some(255)]));
		show.save(dir.path()).unwrap();

		let loaded = ShowConfig::load(dir.path()).unwrap();
		assert_eq!(loaded.scenes["red"].id, "red");
	}
}
