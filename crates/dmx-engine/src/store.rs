use std::collections::HashMap;
use std::sync::RwLock;

use dmx_model::{ProgrammableScene, Scene, Sequence};

/// In-memory live copies of scenes, sequences, and programmable scenes.
/// Populated from persisted config at startup and mutated by CRUD commands
/// from the dispatcher; the playback engine only ever reads from it.
#[derive(Default)]
pub struct Store {
	scenes: RwLock<HashMap<String, Scene>>,
	sequences: RwLock<HashMap<String, Sequence>>,
	programmables: RwLock<HashMap<String, ProgrammableScene>>,
}

impl Store {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn put_scene(&self, scene: Scene) {
		self.scenes.write().expect("scene store poisoned").insert(scene.id.clone(), scene);
	}

	#[must_use]
	pub fn get_scene(&self, id: &str) -> Option<Scene> {
		self.scenes.read().expect("scene store poisoned").get(id).cloned()
	}

	pub fn remove_scene(&self, id: &str) -> Option<Scene> {
		self.scenes.write().expect("scene store poisoned").remove(id)
	}

	#[must_use]
	pub fn list_scenes(&self) -> Vec<Scene> {
		self.scenes.read().expect("scene store poisoned").values().cloned().collect()
	}

	pub fn put_sequence(&self, sequence: Sequence) {
		self.sequences.write().expect("sequence store poisoned").insert(sequence.id.clone(), sequence);
	}

	#[must_use]
	pub fn get_sequence(&self, id: &str) -> Option<Sequence> {
		self.sequences.read().expect("sequence store poisoned").get(id).cloned()
	}

	pub fn remove_sequence(&self, id: &str) -> Option<Sequence> {
		self.sequences.write().expect("sequence store poisoned").remove(id)
	}

	#[must_use]
	pub fn list_sequences(&self) -> Vec<Sequence> {
		self.sequences.read().expect("sequence store poisoned").values().cloned().collect()
	}

	pub fn put_programmable(&self, scene: ProgrammableScene) {
		self.programmables.write().expect("programmable store poisoned").insert(scene.id.clone(), scene);
	}

	#[must_use]
	pub fn get_programmable(&self, id: &str) -> Option<ProgrammableScene> {
		self.programmables.read().expect("programmable store poisoned").get(id).cloned()
	}

	pub fn remove_programmable(&self, id: &str) -> Option<ProgrammableScene> {
		self.programmables.write().expect("programmable store poisoned").remove(id)
	}

	#[must_use]
	pub fn list_programmables(&self) -> Vec<ProgrammableScene> {
		self.programmables.read().expect("programmable store poisoned").values().cloned().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_a_scene() {
		let store = Store::new();
		store.put_scene(Scene::new("red", vec![Some(255)]));
		assert!(store.get_scene("red").is_some());
		assert_eq!(store.list_scenes().len(), 1);
		assert!(store.remove_scene("red").is_some());
		assert!(store.get_scene("red").is_none());
	}
}
