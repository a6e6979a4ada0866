use serde::{Deserialize, Serialize};

use crate::channel::UNIVERSE_SIZE;

/// A named, immutable-by-value channel vector.
///
/// `values[i]` is the target for channel `i + 1`. `None` means "do not
/// change this channel" (carry forward the current value).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
	pub id: String,
	#[serde(default)]
	pub description: Option<String>,
	/// Always `UNIVERSE_SIZE` entries; positions beyond the authored scene
	/// are padded with `None` at construction time.
	pub values: Vec<Option<u8>>,
	/// Default fade time applied when no explicit transition is requested.
	#[serde(default)]
	pub fade_ms: Option<u64>,
}

impl Scene {
	/// Build a scene from a sparse channel map, padding to a full universe.
	#[must_use]
	pub fn new(id: impl Into<String>, values: Vec<Option<u8>>) -> Self {
		let mut values = values;
		values.resize(UNIVERSE_SIZE, None);
		Self {
			id: id.into(),
			description: None,
			values,
			fade_ms: None,
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	#[must_use]
	pub fn with_fade_ms(mut self, fade_ms: u64) -> Self {
		self.fade_ms = Some(fade_ms);
		self
	}

	/// Value this scene wants for the given 0-based channel index, if any.
	#[must_use]
	pub fn value_at(&self, index: usize) -> Option<u8> {
		self.values.get(index).copied().flatten()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pads_short_vectors_to_full_universe() {
		let scene = Scene::new("red", vec![Some(255), None, Some(0)]);
		assert_eq!(scene.values.len(), UNIVERSE_SIZE);
		assert_eq!(scene.value_at(0), Some(255));
		assert_eq!(scene.value_at(1), None);
		assert_eq!(scene.value_at(511), None);
	}
}
