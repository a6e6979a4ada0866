use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::channel::ChannelNumber;

/// A step either plays a stored scene by id or an inline channel map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StepTarget {
	SceneRef(String),
	Inline(HashMap<ChannelNumber, u8>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
	pub target: StepTarget,
	pub duration_ms: u64,
	#[serde(default)]
	pub fade_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sequence {
	pub id: String,
	#[serde(default)]
	pub description: Option<String>,
	pub steps: Vec<Step>,
	#[serde(default)]
	pub r#loop: bool,
}

impl Sequence {
	/// Total duration of one pass through the sequence, in milliseconds.
	#[must_use]
	pub fn total_duration_ms(&self) -> u64 {
		self.steps.iter().map(|s| s.duration_ms).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn total_duration_sums_steps() {
		let seq = Sequence {
			id: "rainbow".into(),
			description: None,
			steps: vec![
				Step {
					target: StepTarget::SceneRef("red".into()),
					duration_ms: 1000,
					fade_ms: None,
				},
				Step {
					target: StepTarget::SceneRef("green".into()),
					duration_ms: 1000,
					fade_ms: None,
				},
			],
			r#loop: true,
		};
		assert_eq!(seq.total_duration_ms(), 2000);
	}
}
