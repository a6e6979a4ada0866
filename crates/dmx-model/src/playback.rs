use serde::{Deserialize, Serialize};

/// Which high-level artifact the engine is currently driving, if any.
/// Exactly one of these (or none) is true at any instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackState {
	Idle,
	StaticScene { scene_id: String },
	RunningSequence { sequence_id: String, step_index: usize },
	RunningProgrammable { scene_id: String },
}

impl PlaybackState {
	#[must_use]
	pub fn is_playing(&self) -> bool {
		!matches!(self, PlaybackState::Idle)
	}
}

/// Read-only snapshot for UI / API consumption, sampled atomically from the
/// engine actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackStatus {
	pub is_playing: bool,
	pub state: PlaybackState,
	pub step_progress_percent: Option<f64>,
}
