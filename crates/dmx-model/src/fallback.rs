use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
	Scene,
	Sequence,
}

/// One fallback slot: "if idle for `delay_seconds`, apply `target_id`".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackSlot {
	pub enabled: bool,
	pub target_id: String,
	pub delay_seconds: u64,
	pub kind: FallbackKind,
}

/// Both fallback slots. Scene-fallback wins ties, per the spec's fixed
/// resolution of the source's previously nondeterministic behavior.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FallbackConfig {
	pub scene: Option<FallbackSlot>,
	pub sequence: Option<FallbackSlot>,
}

impl FallbackConfig {
	/// Pick the slot that should fire given `idle_seconds` of inactivity, if
	/// any is both enabled and expired. Scene-fallback wins simultaneous
	/// expiry.
	#[must_use]
	pub fn expired_slot(&self, idle_seconds: u64) -> Option<&FallbackSlot> {
		let scene_due = self.scene.as_ref().filter(|s| s.enabled && idle_seconds >= s.delay_seconds);
		let sequence_due = self.sequence.as_ref().filter(|s| s.enabled && idle_seconds >= s.delay_seconds);

		match (scene_due, sequence_due) {
			(Some(scene), Some(sequence)) => {
				if scene.delay_seconds <= sequence.delay_seconds {
					Some(scene)
				} else {
					Some(sequence)
				}
			}
			(Some(scene), None) => Some(scene),
			(None, Some(sequence)) => Some(sequence),
			(None, None) => None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AutostartConfig {
	pub scene: Option<String>,
	pub sequence: Option<String>,
	pub programmable: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn slot(kind: FallbackKind, delay: u64) -> FallbackSlot {
		FallbackSlot {
			enabled: true,
			target_id: "blackout".into(),
			delay_seconds: delay,
			kind,
		}
	}

	#[test]
	fn scene_wins_simultaneous_expiry() {
		let cfg = FallbackConfig {
			scene: Some(slot(FallbackKind::Scene, 2)),
			sequence: Some(slot(FallbackKind::Sequence, 2)),
		};
		assert_eq!(cfg.expired_slot(2).unwrap().kind, FallbackKind::Scene);
	}

	#[test]
	fn earliest_expiry_wins() {
		let cfg = FallbackConfig {
			scene: Some(slot(FallbackKind::Scene, 5)),
			sequence: Some(slot(FallbackKind::Sequence, 2)),
		};
		assert_eq!(cfg.expired_slot(3).unwrap().kind, FallbackKind::Sequence);
	}

	#[test]
	fn nothing_fires_before_delay() {
		let cfg = FallbackConfig {
			scene: Some(slot(FallbackKind::Scene, 5)),
			sequence: None,
		};
		assert!(cfg.expired_slot(4).is_none());
	}
}
