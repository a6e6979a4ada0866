use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::channel::ChannelNumber;

/// A named scene whose channel values are arithmetic expressions over `t`
/// (seconds since start) and `p` (percent of duration, 0-100).
///
/// Expression text is stored verbatim here; `dmx-engine` is responsible for
/// parsing and caching the compiled form, since `dmx-model` has no opinion
/// about the expression grammar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgrammableScene {
	pub id: String,
	#[serde(default)]
	pub description: Option<String>,
	pub duration_ms: u64,
	#[serde(default)]
	pub r#loop: bool,
	pub expressions: HashMap<ChannelNumber, String>,
}

impl ProgrammableScene {
	#[must_use]
	pub fn new(id: impl Into<String>, duration_ms: u64) -> Self {
		Self {
			id: id.into(),
			description: None,
			duration_ms,
			r#loop: false,
			expressions: HashMap::new(),
		}
	}

	#[must_use]
	pub fn with_expression(mut self, channel: ChannelNumber, expr: impl Into<String>) -> Self {
		self.expressions.insert(channel, expr.into());
		self
	}

	/// `p = min(100, 100 * elapsed_ms / duration)`.
	#[must_use]
	pub fn percent_elapsed(&self, elapsed_ms: u64) -> f64 {
		if self.duration_ms == 0 {
			return 100.0;
		}
		(100.0 * elapsed_ms as f64 / self.duration_ms as f64).min(100.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn percent_elapsed_caps_at_100() {
		let scene = ProgrammableScene::new("fade", 10_000);
		assert_eq!(scene.percent_elapsed(0), 0.0);
		assert_eq!(scene.percent_elapsed(5_000), 50.0);
		assert_eq!(scene.percent_elapsed(20_000), 100.0);
	}
}
