use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
	ArtNet,
	E131,
}

/// Configuration for one DMX output sender. Names must be unique across a
/// registry; enforced by the registry, not this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SenderDescriptor {
	pub name: String,
	pub protocol: Protocol,
	pub target: IpAddr,
	pub universe: u16,
	pub fps: u32,
	pub port: u16,
}

/// Clamp to the spec's fps bounds: `[1, 60]`, default 40.
#[must_use]
pub fn clamp_fps(fps: u32) -> u32 {
	fps.clamp(1, 60)
}

impl SenderDescriptor {
	/// Build a descriptor with protocol-appropriate default port, clamping
	/// `fps` to `[1, 60]`.
	#[must_use]
	pub fn new(name: impl Into<String>, protocol: Protocol, target: IpAddr, universe: u16, fps: u32) -> Self {
		let port = match protocol {
			Protocol::ArtNet => 6454,
			Protocol::E131 => 5568,
		};
		Self {
			name: name.into(),
			protocol,
			target,
			universe,
			fps: clamp_fps(fps),
			port,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamps_fps_bounds() {
		assert_eq!(clamp_fps(0), 1);
		assert_eq!(clamp_fps(1000), 60);
		assert_eq!(clamp_fps(40), 40);
	}

	#[test]
	fn defaults_protocol_port() {
		let s = SenderDescriptor::new("main", Protocol::ArtNet, "10.0.0.1".parse().unwrap(), 0, 40);
		assert_eq!(s.port, 6454);
		let s = SenderDescriptor::new("main", Protocol::E131, "10.0.0.1".parse().unwrap(), 1, 40);
		assert_eq!(s.port, 5568);
	}
}
