//! Wire-format framers for the two output protocols: Art-Net 3 and E1.31
//! (sACN). Each protocol gets its own module with a pure packet encoder and
//! a sequence-number type; [`Framer`] wraps the per-sender mutable state
//! (sequence counter, sACN source CID) so `dmx-sender` can hold one per
//! configured output without caring which protocol it is framing for.

pub mod artnet;
pub mod sacn;

use dmx_model::sender::Protocol;

/// Stateful per-sender framer. Holds the sequence counter (and, for sACN,
/// the source CID and name) needed to turn a raw 512-channel frame into a
/// protocol packet ready to hand to a UDP socket.
#[derive(Debug, Clone)]
pub enum Framer {
	ArtNet {
		universe: u16,
		sequence: artnet::ArtNetSequence,
	},
	E131 {
		universe: u16,
		sequence: sacn::SacnSequence,
		cid: uuid::Uuid,
		source_name: String,
	},
}

impl Framer {
	#[must_use]
	pub fn new(protocol: Protocol, universe: u16, source_name: impl Into<String>) -> Self {
		match protocol {
			Protocol::ArtNet => Self::ArtNet {
				universe,
				sequence: artnet::ArtNetSequence::new(),
			},
			Protocol::E131 => Self::E131 {
				universe,
				sequence: sacn::SacnSequence::new(),
				cid: uuid::Uuid::new_v4(),
				source_name: source_name.into(),
			},
		}
	}

	/// Frame `channels` (expected to be a full 512-byte universe snapshot)
	/// into the next packet, advancing this framer's sequence counter.
	pub fn frame(&mut self, channels: &[u8]) -> Vec<u8> {
		match self {
			Self::ArtNet { universe, sequence } => {
				artnet::encode_artdmx(*universe, sequence.next(), channels)
			}
			Self::E131 {
				universe,
				sequence,
				cid,
				source_name,
			} => sacn::encode_e131(*cid, source_name, *universe, sequence.next(), channels),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn art_net_framer_advances_sequence_each_frame() {
		let mut framer = Framer::new(Protocol::ArtNet, 0, "controller");
		let first = framer.frame(&[0u8; 512]);
		let second = framer.frame(&[0u8; 512]);
		assert_eq!(first[12], 1);
		assert_eq!(second[12], 2);
	}

	#[test]
	fn e131_framer_produces_full_size_packets() {
		let mut framer = Framer::new(Protocol::E131, 3, "controller");
		let packet = framer.frame(&[7u8; 512]);
		assert_eq!(packet.len(), 638);
	}
}
