//! E1.31 (sACN) packet framing: Root Layer -> Framing Layer -> DMP Layer.

const ACN_PACKET_IDENTIFIER: &[u8; 12] = b"ASC-E1.17\0\0\0";
const VECTOR_ROOT_E131_DATA: u32 = 0x0000_0004;
const VECTOR_E131_DATA_PACKET: u32 = 0x0000_0002;
const VECTOR_DMP_SET_PROPERTY: u8 = 0x02;
const DEFAULT_PRIORITY: u8 = 100;
pub const DEFAULT_PORT: u16 = 5568;
const SOURCE_NAME_LEN: usize = 64;

/// Per-sender 8-bit sequence counter. Unlike Art-Net, E1.31 sequencing
/// wraps through every value including `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SacnSequence(u8);

impl SacnSequence {
	#[must_use]
	pub fn new() -> Self {
		Self(0)
	}

	pub fn next(&mut self) -> u8 {
		let value = self.0;
		self.0 = self.0.wrapping_add(1);
		value
	}
}

fn flags_and_length(length: u16) -> u16 {
	0x7000 | (length & 0x0FFF)
}

/// The default multicast group for a universe when no unicast target is
/// configured: `239.255.X.Y` where `X`/`Y` are the high/low bytes of the
/// universe number.
#[must_use]
pub fn multicast_group(universe: u16) -> std::net::Ipv4Addr {
	let [high, low] = universe.to_be_bytes();
	std::net::Ipv4Addr::new(239, 255, high, low)
}

/// Build one E1.31 data packet for `universe`, carrying `channels` (up to
/// 512 bytes of DMX data, padded with zeros to a full universe).
#[must_use]
pub fn encode_e131(
	cid: uuid::Uuid,
	source_name: &str,
	universe: u16,
	sequence: u8,
	channels: &[u8],
) -> Vec<u8> {
	let mut dmx = [0u8; 512];
	let n = channels.len().min(512);
	dmx[..n].copy_from_slice(&channels[..n]);

	let property_value_count: u16 = 513; // start code + 512 channels
	let dmp_length_field = 2 + 1 + 1 + 2 + 2 + 2 + u16::from(property_value_count);
	let dmp_total_len = dmp_length_field; // length counted from this field onward

	let mut dmp = Vec::with_capacity(usize::from(dmp_total_len));
	dmp.extend_from_slice(&flags_and_length(dmp_total_len).to_be_bytes());
	dmp.push(VECTOR_DMP_SET_PROPERTY);
	dmp.push(0xA1); // Address Type & Data Type
	dmp.extend_from_slice(&0u16.to_be_bytes()); // First Property Address
	dmp.extend_from_slice(&1u16.to_be_bytes()); // Address Increment
	dmp.extend_from_slice(&property_value_count.to_be_bytes());
	dmp.push(0); // DMX start code
	dmp.extend_from_slice(&dmx);

	let mut name_bytes = [0u8; SOURCE_NAME_LEN];
	let name_src = source_name.as_bytes();
	let copy_len = name_src.len().min(SOURCE_NAME_LEN - 1);
	name_bytes[..copy_len].copy_from_slice(&name_src[..copy_len]);

	let framing_length_field = 2 + 4 + SOURCE_NAME_LEN as u16 + 1 + 2 + 1 + 1 + 2;
	let framing_total_len = framing_length_field + dmp.len() as u16;

	let mut framing = Vec::with_capacity(usize::from(framing_total_len));
	framing.extend_from_slice(&flags_and_length(framing_total_len).to_be_bytes());
	framing.extend_from_slice(&VECTOR_E131_DATA_PACKET.to_be_bytes());
	framing.extend_from_slice(&name_bytes);
	framing.push(DEFAULT_PRIORITY);
	framing.extend_from_slice(&0u16.to_be_bytes()); // Sync Address, unused
	framing.push(sequence);
	framing.push(0); // Options
	framing.extend_from_slice(&universe.to_be_bytes());
	framing.extend_from_slice(&dmp);

	let root_length_field = 2 + 4 + 16;
	let root_total_len = root_length_field + framing.len() as u16;

	let mut packet = Vec::with_capacity(16 + usize::from(root_total_len));
	packet.extend_from_slice(&0x0010u16.to_be_bytes()); // Preamble Size
	packet.extend_from_slice(&0u16.to_be_bytes()); // Post-amble Size
	packet.extend_from_slice(ACN_PACKET_IDENTIFIER);
	packet.extend_from_slice(&flags_and_length(root_total_len).to_be_bytes());
	packet.extend_from_slice(&VECTOR_ROOT_E131_DATA.to_be_bytes());
	packet.extend_from_slice(cid.as_bytes());
	packet.extend_from_slice(&framing);

	packet
}
