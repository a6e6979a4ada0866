//! Golden-byte checks for the two wire formats. These pin the exact layout
//! against hand-computed expectations so a refactor can't silently shift a
//! field offset.

use dmx_proto::artnet::encode_artdmx;
use dmx_proto::sacn::encode_e131;

#[test]
fn art_net_header_is_byte_exact() {
	let packet = encode_artdmx(0, 1, &[0x11, 0x22]);

	let mut expected = Vec::new();
	expected.extend_from_slice(b"Art-Net\0");
	expected.extend_from_slice(&[0x00, 0x50]); // OpCode 0x5000, little-endian
	expected.extend_from_slice(&[0x00, 0x0E]); // ProtVer 14, big-endian
	expected.push(1); // sequence
	expected.push(0); // physical
	expected.push(0); // SubUni
	expected.push(0); // Net
	expected.extend_from_slice(&[0x00, 0x02]); // Length 2, big-endian
	expected.extend_from_slice(&[0x11, 0x22]);

	assert_eq!(packet, expected);
}

#[test]
fn art_net_high_universe_splits_net_and_subnet() {
	// universe 0x0F3A -> Net = 0x0F, SubUni = 0x3A
	let packet = encode_artdmx(0x0F3A, 5, &[]);
	assert_eq!(packet[14], 0x3A);
	assert_eq!(packet[15], 0x0F);
}

#[test]
fn e131_packet_has_exact_total_length_for_a_full_universe() {
	let cid = uuid::Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap();
	let packet = encode_e131(cid, "rig-a", 1, 0, &[0u8; 512]);
	assert_eq!(packet.len(), 638);
}

#[test]
fn e131_preamble_and_acn_identifier_are_fixed() {
	let cid = uuid::Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap();
	let packet = encode_e131(cid, "rig-a", 1, 0, &[0u8; 512]);
	assert_eq!(&packet[0..2], &[0x00, 0x10]); // Preamble Size
	assert_eq!(&packet[2..4], &[0x00, 0x00]); // Post-amble Size
	assert_eq!(&packet[4..16], b"ASC-E1.17\0\0\0");
}

#[test]
fn e131_root_vector_is_data_packet() {
	let cid = uuid::Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap();
	let packet = encode_e131(cid, "rig-a", 1, 0, &[0u8; 512]);
	// Root Flags&Length (2) precedes the Vector field.
	assert_eq!(&packet[18..22], &[0x00, 0x00, 0x00, 0x04]);
}

#[test]
fn e131_dmp_start_code_precedes_channel_data() {
	let cid = uuid::Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap();
	let channels = [9u8; 512];
	let packet = encode_e131(cid, "rig-a", 1, 0, &channels);
	let start_code_index = packet.len() - 512 - 1;
	assert_eq!(packet[start_code_index], 0);
	assert_eq!(&packet[start_code_index + 1..], &channels[..]);
}
