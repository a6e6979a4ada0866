use thiserror::Error;

/// Validation errors for malformed boundary input, shared across crates
/// that accept raw command payloads. Mirrors the taxonomy in the spec's
/// error design: invalid input is always rejected before it reaches the
/// engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("channel {0} out of range 1..=512")]
	ChannelOutOfRange(u16),
	#[error("value {0} out of range 0..=255")]
	ValueOutOfRange(i64),
	#[error("unknown sender protocol: {0}")]
	UnknownProtocol(String),
}
