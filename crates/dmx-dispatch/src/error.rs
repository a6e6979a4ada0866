use thiserror::Error;

use dmx_engine::EngineError;
use dmx_sender::SenderError;

/// Boundary-facing error taxonomy. MQTT replies and HTTP responses both
/// fold down to one of these three kinds; the caller picks the status
/// code or error-reply payload that fits its own transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("not found: {0}")]
	NotFound(String),

	#[error("conflict: {0}")]
	Conflict(String),
}

impl From<EngineError> for CommandError {
	fn from(err: EngineError) -> Self {
		match err {
			EngineError::NotFound(what) => Self::NotFound(what),
			EngineError::ActorUnavailable => Self::InvalidInput("engine actor unavailable".to_string()),
		}
	}
}

impl From<SenderError> for CommandError {
	fn from(err: SenderError) -> Self {
		match err {
			SenderError::NotFound(name) => Self::NotFound(name),
			SenderError::Conflict(name) => Self::Conflict(name),
			SenderError::Io(name, source) => Self::InvalidInput(format!("{name}: {source}")),
		}
	}
}
