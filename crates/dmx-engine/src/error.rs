use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
	#[error("not found: {0}")]
	NotFound(String),
	#[error("engine actor unavailable")]
	ActorUnavailable,
}
