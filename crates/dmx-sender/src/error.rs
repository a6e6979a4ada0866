use thiserror::Error;

#[derive(Debug, Error)]
pub enum SenderError {
	#[error("sender '{0}' already exists")]
	Conflict(String),
	#[error("sender '{0}' not found")]
	NotFound(String),
	#[error("failed to open socket for sender '{0}': {1}")]
	Io(String, #[source] std::io::Error),
}
