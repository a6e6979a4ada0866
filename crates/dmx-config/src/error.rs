use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the persisted config directory. Every variant
/// here is a spec `Fatal` condition at startup (`cannot open config`) or a
/// rejected write from an API/MQTT handler.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("cannot read {path}: {source}")]
	Read { path: PathBuf, #[source] source: io::Error },

	#[error("cannot write {path}: {source}")]
	Write { path: PathBuf, #[source] source: io::Error },

	#[error("malformed json in {path}: {source}")]
	Parse { path: PathBuf, #[source] source: serde_json::Error },
}
