use std::fs;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ConfigError;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
	let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
	serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
	}
	let file = fs::File::create(path).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
	serde_json::to_writer_pretty(file, value).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}
