use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use dmx_config::ConfigError;
use dmx_dispatch::CommandError;

/// Boundary error for every axum handler. Wraps [`CommandError`] (engine
/// and sender-registry rejections) plus the handful of failure modes only
/// the HTTP layer can produce (bad JSON body, config I/O).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error(transparent)]
	Command(#[from] CommandError),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("invalid request body: {0}")]
	BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
	error: String,
}

impl ApiError {
	const fn status_code(&self) -> StatusCode {
		match self {
			Self::Command(CommandError::InvalidInput(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
			Self::Command(CommandError::NotFound(_)) => StatusCode::NOT_FOUND,
			Self::Command(CommandError::Conflict(_)) => StatusCode::CONFLICT,
			Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		(status, Json(ErrorBody { error: self.to_string() })).into_response()
	}
}
