use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use dmx_model::FallbackConfig;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Json<FallbackConfig> {
	Json(state.fallback.read().expect("fallback config poisoned").clone())
}

/// Takes effect on the running [`dmx_engine::FallbackController`]'s very
/// next poll: it shares this same lock, not a copy.
pub async fn set(State(state): State<AppState>, Json(fallback): Json<FallbackConfig>) -> Result<Json<FallbackConfig>, ApiError> {
	*state.fallback.write().expect("fallback config poisoned") = fallback.clone();
	state.show.write().await.fallback = fallback.clone();
	Ok(Json(fallback))
}

pub async fn clear(State(state): State<AppState>) -> StatusCode {
	*state.fallback.write().expect("fallback config poisoned") = FallbackConfig::default();
	state.show.write().await.fallback = FallbackConfig::default();
	StatusCode::NO_CONTENT
}
