use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use dmx_model::AutostartConfig;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Json<AutostartConfig> {
	Json(state.show.read().await.autostart.clone())
}

pub async fn set(State(state): State<AppState>, Json(autostart): Json<AutostartConfig>) -> Result<Json<AutostartConfig>, ApiError> {
	state.show.write().await.autostart = autostart.clone();
	Ok(Json(autostart))
}

pub async fn clear(State(state): State<AppState>) -> StatusCode {
	state.show.write().await.autostart = AutostartConfig::default();
	StatusCode::NO_CONTENT
}
