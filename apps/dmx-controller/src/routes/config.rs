use axum::extract::State;
use axum::Json;

use dmx_config::ShowConfig;

use crate::error::ApiError;
use crate::show_sync;
use crate::state::AppState;

pub async fn get(State(state): State<AppState>) -> Json<ShowConfig> {
	Json(state.show.read().await.clone())
}

/// Replaces the live show (engine store, fallback config, dispatch table's
/// sequence names) and persists it to `config.json`. A CRUD write to
/// `/api/scenes` etc. only updates the live store and the in-memory
/// mirror; this is the one path that also touches disk.
pub async fn set(State(state): State<AppState>, Json(show): Json<ShowConfig>) -> Result<Json<ShowConfig>, ApiError> {
	show_sync::apply(&state, &show);
	show.save(&state.cli.config_dir)?;
	*state.show.write().await = show.clone();
	Ok(Json(show))
}
