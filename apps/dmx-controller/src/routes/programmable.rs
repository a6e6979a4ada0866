use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use dmx_dispatch::{CommandError, Dispatcher};
use dmx_model::ProgrammableScene;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(dispatcher): State<Arc<Dispatcher>>) -> Json<Vec<ProgrammableScene>> {
	Json(dispatcher.engine().store().list_programmables())
}

pub async fn get(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Result<Json<ProgrammableScene>, ApiError> {
	dispatcher.engine().store().get_programmable(&id).map(Json).ok_or_else(|| ApiError::Command(CommandError::NotFound(id)))
}

pub async fn create(State(state): State<AppState>, Json(scene): Json<ProgrammableScene>) -> Result<(StatusCode, Json<ProgrammableScene>), ApiError> {
	if scene.id.is_empty() {
		return Err(ApiError::BadRequest("programmable scene id must not be empty".to_string()));
	}
	state.dispatcher.engine().store().put_programmable(scene.clone());
	state.show.write().await.programmable_scenes.insert(scene.id.clone(), scene.clone());
	Ok((StatusCode::CREATED, Json(scene)))
}

pub async fn update(State(state): State<AppState>, Path(id): Path<String>, Json(mut scene): Json<ProgrammableScene>) -> Result<Json<ProgrammableScene>, ApiError> {
	scene.id = id.clone();
	state.dispatcher.engine().store().put_programmable(scene.clone());
	state.show.write().await.programmable_scenes.insert(id, scene.clone());
	Ok(Json(scene))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
	let removed = state.dispatcher.engine().store().remove_programmable(&id);
	state.show.write().await.programmable_scenes.remove(&id);
	if removed.is_some() {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(ApiError::Command(CommandError::NotFound(id)))
	}
}
