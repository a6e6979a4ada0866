use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use dmx_dispatch::{CommandError, Dispatcher};
use dmx_model::Scene;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(dispatcher): State<Arc<Dispatcher>>) -> Json<Vec<Scene>> {
	Json(dispatcher.engine().store().list_scenes())
}

pub async fn get(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Result<Json<Scene>, ApiError> {
	dispatcher.engine().store().get_scene(&id).map(Json).ok_or_else(|| ApiError::Command(CommandError::NotFound(id)))
}

pub async fn create(State(state): State<AppState>, Json(mut scene): Json<Scene>) -> Result<(StatusCode, Json<Scene>), ApiError> {
	if scene.id.is_empty() {
		return Err(ApiError::BadRequest("scene id must not be empty".to_string()));
	}
	scene.values.resize(dmx_model::UNIVERSE_SIZE, None);
	state.dispatcher.engine().store().put_scene(scene.clone());
	state.show.write().await.scenes.insert(scene.id.clone(), scene.clone());
	Ok((StatusCode::CREATED, Json(scene)))
}

pub async fn update(State(state): State<AppState>, Path(id): Path<String>, Json(mut scene): Json<Scene>) -> Result<Json<Scene>, ApiError> {
	scene.id = id.clone();
	scene.values.resize(dmx_model::UNIVERSE_SIZE, None);
	state.dispatcher.engine().store().put_scene(scene.clone());
	state.show.write().await.scenes.insert(id, scene.clone());
	Ok(Json(scene))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
	let removed = state.dispatcher.engine().store().remove_scene(&id);
	state.show.write().await.scenes.remove(&id);
	if removed.is_some() {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(ApiError::Command(CommandError::NotFound(id)))
	}
}
