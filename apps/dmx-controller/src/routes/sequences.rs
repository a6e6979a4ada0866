use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use dmx_dispatch::{CommandError, Dispatcher};
use dmx_model::Sequence;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(dispatcher): State<Arc<Dispatcher>>) -> Json<Vec<Sequence>> {
	Json(dispatcher.engine().store().list_sequences())
}

pub async fn get(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Result<Json<Sequence>, ApiError> {
	dispatcher.engine().store().get_sequence(&id).map(Json).ok_or_else(|| ApiError::Command(CommandError::NotFound(id)))
}

pub async fn create(State(state): State<AppState>, Json(sequence): Json<Sequence>) -> Result<(StatusCode, Json<Sequence>), ApiError> {
	if sequence.id.is_empty() {
		return Err(ApiError::BadRequest("sequence id must not be empty".to_string()));
	}
	state.dispatcher.engine().store().put_sequence(sequence.clone());
	state.show.write().await.sequences.insert(sequence.id.clone(), sequence.clone());
	state.dispatcher.table().rebuild(collect_sequence_names(&state).await);
	Ok((StatusCode::CREATED, Json(sequence)))
}

pub async fn update(State(state): State<AppState>, Path(id): Path<String>, Json(mut sequence): Json<Sequence>) -> Result<Json<Sequence>, ApiError> {
	sequence.id = id.clone();
	state.dispatcher.engine().store().put_sequence(sequence.clone());
	state.show.write().await.sequences.insert(id, sequence.clone());
	state.dispatcher.table().rebuild(collect_sequence_names(&state).await);
	Ok(Json(sequence))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
	let removed = state.dispatcher.engine().store().remove_sequence(&id);
	state.show.write().await.sequences.remove(&id);
	state.dispatcher.table().rebuild(collect_sequence_names(&state).await);
	if removed.is_some() {
		Ok(StatusCode::NO_CONTENT)
	} else {
		Err(ApiError::Command(CommandError::NotFound(id)))
	}
}

async fn collect_sequence_names(state: &AppState) -> Vec<String> {
	state.show.read().await.sequences.keys().cloned().collect()
}
