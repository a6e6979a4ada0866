use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use dmx_dispatch::{Dispatcher, ParsedCommand};
use dmx_model::PlaybackStatus;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct PlaySceneBody {
	pub transition_time: Option<f64>,
}

pub async fn play_scene(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>, body: Option<Json<PlaySceneBody>>) -> Result<Json<PlaybackStatus>, ApiError> {
	let transition_seconds = body.and_then(|Json(body)| body.transition_time).unwrap_or(0.0);
	dispatcher.execute(ParsedCommand::PlayScene { id, transition_seconds }).await?;
	Ok(Json(dispatcher.status().await?))
}

pub async fn play_sequence(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Result<Json<PlaybackStatus>, ApiError> {
	dispatcher.execute(ParsedCommand::PlaySequence { id }).await?;
	Ok(Json(dispatcher.status().await?))
}

pub async fn play_programmable(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Result<Json<PlaybackStatus>, ApiError> {
	dispatcher.execute(ParsedCommand::PlayProgrammable { id }).await?;
	Ok(Json(dispatcher.status().await?))
}

pub async fn stop(State(dispatcher): State<Arc<Dispatcher>>) -> Result<Json<PlaybackStatus>, ApiError> {
	dispatcher.execute(ParsedCommand::Stop).await?;
	Ok(Json(dispatcher.status().await?))
}

pub async fn status(State(dispatcher): State<Arc<Dispatcher>>) -> Result<Json<PlaybackStatus>, ApiError> {
	Ok(Json(dispatcher.status().await?))
}
