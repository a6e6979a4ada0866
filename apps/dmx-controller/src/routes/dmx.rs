use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use dmx_dispatch::{DispatchReply, Dispatcher, ParsedCommand};

use crate::error::ApiError;
use crate::state::{AppState, ChannelUpdate};

#[derive(Debug, Deserialize)]
pub struct SetChannelBody {
	pub value: u8,
}

pub async fn set_channel(State(dispatcher): State<Arc<Dispatcher>>, Path(channel): Path<u16>, Json(body): Json<SetChannelBody>) -> Result<Json<serde_json::Value>, ApiError> {
	if dmx_model::channel_index(channel).is_none() {
		return Err(ApiError::BadRequest(format!("channel out of range 1..=512: {channel}")));
	}
	dispatcher.execute(ParsedCommand::SetChannel { channel, value: body.value }).await?;
	Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct SetAllBody {
	pub channels: Vec<Option<u8>>,
}

pub async fn set_all(State(dispatcher): State<Arc<Dispatcher>>, Json(body): Json<SetAllBody>) -> Result<Json<serde_json::Value>, ApiError> {
	let values = body
		.channels
		.into_iter()
		.enumerate()
		.filter_map(|(index, value)| value.map(|v| (u16::try_from(index + 1).unwrap_or(u16::MAX), v)))
		.collect();
	dispatcher.execute(ParsedCommand::SetAll { values }).await?;
	Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn blackout(State(dispatcher): State<Arc<Dispatcher>>) -> Result<Json<serde_json::Value>, ApiError> {
	let reply = dispatcher.execute(ParsedCommand::SenderBlackout { name: None }).await?;
	debug_assert!(matches!(reply, DispatchReply::Ack));
	Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn channel_update(State(state): State<AppState>) -> Json<Option<ChannelUpdate>> {
	Json(state.last_mqtt_update())
}
