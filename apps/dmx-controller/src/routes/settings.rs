use serde::{Deserialize, Serialize};

use axum::extract::State;
use axum::Json;

use dmx_model::FollowerMap;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RetransmissionBody {
	pub enabled: bool,
	pub interval_seconds: u64,
}

pub async fn get_retransmission(State(state): State<AppState>) -> Json<RetransmissionBody> {
	let retransmit = state.dispatcher.senders().retransmit();
	Json(RetransmissionBody {
		enabled: retransmit.enabled(),
		interval_seconds: retransmit.interval().as_secs(),
	})
}

pub async fn set_retransmission(State(state): State<AppState>, Json(body): Json<RetransmissionBody>) -> Result<Json<RetransmissionBody>, ApiError> {
	state.dispatcher.senders().retransmit().set(body.enabled, body.interval_seconds);
	let mut settings = state.settings.write().await;
	settings.retransmit.enabled = body.enabled;
	settings.retransmit.interval_seconds = body.interval_seconds;
	Ok(Json(body))
}

pub async fn get_followers(State(state): State<AppState>) -> Json<FollowerMap> {
	Json(state.settings.read().await.follower_map.clone())
}

pub async fn set_followers(State(state): State<AppState>, Json(followers): Json<FollowerMap>) -> Result<Json<FollowerMap>, ApiError> {
	state.universe.set_follower_map(followers.clone());
	state.settings.write().await.follower_map = followers.clone();
	Ok(Json(followers))
}

#[derive(Debug, Deserialize)]
pub struct FallbackDelayBody {
	pub delay_seconds: u64,
}

/// Updates `delay_seconds` on whichever fallback slots currently exist,
/// leaving `enabled`/`target_id`/`kind` untouched. Narrower than a full
/// `/api/fallback` write.
pub async fn set_fallback_delay(State(state): State<AppState>, Json(body): Json<FallbackDelayBody>) -> Result<Json<dmx_model::FallbackConfig>, ApiError> {
	let updated = {
		let mut fallback = state.fallback.write().expect("fallback config poisoned");
		if let Some(scene) = fallback.scene.as_mut() {
			scene.delay_seconds = body.delay_seconds;
		}
		if let Some(sequence) = fallback.sequence.as_mut() {
			sequence.delay_seconds = body.delay_seconds;
		}
		fallback.clone()
	};
	state.show.write().await.fallback = updated.clone();
	Ok(Json(updated))
}
