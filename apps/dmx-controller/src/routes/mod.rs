pub mod autostart;
pub mod config;
pub mod dmx;
pub mod fallback;
pub mod health;
pub mod playback;
pub mod programmable;
pub mod scenes;
pub mod sequences;
pub mod settings;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::routing::{get, post};
use axum::Router;
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

async fn handle_tower_error(error: BoxError) -> ApiError {
	if error.is::<tower::timeout::error::Elapsed>() {
		tracing::warn!("request timeout: {error}");
	} else {
		tracing::error!("unhandled middleware error: {error}");
	}
	ApiError::BadRequest("request could not be completed".to_string())
}

pub fn build(state: AppState) -> Router {
	Router::new()
		.route("/api/health", get(health::health))
		.route("/api/dmx/channel/:channel", post(dmx::set_channel))
		.route("/api/dmx/all", post(dmx::set_all))
		.route("/api/dmx/blackout", post(dmx::blackout))
		.route("/api/dmx/channel-update", get(dmx::channel_update))
		.route("/api/scenes", get(scenes::list).post(scenes::create))
		.route("/api/scenes/:id", get(scenes::get).put(scenes::update).delete(scenes::delete))
		.route("/api/scenes/:id/play", post(playback::play_scene))
		.route("/api/sequences", get(sequences::list).post(sequences::create))
		.route("/api/sequences/:id", get(sequences::get).put(sequences::update).delete(sequences::delete))
		.route("/api/sequences/:id/play", post(playback::play_sequence))
		.route("/api/programmable", get(programmable::list).post(programmable::create))
		.route("/api/programmable/:id", get(programmable::get).put(programmable::update).delete(programmable::delete))
		.route("/api/programmable/:id/play", post(playback::play_programmable))
		.route("/api/playback/stop", post(playback::stop))
		.route("/api/playback/status", get(playback::status))
		.route("/api/autostart", get(autostart::get).post(autostart::set).delete(autostart::clear))
		.route("/api/fallback", get(fallback::get).post(fallback::set).delete(fallback::clear))
		.route("/api/settings/dmx-retransmission", get(settings::get_retransmission).post(settings::set_retransmission))
		.route("/api/settings/dmx-followers", get(settings::get_followers).post(settings::set_followers))
		.route("/api/settings/fallback-delay", post(settings::set_fallback_delay))
		.route("/api/config", get(config::get).post(config::set))
		.with_state(state)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(HandleErrorLayer::new(handle_tower_error))
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CorsLayer::permissive()),
		)
}
