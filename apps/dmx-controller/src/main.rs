mod config_actions;
mod error;
mod mqtt;
mod routes;
mod show_sync;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, RwLock as StdRwLock};

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use dmx_config::{CliConfig, Settings, ShowConfig};
use dmx_dispatch::Dispatcher;
use dmx_engine::{EngineActor, FallbackController};
use dmx_sender::{RetransmitConfig, SenderRegistry};
use dmx_universe::UniverseBuffer;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	let cli = Arc::new(CliConfig::new());
	init_tracing(&cli);

	std::fs::create_dir_all(&cli.config_dir)?;
	let settings = load_or_default(Settings::load(&cli.config_dir), "settings.json", Settings::default)?;
	let show = load_or_default(ShowConfig::load(&cli.config_dir), "config.json", ShowConfig::default)?;

	if cli.require_broker {
		if let Err(err) = mqtt::wait_for_first_connection(&settings.mqtt).await {
			tracing::error!(error = %err, "mqtt broker required but unreachable");
			std::process::exit(2);
		}
	}

	let universe = Arc::new(UniverseBuffer::new());
	universe.set_follower_map(settings.follower_map.clone());

	let (actor, engine) = EngineActor::new(Arc::clone(&universe));
	for scene in show.scenes.values() {
		engine.store().put_scene(scene.clone());
	}
	for sequence in show.sequences.values() {
		engine.store().put_sequence(sequence.clone());
	}
	for programmable in show.programmable_scenes.values() {
		engine.store().put_programmable(programmable.clone());
	}
	tokio::spawn(actor.run());

	let retransmit = Arc::new(RetransmitConfig::new(settings.retransmit.enabled, settings.retransmit.interval_seconds));
	let senders = Arc::new(SenderRegistry::new(Arc::clone(&universe), Arc::clone(engine.tick_rate()), retransmit));
	let default_senders = if settings.default_senders.is_empty() {
		vec![Settings::default_sender()]
	} else {
		settings.default_senders.clone()
	};
	for descriptor in default_senders {
		let name = descriptor.name.clone();
		if let Err(err) = senders.add(descriptor).await {
			tracing::warn!(error = %err, sender = %name, "failed to start configured sender");
		}
	}

	let fallback = Arc::new(StdRwLock::new(show.fallback.clone()));
	tokio::spawn(FallbackController::new(engine.clone(), Arc::clone(&fallback)).run());

	let dispatcher = Arc::new(Dispatcher::new(engine.clone(), Arc::clone(&senders), show.sequences.keys().cloned()));

	let cancel = CancellationToken::new();
	let state = AppState::new(Arc::clone(&cli), Arc::clone(&dispatcher), Arc::clone(&universe), settings.clone(), show.clone(), fallback, cancel.clone());

	fire_autostart(&state).await;

	tokio::spawn(mqtt::run(state.clone(), settings.mqtt.clone(), cancel.clone()));

	let app = routes::build(state);
	let addr = SocketAddr::new(cli.bind_addr, cli.http_port);
	let listener = TcpListener::bind(addr).await?;
	tracing::info!(%addr, "listening");

	let signal_token = cancel.clone();
	tokio::spawn(async move {
		tokio::signal::ctrl_c().await.ok();
		tracing::info!("received ctrl-c, shutting down");
		signal_token.cancel();
	});

	let server_token = cancel.clone();
	axum::serve(listener, app).with_graceful_shutdown(async move { server_token.cancelled().await }).await?;
	tracing::info!("server stopped");

	Ok(())
}

/// Missing file means "fresh install", handled by falling back to
/// `default`. A malformed file is a genuine startup error, not silently
/// discarded.
fn load_or_default<T>(result: Result<T, dmx_config::ConfigError>, file: &str, default: impl FnOnce() -> T) -> Result<T> {
	match result {
		Ok(value) => Ok(value),
		Err(dmx_config::ConfigError::Read { .. }) => {
			tracing::info!(file, "no existing config file found, starting with defaults");
			Ok(default())
		}
		Err(err) => Err(err.into()),
	}
}

async fn fire_autostart(state: &AppState) {
	let autostart = state.show.read().await.autostart.clone();
	if let Some(id) = autostart.scene {
		if let Err(err) = state.dispatcher.engine().play_scene(id.clone(), None).await {
			tracing::warn!(error = %err, scene = %id, "autostart scene failed");
		}
	} else if let Some(id) = autostart.sequence {
		if let Err(err) = state.dispatcher.engine().play_sequence(id.clone()).await {
			tracing::warn!(error = %err, sequence = %id, "autostart sequence failed");
		}
	} else if let Some(id) = autostart.programmable {
		if let Err(err) = state.dispatcher.engine().play_programmable(id.clone()).await {
			tracing::warn!(error = %err, programmable = %id, "autostart programmable failed");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;
	use std::path::PathBuf;

	#[test]
	fn missing_file_falls_back_to_default() {
		let err = dmx_config::ConfigError::Read {
			path: PathBuf::from("settings.json"),
			source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
		};
		let result = load_or_default::<u32>(Err(err), "settings.json", || 7);
		assert_eq!(result.unwrap(), 7);
	}

	#[test]
	fn parse_error_is_fatal() {
		let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
		let err = dmx_config::ConfigError::Parse { path: PathBuf::from("config.json"), source: json_err };
		let result = load_or_default::<u32>(Err(err), "config.json", || 7);
		assert!(result.is_err());
	}

	#[test]
	fn ok_value_passes_through() {
		let result = load_or_default::<u32>(Ok(42), "settings.json", || 7);
		assert_eq!(result.unwrap(), 42);
	}
}

fn init_tracing(cli: &CliConfig) {
	let filter = EnvFilter::from_str(&cli.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(if cli.log_json {
			Box::new(
				tracing_subscriber::fmt::layer()
					.fmt_fields(JsonFields::default())
					.event_format(tracing_subscriber::fmt::format().json().flatten_event(true).with_span_list(false))
					.with_filter(filter),
			) as Box<dyn Layer<_> + Send + Sync>
		} else {
			Box::new(tracing_subscriber::fmt::layer().event_format(tracing_subscriber::fmt::format().pretty()).with_filter(filter))
		})
		.init();
}
