//! Executes a [`ConfigAction`] handed back by [`dmx_dispatch::Dispatcher`].
//! `dmx-dispatch` only recognizes the action; deciding what "show",
//! "reload", and "save" actually do against disk and the live state is
//! this crate's job.

use dmx_config::{Settings, ShowConfig};
use dmx_dispatch::ConfigAction;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::show_sync;
use crate::state::AppState;

pub async fn handle(state: &AppState, action: ConfigAction) -> Result<Value, ApiError> {
	match action {
		ConfigAction::Show => Ok(json!({
			"settings": &*state.settings.read().await,
			"show": &*state.show.read().await,
		})),
		ConfigAction::Reload => reload(state).await,
		ConfigAction::Save => save(state).await,
	}
}

async fn reload(state: &AppState) -> Result<Value, ApiError> {
	let settings = Settings::load(&state.cli.config_dir)?;
	let show = ShowConfig::load(&state.cli.config_dir)?;

	state.universe.set_follower_map(settings.follower_map.clone());
	state.dispatcher.senders().retransmit().set(settings.retransmit.enabled, settings.retransmit.interval_seconds);
	show_sync::apply(state, &show);

	*state.settings.write().await = settings;
	*state.show.write().await = show;
	info!("reloaded settings.json and config.json from disk");
	Ok(json!({ "reloaded": true }))
}

async fn save(state: &AppState) -> Result<Value, ApiError> {
	state.settings.read().await.save(&state.cli.config_dir)?;
	state.show.read().await.save(&state.cli.config_dir)?;
	info!("saved settings.json and config.json to disk");
	Ok(json!({ "saved": true }))
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, RwLock as StdRwLock};

	use dmx_config::CliConfig;
	use dmx_dispatch::Dispatcher;
	use dmx_engine::EngineActor;
	use dmx_model::{FallbackConfig, Scene};
	use dmx_sender::{RetransmitConfig, SenderRegistry};
	use dmx_universe::UniverseBuffer;
	use tokio_util::sync::CancellationToken;

	use super::*;

	async fn state_in(config_dir: std::path::PathBuf) -> AppState {
		let universe = Arc::new(UniverseBuffer::new());
		let (actor, engine) = EngineActor::new(Arc::clone(&universe));
		tokio::spawn(actor.run());

		let retransmit = Arc::new(RetransmitConfig::default());
		let senders = Arc::new(SenderRegistry::new(universe.clone(), Arc::clone(engine.tick_rate()), retransmit));
		let dispatcher = Arc::new(Dispatcher::new(engine, senders, Vec::<String>::new()));

		let cli = CliConfig { config_dir, ..CliConfig::default() };

		AppState::new(
			Arc::new(cli),
			dispatcher,
			universe,
			Settings::default(),
			ShowConfig::default(),
			Arc::new(StdRwLock::new(FallbackConfig::default())),
			CancellationToken::new(),
		)
	}

	#[tokio::test]
	async fn reload_picks_up_a_show_written_directly_to_disk() {
		let dir = tempfile::tempdir().unwrap();
		let state = state_in(dir.path().to_path_buf()).await;

		let mut show = ShowConfig::default();
		show.scenes.insert("red".to_string(), Scene::new("red", vec![Some(255)]));
		show.save(dir.path()).unwrap();
		Settings::default().save(dir.path()).unwrap();

		let result = handle(&state, ConfigAction::Reload).await.unwrap();

		assert_eq!(result["reloaded"], true);
		assert!(state.dispatcher.engine().store().get_scene("red").is_some());
	}

	#[tokio::test]
	async fn save_writes_the_live_show_to_disk() {
		let dir = tempfile::tempdir().unwrap();
		let state = state_in(dir.path().to_path_buf()).await;
		state.show.write().await.scenes.insert("blue".to_string(), Scene::new("blue", vec![Some(1)]));

		let result = handle(&state, ConfigAction::Save).await.unwrap();

		assert_eq!(result["saved"], true);
		let reloaded = ShowConfig::load(dir.path()).unwrap();
		assert!(reloaded.scenes.contains_key("blue"));
	}

	#[tokio::test]
	async fn show_action_reports_current_settings_and_show() {
		let dir = tempfile::tempdir().unwrap();
		let state = state_in(dir.path().to_path_buf()).await;

		let result = handle(&state, ConfigAction::Show).await.unwrap();

		assert!(result.get("settings").is_some());
		assert!(result.get("show").is_some());
	}
}
