//! Pushes a [`ShowConfig`] into the live engine store, dispatch table, and
//! fallback cell. Shared by the `/api/config` HTTP route and the MQTT
//! `dmx/config/reload` action so both paths apply a show the same way.

use dmx_config::ShowConfig;

use crate::state::AppState;

pub fn apply(state: &AppState, show: &ShowConfig) {
	let store = state.dispatcher.engine().store();

	for stale in store.list_scenes() {
		if !show.scenes.contains_key(&stale.id) {
			store.remove_scene(&stale.id);
		}
	}
	for scene in show.scenes.values() {
		store.put_scene(scene.clone());
	}

	for stale in store.list_sequences() {
		if !show.sequences.contains_key(&stale.id) {
			store.remove_sequence(&stale.id);
		}
	}
	for sequence in show.sequences.values() {
		store.put_sequence(sequence.clone());
	}

	for stale in store.list_programmables() {
		if !show.programmable_scenes.contains_key(&stale.id) {
			store.remove_programmable(&stale.id);
		}
	}
	for programmable in show.programmable_scenes.values() {
		store.put_programmable(programmable.clone());
	}

	state.dispatcher.table().rebuild(show.sequences.keys().cloned());
	*state.fallback.write().expect("fallback config poisoned") = show.fallback.clone();
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, RwLock as StdRwLock};

	use dmx_config::{CliConfig, Settings};
	use dmx_dispatch::Dispatcher;
	use dmx_engine::EngineActor;
	use dmx_model::{FallbackConfig, Scene, Sequence, Step, StepTarget};
	use dmx_sender::{RetransmitConfig, SenderRegistry};
	use dmx_universe::UniverseBuffer;
	use tokio_util::sync::CancellationToken;

	use super::*;

	async fn state_with_scene(id: &str) -> AppState {
		let universe = Arc::new(UniverseBuffer::new());
		let (actor, engine) = EngineActor::new(Arc::clone(&universe));
		engine.store().put_scene(Scene::new(id, vec![Some(1)]));
		tokio::spawn(actor.run());

		let retransmit = Arc::new(RetransmitConfig::default());
		let senders = Arc::new(SenderRegistry::new(universe.clone(), Arc::clone(engine.tick_rate()), retransmit));
		let dispatcher = Arc::new(Dispatcher::new(engine, senders, Vec::<String>::new()));

		AppState::new(
			Arc::new(CliConfig::default()),
			dispatcher,
			universe,
			Settings::default(),
			ShowConfig::default(),
			Arc::new(StdRwLock::new(FallbackConfig::default())),
			CancellationToken::new(),
		)
	}

	#[tokio::test]
	async fn removes_scenes_dropped_from_the_new_show() {
		let state = state_with_scene("red").await;
		let show = ShowConfig::default();

		apply(&state, &show);

		assert!(state.dispatcher.engine().store().get_scene("red").is_none());
	}

	#[tokio::test]
	async fn upserts_scenes_present_in_the_new_show() {
		let state = state_with_scene("red").await;
		let mut show = ShowConfig::default();
		show.scenes.insert("blue".to_string(), Scene::new("blue", vec![Some(9)]));

		apply(&state, &show);

		assert!(state.dispatcher.engine().store().get_scene("red").is_none());
		assert_eq!(state.dispatcher.engine().store().get_scene("blue").unwrap().value_at(0), Some(9));
	}

	#[tokio::test]
	async fn rebuilds_dispatch_table_sequence_names() {
		let state = state_with_scene("red").await;
		let mut show = ShowConfig::default();
		show.sequences.insert(
			"rainbow".to_string(),
			Sequence {
				id: "rainbow".to_string(),
				description: None,
				steps: vec![Step { target: StepTarget::SceneRef("red".to_string()), duration_ms: 100, fade_ms: 0 }],
				r#loop: false,
			},
		);

		apply(&state, &show);

		assert_eq!(state.dispatcher.table().sequence_names(), vec!["rainbow".to_string()]);
	}

	#[tokio::test]
	async fn replaces_fallback_cell_contents() {
		let state = state_with_scene("red").await;
		let mut show = ShowConfig::default();
		show.fallback.scene = Some(dmx_model::FallbackSlot {
			enabled: true,
			target_id: "red".to_string(),
			delay_seconds: 5,
			kind: dmx_model::FallbackKind::Scene,
		});

		apply(&state, &show);

		assert!(state.fallback.read().unwrap().scene.is_some());
	}
}
