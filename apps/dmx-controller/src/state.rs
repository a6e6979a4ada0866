use std::sync::{Arc, Mutex, RwLock as StdRwLock};
use std::time::SystemTime;

use axum::extract::FromRef;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use dmx_config::{CliConfig, Settings, ShowConfig};
use dmx_dispatch::Dispatcher;
use dmx_model::FallbackConfig;
use dmx_universe::UniverseBuffer;

/// The most recent channel write that arrived over MQTT rather than the
/// HTTP API, so a UI can mirror external changes without polling DMX
/// output directly.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelUpdate {
	pub channel: u16,
	pub value: u8,
	pub unix_millis: u128,
}

#[derive(Clone)]
pub struct AppState {
	pub cli: Arc<CliConfig>,
	pub dispatcher: Arc<Dispatcher>,
	pub universe: Arc<UniverseBuffer>,
	pub settings: Arc<RwLock<Settings>>,
	pub show: Arc<RwLock<ShowConfig>>,
	/// Shared with the running [`dmx_engine::FallbackController`], so a
	/// `/api/fallback` write takes effect on its very next poll.
	pub fallback: Arc<StdRwLock<FallbackConfig>>,
	pub cancel: CancellationToken,
	last_mqtt_update: Arc<Mutex<Option<ChannelUpdate>>>,
}

impl AppState {
	#[must_use]
	pub fn new(
		cli: Arc<CliConfig>, dispatcher: Arc<Dispatcher>, universe: Arc<UniverseBuffer>, settings: Settings, show: ShowConfig, fallback: Arc<StdRwLock<FallbackConfig>>, cancel: CancellationToken,
	) -> Self {
		Self {
			cli,
			dispatcher,
			universe,
			settings: Arc::new(RwLock::new(settings)),
			show: Arc::new(RwLock::new(show)),
			fallback,
			cancel,
			last_mqtt_update: Arc::new(Mutex::new(None)),
		}
	}

	/// Record an MQTT-originated channel write for `/api/dmx/channel-update`.
	pub fn record_mqtt_update(&self, channel: u16, value: u8) {
		let unix_millis = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
		*self.last_mqtt_update.lock().expect("channel update mutex poisoned") = Some(ChannelUpdate { channel, value, unix_millis });
	}

	#[must_use]
	pub fn last_mqtt_update(&self) -> Option<ChannelUpdate> {
		self.last_mqtt_update.lock().expect("channel update mutex poisoned").clone()
	}
}

impl FromRef<AppState> for Arc<Dispatcher> {
	fn from_ref(state: &AppState) -> Self {
		state.dispatcher.clone()
	}
}

impl FromRef<AppState> for Arc<CliConfig> {
	fn from_ref(state: &AppState) -> Self {
		state.cli.clone()
	}
}

impl FromRef<AppState> for CancellationToken {
	fn from_ref(state: &AppState) -> Self {
		state.cancel.clone()
	}
}
