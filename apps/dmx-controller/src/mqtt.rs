//! MQTT transport: subscribes to the full topic grammar, routes incoming
//! messages through [`Dispatcher::route_mqtt`]/[`Dispatcher::execute`], and
//! publishes replies. Reconnects with [`dmx_sender::backoff::ExponentialBackoff`]
//! on every drop, same policy shape as the sender socket reopen loop.

use std::time::Duration;

use dmx_config::MqttSettings;
use dmx_dispatch::{ConfigAction, DispatchReply, ParsedCommand};
use dmx_sender::backoff::ExponentialBackoff;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config_actions;
use crate::state::AppState;

const STATIC_TOPICS: &[&str] = &[
	"dmx/set/channel/+",
	"dmx/scene/+",
	"dmx/sender/status",
	"dmx/sender/list",
	"dmx/sender/blackout",
	"dmx/sender/blackout/+",
	"dmx/sender/remove/+",
	"dmx/config/show",
	"dmx/config/reload",
	"dmx/config/save",
];

fn client_options(settings: &MqttSettings) -> MqttOptions {
	let client_id = settings.client_id.clone().unwrap_or_else(|| "dmx-controller".to_string());
	let mut options = MqttOptions::new(client_id, settings.host.clone(), settings.port);
	options.set_keep_alive(Duration::from_secs(30));
	if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
		options.set_credentials(username.clone(), password.clone());
	}
	options
}

/// Builds a client/eventloop pair and subscribes it to the static topic
/// grammar plus every currently-registered sequence name. Returns the
/// client so callers can publish replies.
async fn connect(state: &AppState, settings: &MqttSettings) -> (AsyncClient, EventLoop) {
	let (client, eventloop) = AsyncClient::new(client_options(settings), 64);
	for topic in STATIC_TOPICS {
		if let Err(err) = client.subscribe(*topic, QoS::AtLeastOnce).await {
			warn!(error = %err, topic, "failed to queue subscription");
		}
	}
	for name in state.dispatcher.table().sequence_names() {
		if let Err(err) = client.subscribe(&name, QoS::AtLeastOnce).await {
			warn!(error = %err, topic = %name, "failed to queue sequence subscription");
		}
	}
	(client, eventloop)
}

/// Blocks until the broker accepts a connection, or gives up once the
/// backoff delay has reached its cap and one more attempt still fails.
/// Used only when `--require-broker` is set, so a misconfigured broker
/// fails startup loudly instead of running silently without MQTT.
pub async fn wait_for_first_connection(settings: &MqttSettings) -> Result<(), String> {
	let (_client, mut eventloop) = AsyncClient::new(client_options(settings), 16);
	let mut backoff = ExponentialBackoff::default();

	loop {
		match eventloop.poll().await {
			Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(()),
			Ok(_) => continue,
			Err(err) => {
				let delay = backoff.next_delay();
				if delay >= Duration::from_secs(30) {
					return Err(format!("broker unreachable after max backoff: {err}"));
				}
				warn!(error = %err, delay_secs = delay.as_secs(), "mqtt broker unreachable, retrying");
				tokio::time::sleep(delay).await;
			}
		}
	}
}

pub async fn run(state: AppState, settings: MqttSettings, cancel: CancellationToken) {
	let (mut client, mut eventloop) = connect(&state, &settings).await;
	let mut backoff = ExponentialBackoff::default();

	loop {
		tokio::select! {
			() = cancel.cancelled() => {
				info!("mqtt client shutting down");
				return;
			}
			event = eventloop.poll() => match event {
				Ok(Event::Incoming(Packet::Publish(publish))) => {
					backoff.reset();
					let payload = String::from_utf8_lossy(&publish.payload).into_owned();
					handle_message(&state, &client, &publish.topic, &payload).await;
				}
				Ok(Event::Incoming(Packet::ConnAck(_))) => {
					backoff.reset();
					info!(host = %settings.host, port = settings.port, "connected to mqtt broker");
				}
				Ok(_) => {}
				Err(err) => {
					let delay = backoff.next_delay();
					warn!(error = %err, delay_secs = delay.as_secs(), "mqtt connection lost, reconnecting");
					tokio::time::sleep(delay).await;
					let (new_client, new_eventloop) = connect(&state, &settings).await;
					client = new_client;
					eventloop = new_eventloop;
				}
			},
		}
	}
}

async fn handle_message(state: &AppState, client: &AsyncClient, topic: &str, payload: &str) {
	debug!(topic, payload, "mqtt message received");

	let command = match state.dispatcher.route_mqtt(topic, payload) {
		Ok(command) => command,
		Err(err) => {
			warn!(error = %err, topic, "no route for mqtt topic");
			return;
		}
	};

	if let ParsedCommand::SetChannel { channel, value } = &command {
		state.record_mqtt_update(*channel, *value);
	}

	if let ParsedCommand::Config(action) = command {
		match config_actions::handle(state, action).await {
			Ok(body) => {
				publish_reply(client, action, &body).await;
				if action == ConfigAction::Reload {
					resubscribe_sequences(state, client).await;
				}
			}
			Err(err) => warn!(error = %err, "config action failed"),
		}
		return;
	}

	match state.dispatcher.execute(command).await {
		Ok(DispatchReply::SenderStatusAll(statuses)) => publish_json(client, "dmx/sender/status/reply", &statuses).await,
		Ok(DispatchReply::SenderNames(names)) => publish_json(client, "dmx/sender/list/reply", &names).await,
		Ok(_) => {}
		Err(err) => warn!(error = %err, topic, "dispatch failed"),
	}
}

async fn resubscribe_sequences(state: &AppState, client: &AsyncClient) {
	for name in state.dispatcher.table().sequence_names() {
		if let Err(err) = client.subscribe(&name, QoS::AtLeastOnce).await {
			warn!(error = %err, topic = %name, "failed to resubscribe after reload");
		}
	}
}

async fn publish_reply(client: &AsyncClient, action: ConfigAction, body: &serde_json::Value) {
	let topic = match action {
		ConfigAction::Show => "dmx/config/show/reply",
		ConfigAction::Reload => "dmx/config/reload/reply",
		ConfigAction::Save => "dmx/config/save/reply",
	};
	publish_json(client, topic, body).await;
}

async fn publish_json(client: &AsyncClient, topic: &str, body: &impl serde::Serialize) {
	match serde_json::to_vec(body) {
		Ok(payload) => {
			if let Err(err) = client.publish(topic, QoS::AtLeastOnce, false, payload).await {
				warn!(error = %err, topic, "failed to publish reply");
			}
		}
		Err(err) => warn!(error = %err, topic, "failed to serialize reply"),
	}
}
