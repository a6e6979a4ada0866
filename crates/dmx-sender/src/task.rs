use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use socket2::{Domain, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dmx_model::SenderDescriptor;
use dmx_proto::Framer;
use dmx_universe::UniverseBuffer;

use crate::backoff::ExponentialBackoff;
use crate::retransmit::RetransmitConfig;
use crate::status::SenderStatus;

fn bind_socket() -> std::io::Result<UdpSocket> {
	let socket = Socket::new(Domain::IPV4, Type::DGRAM, None)?;
	socket.set_broadcast(true)?;
	socket.set_nonblocking(true)?;
	socket.bind(&"0.0.0.0:0".parse::<SocketAddr>().unwrap().into())?;
	UdpSocket::from_std(socket.into())
}

fn is_transient(err: &std::io::Error) -> bool {
	use std::io::ErrorKind;
	matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::ConnectionRefused | ErrorKind::AddrNotAvailable | ErrorKind::NotConnected)
}

async fn send_once(socket: &UdpSocket, target: SocketAddr, framer: &mut Framer, universe: &UniverseBuffer, status: &SenderStatus) -> Result<(), ()> {
	let snapshot = universe.snapshot();
	let packet = framer.frame(&snapshot);
	match socket.send_to(&packet, target).await {
		Ok(_) => {
			status.record_sent();
			Ok(())
		}
		Err(err) if is_transient(&err) => {
			debug!(error = %err, "transient send failure");
			status.record_transient_error(err.to_string());
			Ok(())
		}
		Err(err) => {
			warn!(error = %err, "sender socket failed, reopening");
			status.mark_failed(err.to_string());
			Err(())
		}
	}
}

/// Drive one sender's fps ticker, independent retransmit ticker, and
/// on-demand blackout notification, reopening the socket with exponential
/// backoff on fatal errors. Runs until `cancel` fires.
pub async fn run(descriptor: SenderDescriptor, universe: Arc<UniverseBuffer>, retransmit: Arc<RetransmitConfig>, status: Arc<SenderStatus>, force_send: Arc<Notify>, cancel: CancellationToken) {
	let target = SocketAddr::new(descriptor.target, descriptor.port);
	let fps_period = Duration::from_secs_f64(1.0 / f64::from(descriptor.fps));
	let mut backoff = ExponentialBackoff::default();
	let mut framer = Framer::new(descriptor.protocol, descriptor.universe, format!("dmx-controller/{}", descriptor.name));

	'reconnect: loop {
		if cancel.is_cancelled() {
			return;
		}

		let socket = match bind_socket() {
			Ok(socket) => socket,
			Err(err) => {
				status.mark_failed(err.to_string());
				let delay = backoff.next_delay();
				tokio::select! {
					() = cancel.cancelled() => return,
					() = tokio::time::sleep(delay) => continue 'reconnect,
				}
			}
		};
		backoff.reset();

		let mut fps_ticker = tokio::time::interval(fps_period);
		let mut retransmit_ticker = tokio::time::interval(retransmit.interval());
		let mut last_retransmit_interval = retransmit.interval();

		loop {
			tokio::select! {
				() = cancel.cancelled() => return,

				_ = fps_ticker.tick() => {
					if send_once(&socket, target, &mut framer, &universe, &status).await.is_err() {
						let delay = backoff.next_delay();
						tokio::select! {
							() = cancel.cancelled() => return,
							() = tokio::time::sleep(delay) => {}
						}
						continue 'reconnect;
					}
				}

				_ = retransmit_ticker.tick() => {
					if retransmit.enabled() {
						let _ = send_once(&socket, target, &mut framer, &universe, &status).await;
					}
					let current = retransmit.interval();
					if current != last_retransmit_interval {
						retransmit_ticker = tokio::time::interval(current);
						last_retransmit_interval = current;
					}
				}

				() = force_send.notified() => {
					if send_once(&socket, target, &mut framer, &universe, &status).await.is_err() {
						continue 'reconnect;
					}
				}
			}
		}
	}
}
