use tokio::sync::oneshot;

use dmx_model::{ChannelNumber, PlaybackStatus};

use crate::error::EngineError;

/// Messages the engine actor serializes and processes one at a time, in
/// arrival order. `Tick` is internal: it is only ever sent back by a
/// `schedule_wake` sleep task, never by a handle caller.
pub(crate) enum Command {
	PlayScene {
		id: String,
		transition_seconds: Option<f64>,
		reply: oneshot::Sender<Result<(), EngineError>>,
	},
	PlaySequence {
		id: String,
		reply: oneshot::Sender<Result<(), EngineError>>,
	},
	PlayProgrammable {
		id: String,
		reply: oneshot::Sender<Result<(), EngineError>>,
	},
	SetChannel {
		channel: ChannelNumber,
		value: u8,
		reply: oneshot::Sender<()>,
	},
	Stop {
		reply: oneshot::Sender<()>,
	},
	Status {
		reply: oneshot::Sender<PlaybackStatus>,
	},
	Tick {
		generation: u64,
	},
}
