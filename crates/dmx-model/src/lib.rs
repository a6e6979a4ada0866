//! Shared, persistence-friendly data types for the DMX show runtime.
//!
//! Every type here is a plain `serde`-derived value with small constructor
//! and validation helpers; playback/evaluation logic lives in `dmx-engine`
//! and `dmx-expr`.

pub mod channel;
pub mod error;
pub mod fallback;
pub mod follower;
pub mod playback;
pub mod programmable;
pub mod scene;
pub mod sender;
pub mod sequence;

pub use channel::{channel_index, clamp_dmx, ChannelNumber, UNIVERSE_SIZE};
pub use error::ValidationError;
pub use fallback::{AutostartConfig, FallbackConfig, FallbackKind, FallbackSlot};
pub use follower::FollowerMap;
pub use playback::{PlaybackState, PlaybackStatus};
pub use programmable::ProgrammableScene;
pub use scene::Scene;
pub use sender::{clamp_fps, Protocol, SenderDescriptor};
pub use sequence::{Sequence, Step, StepTarget};
