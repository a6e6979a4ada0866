//! The Playback Engine and Fallback Controller.
//!
//! [`EngineActor`] is the single task that owns [`dmx_model::PlaybackState`]
//! and the only writer to the universe buffer on behalf of scenes,
//! sequences, and programmable scenes. Callers talk to it through a cloned
//! [`EngineHandle`]; [`FallbackController`] is just another caller that
//! watches command inactivity and issues the same play commands everyone
//! else does.

mod actor;
pub mod activity;
mod command;
pub mod error;
pub mod fallback;
pub mod handle;
pub mod store;
pub mod tick;

pub use actor::EngineActor;
pub use activity::ActivityClock;
pub use error::EngineError;
pub use fallback::FallbackController;
pub use handle::EngineHandle;
pub use store::Store;
pub use tick::TickRate;
