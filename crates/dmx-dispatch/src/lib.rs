//! Translates MQTT topics and HTTP requests into engine/sender-registry
//! operations. See [`Dispatcher`] for the single chokepoint every
//! state-changing command passes through.

pub mod command;
mod dispatcher;
pub mod error;
mod payload;
mod table;

pub use command::{ConfigAction, ParsedCommand};
pub use dispatcher::{DispatchReply, Dispatcher};
pub use error::CommandError;
pub use table::DispatchTable;
