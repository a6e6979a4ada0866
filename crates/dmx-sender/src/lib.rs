//! Sender Fan-out and the Retransmit Loop.
//!
//! Each configured [`dmx_model::SenderDescriptor`] gets its own task (see
//! [`task::run`]) ticking at its own fps, framing the shared universe
//! snapshot through [`dmx_proto::Framer`], and reopening its socket with
//! backoff on fatal send errors. [`SenderRegistry`] owns the set of running
//! tasks and the shared [`RetransmitConfig`] every task polls.

pub mod backoff;
pub mod error;
pub mod registry;
pub mod retransmit;
pub mod status;
mod task;

pub use error::SenderError;
pub use registry::SenderRegistry;
pub use retransmit::RetransmitConfig;
pub use status::{SenderInfo, SenderStatus};
