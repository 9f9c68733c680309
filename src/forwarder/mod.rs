//! Event forwarding module
//!
//! The forwarder and the statistics it keeps across invocations.

mod handler;
mod stats;

pub use handler::{EventForwarder, ForwardOutcome};
pub use stats::{ForwarderStats, StatsSnapshot};
