//! Notification channel between the host and its presentation layer
//!
//! The scheduler and applier emit [`HostEvent`]s onto a broadcast
//! [`EventBus`]; any number of consumers (CLI printer, tests, a UI)
//! subscribe. Emission never blocks and never fails: with no subscribers
//! the event is simply dropped.
//!
//! Event names on the wire are `plans-cleared`, `plans-ready` and
//! `plan-applied`.

mod bus;
mod types;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventEmitter};
pub use types::{EventLogEntry, HostEvent};
