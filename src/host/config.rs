//! Host timing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::events::DEFAULT_CHANNEL_CAPACITY;
use crate::planning::{DEFAULT_PLANNING_GRACE, DEFAULT_PLANNING_TIMEOUT};
use crate::scheduler::DEFAULT_DEBOUNCE;

use super::applier::DEFAULT_SETTLE_DELAY;

/// Delays and budgets for one arc host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Quiet period before replanning, in milliseconds
    #[serde(rename = "debounce-ms", default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Wait after instantiating a plan before announcing it, in milliseconds
    #[serde(rename = "settle-ms", default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Budget handed to the planner, in milliseconds
    #[serde(rename = "planning-timeout-ms", default = "default_planning_timeout_ms")]
    pub planning_timeout_ms: u64,

    /// How long past its budget a planner may run before it is abandoned
    #[serde(rename = "planning-grace-ms", default = "default_planning_grace_ms")]
    pub planning_grace_ms: u64,

    /// Event bus capacity
    #[serde(rename = "event-capacity", default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn millis(d: Duration) -> u64 {
    d.as_millis() as u64
}

fn default_debounce_ms() -> u64 {
    millis(DEFAULT_DEBOUNCE)
}

fn default_settle_ms() -> u64 {
    millis(DEFAULT_SETTLE_DELAY)
}

fn default_planning_timeout_ms() -> u64 {
    millis(DEFAULT_PLANNING_TIMEOUT)
}

fn default_planning_grace_ms() -> u64 {
    millis(DEFAULT_PLANNING_GRACE)
}

fn default_event_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            settle_ms: default_settle_ms(),
            planning_timeout_ms: default_planning_timeout_ms(),
            planning_grace_ms: default_planning_grace_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl HostConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn planning_timeout(&self) -> Duration {
        Duration::from_millis(self.planning_timeout_ms)
    }

    pub fn planning_grace(&self) -> Duration {
        Duration::from_millis(self.planning_grace_ms)
    }
}
