//! Run state definitions for the monitoring engine
//!
//! The scheduler owns a single [`RunState`] value and mutates it only at
//! cycle boundaries; every transition is reported through the notifier.

use std::fmt;

/// Current state of the monitoring engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Engine is not running
    Idle,

    /// A fetch cycle is in progress
    Fetching,

    /// Last cycle succeeded; waiting for the next tick
    Monitoring,

    /// Fetch retries were exhausted; halted until an explicit restart
    Error,
}

impl RunState {
    /// Returns true while the engine is running (a cycle in flight or armed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Fetching | Self::Monitoring)
    }

    /// Returns true if the engine halted on a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Monitoring => "monitoring",
            Self::Error => "error",
        }
    }

    /// Parses a state from its string form; None for unknown strings
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "fetching" => Some(Self::Fetching),
            "monitoring" => Some(Self::Monitoring),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn all_states() -> Vec<Self> {
        vec![Self::Idle, Self::Fetching, Self::Monitoring, Self::Error]
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
