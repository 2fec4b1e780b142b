use std::{fmt, time::Duration};

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DEBOUNCE_MS, DEFAULT_ERROR_POLICY};

/// What a `HistoryController` does with a failed operation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    Propagate,

    /// Store the error in the last-error slot and treat the call as a no-op.
    Capture,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Propagate => write!(f, "propagate"),
            ErrorPolicy::Capture => write!(f, "capture"),
        }
    }
}

/// Construction-time settings of a `HistoryController`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Appends arriving within this many milliseconds of the pending entry
    /// are coalesced into it. Zero disables debouncing.
    #[cfg_attr(feature = "serde", serde(default = "default_debounce_ms"))]
    pub debounce_ms: u64,

    #[cfg_attr(feature = "serde", serde(default = "default_error_policy"))]
    pub error_policy: ErrorPolicy,

    /// Maximum number of entries kept in the root scope; the oldest go first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub undo_limit: Option<usize>,
}

fn default_debounce_ms() -> u64 {
    debug!("Using default debounce interval (ms): {DEFAULT_DEBOUNCE_MS}");
    DEFAULT_DEBOUNCE_MS
}

fn default_error_policy() -> ErrorPolicy {
    debug!("Using default error policy: {DEFAULT_ERROR_POLICY}");
    DEFAULT_ERROR_POLICY
}

impl HistoryConfig {
    #[must_use]
    pub fn with_debounce(mut self, interval: Duration) -> Self {
        self.debounce_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    #[must_use]
    pub fn with_undo_limit(mut self, undo_limit: usize) -> Self {
        self.undo_limit = Some(undo_limit);
        self
    }

    pub(crate) fn debounce(&self) -> Option<Duration> {
        (self.debounce_ms > 0).then(|| Duration::from_millis(self.debounce_ms))
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            error_policy: default_error_policy(),
            undo_limit: None,
        }
    }
}
