//! State machine for tracking the publish pipeline
//!
//! Every publish run walks a fixed sequence of states. The tracker records
//! each transition with a timestamp so a failed run can show exactly where
//! it stopped. There is no persistence: the pipeline is fail-fast with no
//! resume, so state only lives for one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishState {
    Idle,
    Initializing,
    Preparing,
    Uploading,
    Completed,
    Failed,
}

/// One recorded state transition
#[derive(Debug, Clone, PartialEq)]
pub struct StateTransition {
    /// From state
    pub from: PublishState,

    /// To state
    pub to: PublishState,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Optional detail, usually the file being processed or the error.
    pub detail: Option<String>,
}

/// Tracker for the pipeline state of one publish run
pub struct StateTracker {
    current: PublishState,
    transitions: Vec<StateTransition>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    /// Create a tracker in the idle state.
    pub fn new() -> Self {
        Self {
            current: PublishState::Idle,
            transitions: Vec::new(),
        }
    }

    /// Transition to a new state.
    pub fn transition(&mut self, to: PublishState, detail: Option<String>) {
        self.transitions.push(StateTransition {
            from: self.current,
            to,
            timestamp: Utc::now(),
            detail,
        });
        self.current = to;
    }

    /// Get the current state.
    pub fn current(&self) -> PublishState {
        self.current
    }

    /// Check whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.current,
            PublishState::Completed | PublishState::Failed
        )
    }

    /// Elapsed time between the first and last transition in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        match (self.transitions.first(), self.transitions.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first.timestamp).num_milliseconds()
            }
            _ => 0,
        }
    }

    /// Transition history as a human-readable string.
    pub fn history(&self) -> String {
        self.transitions
            .iter()
            .map(|t| {
                let detail = t
                    .detail
                    .as_ref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default();
                format!(
                    "{}: {:?} → {:?}{}",
                    t.timestamp.to_rfc3339(),
                    t.from,
                    t.to,
                    detail
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
