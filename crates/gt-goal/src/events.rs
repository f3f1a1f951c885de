// events.rs — Goal events and notification dispatch.
//
// The store emits one event per committed change. Sinks (a JSONL log, a
// reminder scheduler, a UI refresh hook) subscribe by implementing
// NotificationSink. Dispatch is synchronous and a failing sink never
// blocks the others or the mutation that triggered it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal::Weekday;

/// Events emitted by the goal store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GoalEvent {
    /// The list was (re)loaded from storage.
    GoalsLoaded {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    GoalCreated {
        goal_id: String,
        title: String,
        timestamp: DateTime<Utc>,
    },

    /// A goal was replaced wholesale (edit screen save).
    GoalUpdated {
        goal_id: String,
        timestamp: DateTime<Utc>,
    },

    GoalCompletionToggled {
        goal_id: String,
        completed: bool,
        timestamp: DateTime<Utc>,
    },

    GoalDeleted {
        goal_id: String,
        title: String,
        timestamp: DateTime<Utc>,
    },

    SmallGoalAdded {
        goal_id: String,
        weekday: Weekday,
        small_goal_id: String,
        reminder_time: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    SmallGoalRemoved {
        goal_id: String,
        weekday: Weekday,
        small_goal_id: String,
        timestamp: DateTime<Utc>,
    },

    SmallGoalToggled {
        goal_id: String,
        weekday: Weekday,
        index: usize,
        completed: bool,
        timestamp: DateTime<Utc>,
    },
}

impl GoalEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            GoalEvent::GoalsLoaded { .. } => "goals_loaded",
            GoalEvent::GoalCreated { .. } => "goal_created",
            GoalEvent::GoalUpdated { .. } => "goal_updated",
            GoalEvent::GoalCompletionToggled { .. } => "goal_completion_toggled",
            GoalEvent::GoalDeleted { .. } => "goal_deleted",
            GoalEvent::SmallGoalAdded { .. } => "small_goal_added",
            GoalEvent::SmallGoalRemoved { .. } => "small_goal_removed",
            GoalEvent::SmallGoalToggled { .. } => "small_goal_toggled",
        }
    }
}

/// Trait for receiving goal events.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged but don't stop the system.
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError>;
}

/// Logs events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| GoalError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
///
/// Errors from individual sinks are logged (via tracing) but don't
/// prevent other sinks from receiving the event.
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// Create a new dispatcher with no sinks.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a notification sink.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Dispatch an event to all sinks.
    pub fn dispatch(&self, event: &GoalEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!(event = event.event_type(), "notification sink error: {}", e);
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
