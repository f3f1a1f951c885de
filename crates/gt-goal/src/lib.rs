//! # gt-goal
//!
//! Big goals, their per-weekday small goals, and the store that owns them.
//!
//! A [`Goal`] is a top-level objective. Each goal carries a [`WeeklyGoals`]
//! map with all seven weekdays, and each day holds an ordered list of
//! [`SmallGoal`]s with a reminder time and a completion flag.
//!
//! ## Key components
//!
//! - [`GoalStore`] — the authoritative in-memory list with its mutation API
//! - [`PersistQueue`] — last-write-wins background writer for the serialized list
//! - [`GoalEvent`] / [`EventDispatcher`] — notifications for every committed change
//! - [`ConfirmationChannel`] — yes/no prompt required before deleting a goal

pub mod confirm;
pub mod error;
pub mod events;
pub mod goal;
pub mod persist;
pub mod store;

pub use confirm::{AutoConfirm, ConfirmError, ConfirmPrompt, ConfirmationChannel};
pub use error::{GoalError, ValidationError};
pub use events::{EventDispatcher, GoalEvent, LogSink, NotificationSink};
pub use goal::{Goal, SmallGoal, WeeklyGoals, Weekday};
pub use persist::PersistQueue;
pub use store::{DeleteOutcome, GoalStore, GoalSummary, DEFAULT_STORAGE_KEY};
