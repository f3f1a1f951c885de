// store.rs — GoalStore: the authoritative in-memory goal list.
//
// The whole list is persisted as one JSON array under a single key. The
// store reads that blob once (`load`) and afterwards treats memory as the
// source of truth: each mutation updates memory immediately, publishes the
// new snapshot to subscribers, dispatches an event, and queues the full
// serialized list on the PersistQueue without waiting for the write.
//
// Snapshots are `Arc<Vec<Goal>>`. Mutations go through `Arc::make_mut`, so a
// snapshot someone is holding is never modified underneath them.
//
// Unknown ids and out-of-range indexes are no-ops, reported only through
// the return value.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gt_storage::KeyValueStore;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::confirm::{ConfirmPrompt, ConfirmationChannel};
use crate::error::GoalError;
use crate::events::{EventDispatcher, GoalEvent, NotificationSink};
use crate::goal::{new_id, validate_title, Goal, SmallGoal, WeeklyGoals, Weekday};
use crate::persist::PersistQueue;

/// Storage key used when the caller doesn't pick one.
pub const DEFAULT_STORAGE_KEY: &str = "goals";

/// Counts shown in the header of the goal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalSummary {
    pub active: usize,
    pub completed: usize,
}

/// Result of [`GoalStore::delete`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The goal was removed; here it is.
    Deleted(Goal),
    /// The user declined (or the prompt could not be shown).
    Cancelled,
    /// No goal has that id; nobody was asked.
    NotFound,
}

/// Owns the goal list and keeps storage in step with it.
pub struct GoalStore {
    goals: Arc<Vec<Goal>>,
    storage: Arc<dyn KeyValueStore>,
    queue: PersistQueue,
    snapshots: watch::Sender<Arc<Vec<Goal>>>,
    dispatcher: EventDispatcher,
}

impl GoalStore {
    /// Create an empty store persisting under `key`.
    ///
    /// The persistence writer runs on `runtime`; the store itself can be
    /// built and mutated from any thread. Call [`GoalStore::load`] to read
    /// existing goals.
    pub fn new(
        runtime: &Handle,
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        let goals = Arc::new(Vec::new());
        let (snapshots, _) = watch::channel(Arc::clone(&goals));
        let queue = PersistQueue::spawn(runtime, Arc::clone(&storage), key);
        Self {
            goals,
            storage,
            queue,
            snapshots,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Add a sink that receives every [`GoalEvent`].
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.dispatcher.add_sink(sink);
    }

    /// Replace the in-memory list with what storage holds.
    ///
    /// Never fails: a missing blob yields an empty list, and so does any
    /// read or decode error (logged at warn). Returns the number of goals
    /// loaded.
    pub fn load(&mut self) -> usize {
        let key = self.queue.key().to_string();
        let goals = match self.storage.get(&key) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Goal>>(&blob) {
                Ok(goals) => goals,
                Err(e) => {
                    tracing::warn!(key = %key, "stored goals are unreadable, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, "failed to read stored goals, starting empty: {}", e);
                Vec::new()
            }
        };

        let goals = dedupe_ids(goals);
        let count = goals.len();
        self.goals = Arc::new(goals);
        self.snapshots.send_replace(Arc::clone(&self.goals));
        self.dispatcher.dispatch(&GoalEvent::GoalsLoaded {
            count,
            timestamp: Utc::now(),
        });
        tracing::info!(key = %key, count, "loaded goals");
        count
    }

    /// The current list. Cheap to clone, never mutated after it's handed out.
    pub fn snapshot(&self) -> Arc<Vec<Goal>> {
        Arc::clone(&self.goals)
    }

    /// Receive every committed snapshot, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Goal>>> {
        self.snapshots.subscribe()
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn summary(&self) -> GoalSummary {
        let completed = self.goals.iter().filter(|g| g.completed).count();
        GoalSummary {
            active: self.goals.len() - completed,
            completed,
        }
    }

    /// Create a goal and append it to the list.
    pub fn create(&mut self, title: &str, weekly_goals: WeeklyGoals) -> Result<Goal, GoalError> {
        let mut goal = Goal::new(title, weekly_goals)?;
        while self.get(&goal.id).is_some() {
            goal.id = new_id();
        }

        Arc::make_mut(&mut self.goals).push(goal.clone());
        tracing::debug!(goal_id = %goal.id, "created goal");
        self.commit(GoalEvent::GoalCreated {
            goal_id: goal.id.clone(),
            title: goal.title.clone(),
            timestamp: Utc::now(),
        });
        Ok(goal)
    }

    /// Replace the goal with the same id. Returns `false` if there is none.
    ///
    /// The title is trimmed and validated like on creation. Repeated
    /// small-goal ids in the replacement are given fresh ones.
    pub fn update(&mut self, mut goal: Goal) -> Result<bool, GoalError> {
        goal.title = validate_title(&goal.title)?;
        let Some(index) = self.position(&goal.id) else {
            return Ok(false);
        };

        let replaced = goal.weekly_goals.dedupe_ids();
        if replaced > 0 {
            tracing::warn!(goal_id = %goal.id, replaced, "duplicate small goal ids reassigned");
        }

        let goal_id = goal.id.clone();
        Arc::make_mut(&mut self.goals)[index] = goal;
        self.commit(GoalEvent::GoalUpdated {
            goal_id,
            timestamp: Utc::now(),
        });
        Ok(true)
    }

    /// Flip a goal's completion flag. Returns the new value.
    pub fn toggle_completion(&mut self, id: &str) -> Option<bool> {
        let index = self.position(id)?;
        let goal = &mut Arc::make_mut(&mut self.goals)[index];
        goal.completed = !goal.completed;
        let completed = goal.completed;

        self.commit(GoalEvent::GoalCompletionToggled {
            goal_id: id.to_string(),
            completed,
            timestamp: Utc::now(),
        });
        Some(completed)
    }

    /// Flip the completion flag of one small goal. Returns the new value.
    pub fn toggle_small_goal_completion(
        &mut self,
        goal_id: &str,
        day: Weekday,
        index: usize,
    ) -> Option<bool> {
        let goal_index = self.position(goal_id)?;
        if index >= self.goals[goal_index].weekly_goals.count(day) {
            return None;
        }

        let goals = Arc::make_mut(&mut self.goals);
        let small_goal = &mut goals[goal_index].weekly_goals.day_mut(day)[index];
        small_goal.completed = !small_goal.completed;
        let completed = small_goal.completed;

        self.commit(GoalEvent::SmallGoalToggled {
            goal_id: goal_id.to_string(),
            weekday: day,
            index,
            completed,
            timestamp: Utc::now(),
        });
        Some(completed)
    }

    /// Remove a goal after the user confirms through `confirm`.
    ///
    /// A channel error is treated as "no".
    pub fn delete(&mut self, id: &str, confirm: &dyn ConfirmationChannel) -> DeleteOutcome {
        let Some(index) = self.position(id) else {
            return DeleteOutcome::NotFound;
        };

        match confirm.confirm(&ConfirmPrompt::delete_goal()) {
            Ok(true) => {}
            Ok(false) => return DeleteOutcome::Cancelled,
            Err(e) => {
                tracing::warn!(goal_id = %id, "delete confirmation failed: {}", e);
                return DeleteOutcome::Cancelled;
            }
        }

        let removed = Arc::make_mut(&mut self.goals).remove(index);
        self.commit(GoalEvent::GoalDeleted {
            goal_id: removed.id.clone(),
            title: removed.title.clone(),
            timestamp: Utc::now(),
        });
        DeleteOutcome::Deleted(removed)
    }

    /// Append a small goal to `day` of the goal with `goal_id`.
    ///
    /// Returns `Ok(None)` if the goal doesn't exist. Blank text is rejected
    /// before anything changes.
    pub fn add_small_goal(
        &mut self,
        goal_id: &str,
        day: Weekday,
        text: &str,
        reminder_time: DateTime<Utc>,
    ) -> Result<Option<SmallGoal>, GoalError> {
        let mut small_goal = SmallGoal::new(text, reminder_time)?;
        let Some(goal_index) = self.position(goal_id) else {
            return Ok(None);
        };

        let weekly = &self.goals[goal_index].weekly_goals;
        while weekly.contains_id(&small_goal.id) {
            small_goal.id = new_id();
        }

        Arc::make_mut(&mut self.goals)[goal_index]
            .weekly_goals
            .push(day, small_goal.clone());
        self.commit(GoalEvent::SmallGoalAdded {
            goal_id: goal_id.to_string(),
            weekday: day,
            small_goal_id: small_goal.id.clone(),
            reminder_time,
            timestamp: Utc::now(),
        });
        Ok(Some(small_goal))
    }

    /// Remove the small goal at `index` of `day`. Returns what was removed.
    pub fn remove_small_goal(
        &mut self,
        goal_id: &str,
        day: Weekday,
        index: usize,
    ) -> Option<SmallGoal> {
        let goal_index = self.position(goal_id)?;
        if index >= self.goals[goal_index].weekly_goals.count(day) {
            return None;
        }

        let removed = Arc::make_mut(&mut self.goals)[goal_index]
            .weekly_goals
            .day_mut(day)
            .remove(index);
        self.commit(GoalEvent::SmallGoalRemoved {
            goal_id: goal_id.to_string(),
            weekday: day,
            small_goal_id: removed.id.clone(),
            timestamp: Utc::now(),
        });
        Some(removed)
    }

    /// Wait for every queued write to reach storage (or fail).
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    #[cfg(test)]
    pub(crate) fn persist_queue(&self) -> &PersistQueue {
        &self.queue
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.goals.iter().position(|g| g.id == id)
    }

    /// Publish, notify, and queue the current list for persistence.
    fn commit(&self, event: GoalEvent) {
        self.snapshots.send_replace(Arc::clone(&self.goals));

        match serde_json::to_string(&*self.goals) {
            Ok(payload) => {
                self.queue.enqueue(payload);
            }
            Err(e) => tracing::warn!("failed to serialize goals, not persisted: {}", e),
        }

        self.dispatcher.dispatch(&event);
    }
}

/// Give every goal after the first with a given id a fresh one, and do
/// the same for small goals within each goal.
fn dedupe_ids(mut goals: Vec<Goal>) -> Vec<Goal> {
    let mut seen = HashSet::new();
    for goal in &mut goals {
        if !seen.insert(goal.id.clone()) {
            let old = std::mem::replace(&mut goal.id, new_id());
            while !seen.insert(goal.id.clone()) {
                goal.id = new_id();
            }
            tracing::warn!(old_id = %old, new_id = %goal.id, "duplicate goal id reassigned");
        }

        let replaced = goal.weekly_goals.dedupe_ids();
        if replaced > 0 {
            tracing::warn!(goal_id = %goal.id, replaced, "duplicate small goal ids reassigned");
        }
    }
    goals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AutoConfirm, ConfirmError};
    use crate::error::ValidationError;
    use crate::events::LogSink;
    use chrono::TimeZone;
    use gt_storage::{MemoryStore, StorageError};

    fn six_thirty() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 6, 30, 0).unwrap()
    }

    fn new_store() -> (Arc<MemoryStore>, GoalStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = GoalStore::new(&Handle::current(), storage.clone(), DEFAULT_STORAGE_KEY);
        (storage, store)
    }

    struct ClosedChannel;

    impl ConfirmationChannel for ClosedChannel {
        fn confirm(&self, _prompt: &ConfirmPrompt) -> Result<bool, ConfirmError> {
            Err(ConfirmError::ChannelClosed)
        }
    }

    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("disk on fire".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    /// Reads fine, rejects every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("read-only volume".into()))
        }
    }

    #[tokio::test]
    async fn load_with_nothing_stored_is_empty() {
        let (_, mut store) = new_store();
        assert_eq!(store.load(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn load_falls_back_to_empty_on_corrupt_blob() {
        let (storage, mut store) = new_store();
        storage.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        assert_eq!(store.load(), 0);
    }

    #[tokio::test]
    async fn load_falls_back_to_empty_on_read_error() {
        let mut store =
            GoalStore::new(&Handle::current(), Arc::new(UnreadableStore), DEFAULT_STORAGE_KEY);
        assert_eq!(store.load(), 0);
    }

    #[tokio::test]
    async fn load_reassigns_duplicate_ids() {
        let (storage, mut store) = new_store();
        storage
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"1","title":"A"},{"id":"1","title":"B"},{"id":"2","title":"C"}]"#,
            )
            .unwrap();

        assert_eq!(store.load(), 3);
        let ids: HashSet<_> = store.goals().iter().map(|g| g.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(store.goals()[0].id, "1");
        assert_eq!(store.goals()[2].id, "2");
    }

    #[tokio::test]
    async fn load_reassigns_duplicate_small_goal_ids() {
        let (storage, mut store) = new_store();
        storage
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"g","title":"Run","weeklyGoals":{"Monday":[
                    {"id":"17","text":"5km","reminderTime":"2025-03-03T06:30:00Z"},
                    {"id":"17","text":"10km","reminderTime":"2025-03-03T06:30:00Z"}
                ]}}]"#,
            )
            .unwrap();

        assert_eq!(store.load(), 1);
        let monday = store.get("g").unwrap().weekly_goals.day(Weekday::Monday);
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].id, "17");
        assert_ne!(monday[1].id, "17");
        assert_eq!(monday[1].text, "10km");
    }

    #[tokio::test]
    async fn update_reassigns_duplicate_small_goal_ids() {
        let (_, mut store) = new_store();
        let mut goal = store.create("Swim", WeeklyGoals::new()).unwrap();
        let small_goal = SmallGoal::new("Laps", six_thirty()).unwrap();
        goal.weekly_goals.push(Weekday::Tuesday, small_goal.clone());
        goal.weekly_goals.push(Weekday::Saturday, small_goal.clone());

        assert!(store.update(goal.clone()).unwrap());
        let weekly = &store.get(&goal.id).unwrap().weekly_goals;
        assert_eq!(weekly.day(Weekday::Tuesday)[0].id, small_goal.id);
        assert_ne!(weekly.day(Weekday::Saturday)[0].id, small_goal.id);
    }

    #[tokio::test]
    async fn failed_writes_do_not_undo_mutations() {
        let storage = Arc::new(ReadOnlyStore);
        let mut store = GoalStore::new(&Handle::current(), storage, DEFAULT_STORAGE_KEY);
        store.load();

        let goal = store.create("Unsaved", WeeklyGoals::new()).unwrap();
        assert_eq!(store.toggle_completion(&goal.id), Some(true));
        store.flush().await;

        assert_eq!(store.len(), 1);
        assert!(store.get(&goal.id).unwrap().completed);
        assert_eq!(store.persist_queue().queued_generation(), 2);
    }

    #[test]
    fn store_can_be_driven_from_outside_the_runtime() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let storage = Arc::new(MemoryStore::new());
        let mut store = GoalStore::new(runtime.handle(), storage.clone(), DEFAULT_STORAGE_KEY);

        store.load();
        store.create("Sync caller", WeeklyGoals::new()).unwrap();
        runtime.block_on(store.flush());

        let blob = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(blob.contains("Sync caller"));
    }

    #[tokio::test]
    async fn create_appends_and_persists() {
        let (storage, mut store) = new_store();
        let first = store.create("First", WeeklyGoals::new()).unwrap();
        let second = store.create("Second", WeeklyGoals::new()).unwrap();
        store.flush().await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.goals()[0].id, first.id);
        assert_eq!(store.goals()[1].id, second.id);

        let blob = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let persisted: Vec<Goal> = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted, *store.snapshot());
    }

    #[tokio::test]
    async fn create_rejects_blank_title_without_mutating() {
        let (_, mut store) = new_store();
        let result = store.create("   ", WeeklyGoals::new());
        assert!(matches!(
            result,
            Err(GoalError::Validation(ValidationError::EmptyTitle))
        ));
        assert!(store.is_empty());
        assert_eq!(store.persist_queue().queued_generation(), 0);
    }

    #[tokio::test]
    async fn update_replaces_matching_goal() {
        let (_, mut store) = new_store();
        let mut goal = store.create("Draft", WeeklyGoals::new()).unwrap();
        goal.title = "  Final ".to_string();
        goal.weekly_goals
            .push(Weekday::Friday, SmallGoal::new("Review", six_thirty()).unwrap());

        assert!(store.update(goal.clone()).unwrap());
        let stored = store.get(&goal.id).unwrap();
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.weekly_goals.count(Weekday::Friday), 1);
    }

    #[tokio::test]
    async fn update_unknown_goal_is_noop() {
        let (_, mut store) = new_store();
        store.create("Kept", WeeklyGoals::new()).unwrap();
        let stranger = Goal::new("Stranger", WeeklyGoals::new()).unwrap();

        let before = store.persist_queue().queued_generation();
        assert!(!store.update(stranger).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.persist_queue().queued_generation(), before);
    }

    #[tokio::test]
    async fn update_rejects_blank_title() {
        let (_, mut store) = new_store();
        let mut goal = store.create("Named", WeeklyGoals::new()).unwrap();
        goal.title = String::new();
        assert!(store.update(goal.clone()).is_err());
        assert_eq!(store.get(&goal.id).unwrap().title, "Named");
    }

    #[tokio::test]
    async fn toggle_completion_twice_restores_flag() {
        let (_, mut store) = new_store();
        let goal = store.create("Toggle me", WeeklyGoals::new()).unwrap();

        assert_eq!(store.toggle_completion(&goal.id), Some(true));
        assert_eq!(store.summary(), GoalSummary { active: 0, completed: 1 });
        assert_eq!(store.toggle_completion(&goal.id), Some(false));
        assert!(!store.get(&goal.id).unwrap().completed);
        assert_eq!(store.toggle_completion("missing"), None);
    }

    #[tokio::test]
    async fn toggle_small_goal_out_of_range_is_noop() {
        let (_, mut store) = new_store();
        let goal = store.create("Run", WeeklyGoals::new()).unwrap();
        store
            .add_small_goal(&goal.id, Weekday::Monday, "5km", six_thirty())
            .unwrap();

        assert_eq!(store.toggle_small_goal_completion(&goal.id, Weekday::Monday, 1), None);
        assert_eq!(store.toggle_small_goal_completion(&goal.id, Weekday::Tuesday, 0), None);
        assert_eq!(store.toggle_small_goal_completion("missing", Weekday::Monday, 0), None);
        assert_eq!(
            store.toggle_small_goal_completion(&goal.id, Weekday::Monday, 0),
            Some(true)
        );
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let (_, mut store) = new_store();
        let keep = store.create("Keep", WeeklyGoals::new()).unwrap();
        let doomed = store.create("Doomed", WeeklyGoals::new()).unwrap();

        assert_eq!(store.delete(&doomed.id, &AutoConfirm::no()), DeleteOutcome::Cancelled);
        assert_eq!(store.delete(&doomed.id, &ClosedChannel), DeleteOutcome::Cancelled);
        assert_eq!(store.len(), 2);

        match store.delete(&doomed.id, &AutoConfirm::yes()) {
            DeleteOutcome::Deleted(g) => assert_eq!(g.id, doomed.id),
            other => panic!("expected Deleted, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.goals()[0].id, keep.id);
        assert_eq!(store.delete(&doomed.id, &AutoConfirm::yes()), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn add_small_goal_validates_text() {
        let (_, mut store) = new_store();
        let goal = store.create("Run", WeeklyGoals::new()).unwrap();

        let result = store.add_small_goal(&goal.id, Weekday::Monday, " ", six_thirty());
        assert!(matches!(
            result,
            Err(GoalError::Validation(ValidationError::EmptySmallGoalText))
        ));
        assert_eq!(store.get(&goal.id).unwrap().weekly_goals.total(), 0);
    }

    #[tokio::test]
    async fn add_small_goal_to_unknown_goal_is_noop() {
        let (_, mut store) = new_store();
        let added = store
            .add_small_goal("missing", Weekday::Monday, "5km", six_thirty())
            .unwrap();
        assert!(added.is_none());
    }

    #[tokio::test]
    async fn remove_small_goal_returns_removed_entry() {
        let (_, mut store) = new_store();
        let goal = store.create("Run", WeeklyGoals::new()).unwrap();
        let first = store
            .add_small_goal(&goal.id, Weekday::Sunday, "Rest", six_thirty())
            .unwrap()
            .unwrap();
        store
            .add_small_goal(&goal.id, Weekday::Sunday, "Stretch", six_thirty())
            .unwrap();

        let removed = store.remove_small_goal(&goal.id, Weekday::Sunday, 0).unwrap();
        assert_eq!(removed.id, first.id);
        let sunday = store.get(&goal.id).unwrap().weekly_goals.day(Weekday::Sunday);
        assert_eq!(sunday.len(), 1);
        assert_eq!(sunday[0].text, "Stretch");
        assert!(store.remove_small_goal(&goal.id, Weekday::Sunday, 5).is_none());
    }

    #[tokio::test]
    async fn held_snapshot_is_not_mutated() {
        let (_, mut store) = new_store();
        let goal = store.create("Stable", WeeklyGoals::new()).unwrap();
        let before = store.snapshot();

        store.toggle_completion(&goal.id);

        assert!(!before[0].completed);
        assert!(store.snapshot()[0].completed);
    }

    #[tokio::test]
    async fn subscribers_see_each_commit() {
        let (_, mut store) = new_store();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        store.create("Watched", WeeklyGoals::new()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[tokio::test]
    async fn events_are_dispatched_to_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let (_, mut store) = new_store();
        store.add_sink(Box::new(LogSink::new(&path)));

        store.load();
        let goal = store.create("Logged", WeeklyGoals::new()).unwrap();
        store.toggle_completion(&goal.id);

        let log = std::fs::read_to_string(&path).unwrap();
        let types: Vec<String> = log
            .lines()
            .map(|l| serde_json::from_str::<GoalEvent>(l).unwrap().event_type().to_string())
            .collect();
        assert_eq!(
            types,
            vec!["goals_loaded", "goal_created", "goal_completion_toggled"]
        );
    }
}
