use anyhow::Result;
use chrono::Utc;
use taskboard_core::{
    storage::KvStore,
    tasks::{normalize_text, Priority, RawTaskId, Task, TaskId},
};
use tracing::{debug, instrument, warn};

use crate::persistence::TaskPersistence;

/// Read-only view of the store handed to change listeners.
#[derive(Debug, Clone, Copy)]
pub struct StoreSnapshot<'a> {
    pub tasks: &'a [Task],
    pub selected: Option<&'a Task>,
}

/// Handle returned by [`TaskStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreSnapshot<'_>) + Send>;

/// Owns the task collection and the selection pointer.
///
/// Every mutation validates its input first; rejected input is a silent no-op
/// reported as `Ok(None)`. Accepted mutations are staged on a copy, written to
/// storage, and only then installed, so a failed write leaves the store exactly
/// as it was and surfaces the error.
pub struct TaskStore<S: KvStore> {
    persistence: TaskPersistence<S>,
    tasks: Vec<Task>,
    selected: Option<TaskId>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl<S: KvStore> TaskStore<S> {
    /// Load the persisted collection and start with nothing selected.
    pub async fn open(store: S) -> Self {
        Self::open_with_clock(store, now_millis).await
    }

    /// Like [`TaskStore::open`], with a custom millisecond clock for id
    /// assignment.
    pub async fn open_with_clock(store: S, clock: fn() -> i64) -> Self {
        let persistence = TaskPersistence::new(store);
        let tasks = persistence.load().await;
        Self {
            persistence,
            tasks,
            selected: None,
            listeners: Vec::new(),
            next_subscription: 0,
            clock,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn snapshot(&self) -> StoreSnapshot<'_> {
        StoreSnapshot {
            tasks: &self.tasks,
            selected: self.selected_task(),
        }
    }

    /// Register a callback run after every applied change, including
    /// selection changes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreSnapshot<'_>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Append a new incomplete task. Rejected when the trimmed text is empty
    /// or no priority was chosen.
    #[instrument(skip(self, text))]
    pub async fn add_task(&mut self, text: &str, priority: Option<Priority>) -> Result<Option<Task>> {
        let (Some(text), Some(priority)) = (normalize_text(text), priority) else {
            debug!("add rejected: empty text or unset priority");
            return Ok(None);
        };

        let Some(id) = self.fresh_id() else {
            warn!("add rejected: task ids exhausted");
            return Ok(None);
        };
        let task = Task::new(id, text, priority);
        let selected = self.selected;
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.install(next, selected).await?;
        debug!(id = %task.id, "task added");
        Ok(Some(task))
    }

    /// Remove every task carrying `id`, clearing the selection if it pointed
    /// at it. Returns the first removed task.
    #[instrument(skip(self))]
    pub async fn delete_task(&mut self, id: TaskId) -> Result<Option<Task>> {
        let Some(removed) = self.get(id).cloned() else {
            debug!("delete ignored: unknown task");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next.retain(|task| task.id != id);
        let selected = self.selected.filter(|selected| *selected != id);
        self.install(next, selected).await?;
        debug!("task deleted");
        Ok(Some(removed))
    }

    /// Replace a task's text with the trimmed `new_text` and clear the
    /// selection.
    #[instrument(skip(self, new_text))]
    pub async fn edit_task(&mut self, id: TaskId, new_text: &str) -> Result<Option<Task>> {
        let Some(text) = normalize_text(new_text) else {
            debug!("edit rejected: empty text");
            return Ok(None);
        };
        self.update(id, None, |task| task.text = text).await
    }

    /// Move a task to another lane and clear the selection. `id` may arrive as
    /// a number or as numeric text.
    #[instrument(skip(self))]
    pub async fn change_priority(
        &mut self,
        id: impl Into<RawTaskId> + std::fmt::Debug,
        priority: Option<Priority>,
    ) -> Result<Option<Task>> {
        let Some(priority) = priority else {
            debug!("priority change rejected: unset priority");
            return Ok(None);
        };
        let Some(id) = id.into().resolve() else {
            debug!("priority change ignored: id is not numeric");
            return Ok(None);
        };
        self.update(id, None, |task| task.priority = priority).await
    }

    /// Flip a task's completion flag. The selection is kept.
    #[instrument(skip(self))]
    pub async fn toggle_complete(&mut self, id: TaskId) -> Result<Option<Task>> {
        let selected = self.selected;
        self.update(id, selected, |task| task.completed = !task.completed)
            .await
    }

    /// Point the selection at a task, or clear it with `None`. Selecting an id
    /// that is not in the collection is ignored. Nothing is persisted.
    #[instrument(skip(self))]
    pub fn set_selected_task(&mut self, id: Option<TaskId>) -> bool {
        if let Some(id) = id {
            if self.position(id).is_none() {
                debug!("selection ignored: unknown task");
                return false;
            }
        }
        self.selected = id;
        self.notify();
        true
    }

    async fn update<F>(
        &mut self,
        id: TaskId,
        selected: Option<TaskId>,
        apply: F,
    ) -> Result<Option<Task>>
    where
        F: FnOnce(&mut Task),
    {
        let Some(index) = self.position(id) else {
            debug!(%id, "update ignored: unknown task");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        apply(&mut next[index]);
        let updated = next[index].clone();
        self.install(next, selected).await?;
        debug!(%id, "task updated");
        Ok(Some(updated))
    }

    async fn install(&mut self, tasks: Vec<Task>, selected: Option<TaskId>) -> Result<()> {
        if let Err(err) = self.persistence.save(&tasks).await {
            warn!("write failed, change discarded: {err:#}");
            return Err(err);
        }
        self.tasks = tasks;
        self.selected = selected;
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        let selected = self
            .selected
            .and_then(|id| self.tasks.iter().find(|task| task.id == id));
        let snapshot = StoreSnapshot {
            tasks: &self.tasks,
            selected,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Creation timestamp, bumped past the newest existing id so ids stay
    /// unique and increasing even when two tasks land in the same millisecond.
    /// `None` once the newest id is `i64::MAX`.
    fn fresh_id(&self) -> Option<TaskId> {
        let now = (self.clock)();
        match self.tasks.iter().map(|task| task.id.0).max() {
            Some(newest) if newest >= now => newest.checked_add(1).map(TaskId),
            _ => Some(TaskId(now)),
        }
    }
}
