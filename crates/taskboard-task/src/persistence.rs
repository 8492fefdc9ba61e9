use std::sync::Arc;

use anyhow::{Context, Result};
use taskboard_core::{
    storage::{KvStore, KvStoreError},
    tasks::{normalize_text, Task},
};
use tracing::{debug, instrument, warn};

/// Key the whole task collection lives under.
pub const TASKS_KEY: &str = "tasks";

/// Reads and writes the full task collection as one JSON array.
pub struct TaskPersistence<S: KvStore> {
    store: Arc<S>,
}

impl<S: KvStore> TaskPersistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Stored collection, or empty when nothing usable is stored. Never fails:
    /// a missing key, unreadable storage and malformed JSON all load as empty.
    /// Records with blank text are skipped and the rest come back trimmed.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Vec<Task> {
        let bytes = match self.store.get(TASKS_KEY).await {
            Ok(bytes) => bytes,
            Err(KvStoreError::NotFound { .. }) => {
                debug!("no stored tasks, starting empty");
                return Vec::new();
            }
            Err(err) => {
                warn!(error = %err, "could not read stored tasks, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Task>>(&bytes) {
            Ok(stored) => {
                let total = stored.len();
                let tasks: Vec<Task> = stored
                    .into_iter()
                    .filter_map(|mut task| {
                        task.text = normalize_text(&task.text)?;
                        Some(task)
                    })
                    .collect();
                if tasks.len() < total {
                    warn!(
                        skipped = total - tasks.len(),
                        "stored tasks with blank text were skipped"
                    );
                }
                debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                warn!(error = %err, "stored tasks are malformed, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection.
    #[instrument(skip_all, fields(count = tasks.len()))]
    pub async fn save(&self, tasks: &[Task]) -> Result<()> {
        let bytes = serde_json::to_vec(tasks).context("serialize tasks")?;
        self.store
            .put(TASKS_KEY, &bytes)
            .await
            .with_context(|| format!("write `{TASKS_KEY}` to storage"))
    }
}

#[cfg(test)]
mod tests {
    use taskboard_core::{
        storage::InMemoryStore,
        tasks::{Priority, TaskId},
    };

    use super::*;

    #[tokio::test]
    async fn missing_key_loads_empty() {
        let persistence = TaskPersistence::new(InMemoryStore::new());
        assert!(persistence.load().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_or_non_array_values_load_empty() {
        for raw in ["not json", r#"{"id":1}"#, "42", "null", r#"[{"id":"x"}]"#] {
            let persistence = TaskPersistence::new(InMemoryStore::with_entry(TASKS_KEY, raw));
            assert!(persistence.load().await.is_empty(), "input: {raw}");
        }
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_and_fields() {
        let store = InMemoryStore::new();
        let persistence = TaskPersistence::new(store.clone());
        let mut done = Task::new(TaskId(2), "Ship", Priority::High);
        done.completed = true;
        let tasks = vec![
            Task::new(TaskId(3), "Write docs", Priority::Low),
            done,
            Task::new(TaskId(1), "Plan", Priority::Medium),
        ];

        persistence.save(&tasks).await.expect("save");
        let loaded = persistence.load().await;
        assert_eq!(loaded, tasks);

        persistence.save(&loaded).await.expect("save again");
        assert_eq!(persistence.load().await, tasks);
    }

    #[tokio::test]
    async fn blank_text_records_are_skipped_and_text_trimmed() {
        let raw = r#"[
            {"id":1,"text":"   ","priority":"Low","completed":false},
            {"id":2,"text":" Keep ","priority":"High","completed":false},
            {"id":3,"text":"","priority":"Medium","completed":true}
        ]"#;
        let store = InMemoryStore::with_entry(TASKS_KEY, raw);
        let persistence = TaskPersistence::new(store.clone());

        let loaded = persistence.load().await;
        assert_eq!(loaded, vec![Task::new(TaskId(2), "Keep", Priority::High)]);

        persistence.save(&loaded).await.expect("save");
        let written = store.get(TASKS_KEY).await.expect("stored");
        let reread: Vec<Task> = serde_json::from_slice(&written).expect("json");
        assert!(reread.iter().all(|task| !task.text.trim().is_empty()));
    }

    #[tokio::test]
    async fn reads_the_documented_layout() {
        let raw = r#"[{"id":1700000000000,"text":"Buy milk","priority":"Low","completed":true}]"#;
        let persistence = TaskPersistence::new(InMemoryStore::with_entry(TASKS_KEY, raw));

        let loaded = persistence.load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, TaskId(1700000000000));
        assert_eq!(loaded[0].priority, Priority::Low);
        assert!(loaded[0].completed);
    }
}
