use anyhow::Result;
use taskboard_core::{
    events::BoardEvent,
    storage::KvStore,
    tasks::{Priority, Task, TaskId},
    view::{project_board, project_lane, LaneView, ViewConfig},
};
use tracing::{debug, instrument};

use crate::store::TaskStore;

/// A task store paired with the UI-local filter and sort state.
///
/// Front ends feed it [`BoardEvent`]s and read lanes back; they never touch
/// the task collection directly.
pub struct Board<S: KvStore> {
    store: TaskStore<S>,
    view: ViewConfig,
}

impl<S: KvStore> Board<S> {
    pub async fn open(store: S, view: ViewConfig) -> Self {
        Self::from_store(TaskStore::open(store).await, view)
    }

    pub fn from_store(store: TaskStore<S>, view: ViewConfig) -> Self {
        Self { store, view }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn lane(&self, priority: Priority) -> Vec<&Task> {
        project_lane(self.store.tasks(), priority, &self.view)
    }

    pub fn lanes(&self) -> Vec<LaneView<'_>> {
        project_board(self.store.tasks(), &self.view)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.store.selected_id()
    }

    /// Apply one event. Returns whether anything changed; rejected input is
    /// `Ok(false)`, only a failed write is an error.
    #[instrument(skip(self))]
    pub async fn dispatch(&mut self, event: BoardEvent) -> Result<bool> {
        let applied = match event {
            BoardEvent::SubmitTask { text, priority } => {
                self.store.add_task(&text, priority).await?.is_some()
            }
            BoardEvent::ToggleComplete(id) => self.store.toggle_complete(id).await?.is_some(),
            BoardEvent::ClickTask(id) => {
                let next = (self.store.selected_id() != Some(id)).then_some(id);
                self.store.set_selected_task(next)
            }
            BoardEvent::ConfirmEdit { id, text } => {
                self.store.edit_task(id, &text).await?.is_some()
            }
            BoardEvent::ConfirmPriority { id, priority } => {
                self.store.change_priority(id, priority).await?.is_some()
            }
            BoardEvent::Delete(id) => self.store.delete_task(id).await?.is_some(),
            BoardEvent::Drop(task_drop) => match task_drop.target_lane() {
                Some(lane) => self
                    .store
                    .change_priority(task_drop.task_id, Some(lane))
                    .await?
                    .is_some(),
                None => false,
            },
            BoardEvent::ToggleFilter(filter) => {
                self.view.filter.toggle(filter);
                true
            }
            BoardEvent::CycleSort => {
                self.view.sort_by = self.view.sort_by.next();
                true
            }
            BoardEvent::FlipDirection => {
                self.view.sort_direction = self.view.sort_direction.flip();
                true
            }
        };
        debug!(applied, "event handled");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use taskboard_core::{
        events::{LaneSlot, TaskDrop},
        storage::InMemoryStore,
        view::{FilterKind, SortBy, SortDirection},
    };

    use super::*;

    async fn board() -> Board<InMemoryStore> {
        Board::open(InMemoryStore::new(), ViewConfig::default()).await
    }

    async fn submit(board: &mut Board<InMemoryStore>, text: &str, priority: Priority) -> TaskId {
        board
            .dispatch(BoardEvent::SubmitTask {
                text: text.into(),
                priority: Some(priority),
            })
            .await
            .expect("submit");
        board.store().tasks().last().expect("task added").id
    }

    fn slot(lane: Priority, index: usize) -> LaneSlot {
        LaneSlot { lane, index }
    }

    #[tokio::test]
    async fn clicking_the_selected_row_deselects_it() {
        let mut board = board().await;
        let id = submit(&mut board, "Pick me", Priority::High).await;

        board.dispatch(BoardEvent::ClickTask(id)).await.expect("click");
        assert_eq!(board.selected_id(), Some(id));
        board.dispatch(BoardEvent::ClickTask(id)).await.expect("click");
        assert_eq!(board.selected_id(), None);
    }

    #[tokio::test]
    async fn submit_without_priority_is_rejected() {
        let mut board = board().await;
        let applied = board
            .dispatch(BoardEvent::SubmitTask {
                text: "No lane".into(),
                priority: None,
            })
            .await
            .expect("submit");
        assert!(!applied);
        assert!(board.store().tasks().is_empty());
    }

    #[tokio::test]
    async fn drop_into_another_lane_moves_the_task() {
        let mut board = board().await;
        let id = submit(&mut board, "Drag me", Priority::Low).await;

        let applied = board
            .dispatch(BoardEvent::Drop(TaskDrop {
                task_id: id.to_string().into(),
                source: slot(Priority::Low, 0),
                destination: Some(slot(Priority::High, 0)),
            }))
            .await
            .expect("drop");

        assert!(applied);
        assert!(board.lane(Priority::Low).is_empty());
        assert_eq!(board.lane(Priority::High)[0].id, id);
    }

    #[tokio::test]
    async fn drop_in_place_or_outside_changes_nothing() {
        let mut board = board().await;
        let id = submit(&mut board, "Stay", Priority::Medium).await;
        board.dispatch(BoardEvent::ClickTask(id)).await.expect("click");

        for destination in [None, Some(slot(Priority::Medium, 0))] {
            let applied = board
                .dispatch(BoardEvent::Drop(TaskDrop {
                    task_id: id.into(),
                    source: slot(Priority::Medium, 0),
                    destination,
                }))
                .await
                .expect("drop");
            assert!(!applied);
        }
        assert_eq!(board.selected_id(), Some(id));
        assert_eq!(board.store().get(id).expect("task").priority, Priority::Medium);
    }

    #[tokio::test]
    async fn filters_and_sort_controls_reshape_lanes() {
        let mut board = board().await;
        let first = submit(&mut board, "First", Priority::High).await;
        let second = submit(&mut board, "Second", Priority::High).await;
        board
            .dispatch(BoardEvent::ToggleComplete(first))
            .await
            .expect("toggle");

        board
            .dispatch(BoardEvent::ToggleFilter(FilterKind::Completed))
            .await
            .expect("filter");
        let visible: Vec<TaskId> = board.lane(Priority::High).iter().map(|t| t.id).collect();
        assert_eq!(visible, vec![second]);

        board
            .dispatch(BoardEvent::ToggleFilter(FilterKind::Completed))
            .await
            .expect("filter");
        board.dispatch(BoardEvent::CycleSort).await.expect("sort");
        board.dispatch(BoardEvent::FlipDirection).await.expect("direction");
        assert_eq!(board.view().sort_by, SortBy::Date);
        assert_eq!(board.view().sort_direction, SortDirection::Desc);

        let ordered: Vec<TaskId> = board.lane(Priority::High).iter().map(|t| t.id).collect();
        assert_eq!(ordered, vec![second, first]);
    }

    #[tokio::test]
    async fn view_state_is_never_persisted() {
        let backing = InMemoryStore::new();
        let mut board = Board::open(backing.clone(), ViewConfig::default()).await;
        submit(&mut board, "Persisted", Priority::Low).await;
        board.dispatch(BoardEvent::CycleSort).await.expect("sort");

        let reopened = Board::open(backing, ViewConfig::default()).await;
        assert_eq!(reopened.store().tasks().len(), 1);
        assert_eq!(reopened.view(), &ViewConfig::default());
    }

    #[tokio::test]
    async fn edit_priority_and_delete_flow_through_events() {
        let mut board = board().await;
        let id = submit(&mut board, "Draft", Priority::Medium).await;

        board
            .dispatch(BoardEvent::ConfirmEdit {
                id,
                text: "Final".into(),
            })
            .await
            .expect("edit");
        board
            .dispatch(BoardEvent::ConfirmPriority {
                id: id.into(),
                priority: Some(Priority::Low),
            })
            .await
            .expect("priority");
        let task = board.store().get(id).expect("task");
        assert_eq!(task.text, "Final");
        assert_eq!(task.priority, Priority::Low);

        assert!(board.dispatch(BoardEvent::Delete(id)).await.expect("delete"));
        assert!(!board.dispatch(BoardEvent::Delete(id)).await.expect("delete"));
        assert!(board.lanes().iter().all(|lane| lane.tasks.is_empty()));
    }
}
