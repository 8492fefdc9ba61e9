//! Intents raised by whatever front end drives the board.
//!
//! Gesture libraries and dialogs stay outside the core: they only have to
//! produce one of these values.

use crate::{
    tasks::{Priority, RawTaskId, TaskId},
    view::FilterKind,
};

/// Position of a task inside a rendered lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSlot {
    pub lane: Priority,
    pub index: usize,
}

/// Result of a drag gesture. `destination` is `None` when the task was
/// dropped outside every lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDrop {
    pub task_id: RawTaskId,
    pub source: LaneSlot,
    pub destination: Option<LaneSlot>,
}

impl TaskDrop {
    /// Lane the task should move to, or `None` when the drop changes nothing.
    pub fn target_lane(&self) -> Option<Priority> {
        let destination = self.destination?;
        if destination == self.source {
            return None;
        }
        Some(destination.lane)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// New-task form submitted. `priority` is `None` while the picker still
    /// shows its placeholder.
    SubmitTask {
        text: String,
        priority: Option<Priority>,
    },
    /// Completion checkbox clicked.
    ToggleComplete(TaskId),
    /// Task row clicked; clicking the selected row again deselects it.
    ClickTask(TaskId),
    /// Edit dialog confirmed.
    ConfirmEdit { id: TaskId, text: String },
    /// Priority dialog confirmed.
    ConfirmPriority { id: RawTaskId, priority: Option<Priority> },
    /// Delete button clicked.
    Delete(TaskId),
    /// Drag gesture finished.
    Drop(TaskDrop),
    /// Filter checkbox toggled.
    ToggleFilter(FilterKind),
    /// Sort-cycle control clicked.
    CycleSort,
    /// Sort-direction control clicked.
    FlipDirection,
}
