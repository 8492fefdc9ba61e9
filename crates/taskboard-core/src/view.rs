//! Lane projection: which tasks a lane shows, and in what order.
//!
//! Everything here is pure. Projections borrow from the task slice they are
//! given and never reorder or mutate it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::tasks::{Priority, Task};

/// Completion-status filter. Both flags on shows everything, both off shows
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    pub show_completed: bool,
    pub show_incomplete: bool,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self {
            show_completed: true,
            show_incomplete: true,
        }
    }
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        (task.completed && self.show_completed) || (!task.completed && self.show_incomplete)
    }

    pub fn toggle(&mut self, filter: FilterKind) {
        match filter {
            FilterKind::Completed => self.show_completed = !self.show_completed,
            FilterKind::Incomplete => self.show_incomplete = !self.show_incomplete,
        }
    }
}

/// Names one of the two filter checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Completed,
    Incomplete,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Priority,
    Date,
    Status,
}

impl SortBy {
    /// Next key in the cycle priority → date → status → priority.
    pub fn next(self) -> SortBy {
        match self {
            SortBy::Priority => SortBy::Date,
            SortBy::Date => SortBy::Status,
            SortBy::Status => SortBy::Priority,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Priority => "priority",
            SortBy::Date => "date",
            SortBy::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// UI-local filter and sort state. Never persisted by the task store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub filter: StatusFilter,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
}

/// Tasks shown in lane `level`, filtered by completion status and ordered by
/// the configured key. Ties keep their order from `tasks`.
///
/// Sorting by priority inside a single lane compares equal ranks, so it leaves
/// the collection order untouched in either direction.
pub fn project_lane<'a>(tasks: &'a [Task], level: Priority, view: &ViewConfig) -> Vec<&'a Task> {
    let mut lane: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.priority == level)
        .filter(|task| view.filter.matches(task))
        .collect();

    // slice::sort_by is stable, which the tie rule relies on.
    lane.sort_by(|a, b| view.sort_direction.apply(compare(a, b, view.sort_by)));
    lane
}

fn compare(a: &Task, b: &Task, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => a.id.cmp(&b.id),
        SortBy::Status => a.completed.cmp(&b.completed),
        SortBy::Priority => a.priority.rank().cmp(&b.priority.rank()),
    }
}

/// One lane's projection, tagged with its priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneView<'a> {
    pub priority: Priority,
    pub tasks: Vec<&'a Task>,
}

/// Projections for all three lanes in display order (High, Medium, Low).
pub fn project_board<'a>(tasks: &'a [Task], view: &ViewConfig) -> Vec<LaneView<'a>> {
    Priority::ALL
        .iter()
        .map(|&priority| LaneView {
            priority,
            tasks: project_lane(tasks, priority, view),
        })
        .collect()
}
