use crossterm::event::KeyCode;
use taskboard_core::{
    events::{BoardEvent, LaneSlot, TaskDrop},
    tasks::{Priority, TaskId},
    view::{FilterKind, LaneView},
};

/// What the keyboard is currently feeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing the text of a new task.
    Adding { text: String },
    /// New task text entered, waiting for a lane.
    PickingNewPriority { text: String },
    /// Edit dialog for an existing task.
    Editing { id: TaskId, text: String },
    /// Priority dialog for an existing task.
    PickingPriority { id: TaskId },
}

/// Cursor, focus and input state of the board screen. Holds no task data:
/// every key is decoded against the lanes as currently rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub focus: usize,
    pub cursors: [usize; 3],
    pub mode: Mode,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            focus: 0,
            cursors: [0; 3],
            mode: Mode::Normal,
            status: None,
            should_quit: false,
        }
    }
}

impl App {
    pub fn focused_lane(&self) -> Priority {
        Priority::ALL[self.focus]
    }

    /// Keep each cursor inside its lane after the lanes changed.
    pub fn clamp(&mut self, lanes: &[LaneView<'_>]) {
        for (cursor, lane) in self.cursors.iter_mut().zip(lanes) {
            *cursor = (*cursor).min(lane.tasks.len().saturating_sub(1));
        }
    }

    /// Decode one key press. Returns the board event it raises, if any; pure
    /// navigation and text entry only update `self`.
    pub fn handle_key(&mut self, code: KeyCode, lanes: &[LaneView<'_>]) -> Option<BoardEvent> {
        self.status = None;
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.normal_key(code, lanes),
            Mode::Adding { text } => self.text_key(
                code,
                text,
                |text| Mode::Adding { text },
                |text| (Mode::PickingNewPriority { text }, None),
            ),
            Mode::PickingNewPriority { text } => match code {
                KeyCode::Esc => None,
                // Confirming without a lane mirrors submitting with the
                // placeholder still selected.
                KeyCode::Enter => Some(BoardEvent::SubmitTask {
                    text,
                    priority: None,
                }),
                code => match lane_key(code) {
                    Some(priority) => Some(BoardEvent::SubmitTask {
                        text,
                        priority: Some(priority),
                    }),
                    None => {
                        self.mode = Mode::PickingNewPriority { text };
                        None
                    }
                },
            },
            Mode::Editing { id, text } => self.text_key(
                code,
                text,
                move |text| Mode::Editing { id, text },
                move |text| (Mode::Normal, Some(BoardEvent::ConfirmEdit { id, text })),
            ),
            Mode::PickingPriority { id } => match code {
                KeyCode::Esc => None,
                code => match lane_key(code) {
                    Some(priority) => Some(BoardEvent::ConfirmPriority {
                        id: id.into(),
                        priority: Some(priority),
                    }),
                    None => {
                        self.mode = Mode::PickingPriority { id };
                        None
                    }
                },
            },
        }
    }

    fn normal_key(&mut self, code: KeyCode, lanes: &[LaneView<'_>]) -> Option<BoardEvent> {
        let current = self.current_task(lanes);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.focus = (self.focus + 2) % 3;
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.focus = (self.focus + 1) % 3;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = lanes.get(self.focus).map_or(0, |lane| lane.tasks.len());
                let cursor = &mut self.cursors[self.focus];
                if *cursor + 1 < len {
                    *cursor += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let cursor = &mut self.cursors[self.focus];
                *cursor = cursor.saturating_sub(1);
                None
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Adding {
                    text: String::new(),
                };
                None
            }
            KeyCode::Char('c') => Some(BoardEvent::ToggleFilter(FilterKind::Completed)),
            KeyCode::Char('i') => Some(BoardEvent::ToggleFilter(FilterKind::Incomplete)),
            KeyCode::Char('s') => Some(BoardEvent::CycleSort),
            KeyCode::Char('r') => Some(BoardEvent::FlipDirection),
            KeyCode::Enter => current.map(|(id, _)| BoardEvent::ClickTask(id)),
            KeyCode::Char(' ') => current.map(|(id, _)| BoardEvent::ToggleComplete(id)),
            KeyCode::Char('d') => current.map(|(id, _)| BoardEvent::Delete(id)),
            KeyCode::Char('e') => {
                if let Some((id, text)) = current {
                    self.mode = Mode::Editing { id, text };
                }
                None
            }
            KeyCode::Char('p') => {
                if let Some((id, _)) = current {
                    self.mode = Mode::PickingPriority { id };
                }
                None
            }
            KeyCode::Char('H') => self.drop_into(Priority::High, current, lanes),
            KeyCode::Char('M') => self.drop_into(Priority::Medium, current, lanes),
            KeyCode::Char('L') => self.drop_into(Priority::Low, current, lanes),
            _ => None,
        }
    }

    /// Keyboard stand-in for dragging the cursor task onto the end of
    /// another lane.
    fn drop_into(
        &self,
        target: Priority,
        current: Option<(TaskId, String)>,
        lanes: &[LaneView<'_>],
    ) -> Option<BoardEvent> {
        let (id, _) = current?;
        let source = LaneSlot {
            lane: self.focused_lane(),
            index: self.cursors[self.focus],
        };
        let destination = if target == source.lane {
            source
        } else {
            let len = lanes
                .iter()
                .find(|lane| lane.priority == target)
                .map_or(0, |lane| lane.tasks.len());
            LaneSlot {
                lane: target,
                index: len,
            }
        };
        Some(BoardEvent::Drop(TaskDrop {
            task_id: id.to_string().into(),
            source,
            destination: Some(destination),
        }))
    }

    fn text_key(
        &mut self,
        code: KeyCode,
        mut text: String,
        keep: impl FnOnce(String) -> Mode,
        submit: impl FnOnce(String) -> (Mode, Option<BoardEvent>),
    ) -> Option<BoardEvent> {
        match code {
            KeyCode::Esc => None,
            KeyCode::Enter => {
                let (mode, event) = submit(text);
                self.mode = mode;
                event
            }
            KeyCode::Backspace => {
                text.pop();
                self.mode = keep(text);
                None
            }
            KeyCode::Char(c) => {
                text.push(c);
                self.mode = keep(text);
                None
            }
            _ => {
                self.mode = keep(text);
                None
            }
        }
    }

    fn current_task(&self, lanes: &[LaneView<'_>]) -> Option<(TaskId, String)> {
        let lane = lanes.get(self.focus)?;
        let task = lane.tasks.get(self.cursors[self.focus])?;
        Some((task.id, task.text.clone()))
    }
}

fn lane_key(code: KeyCode) -> Option<Priority> {
    match code {
        KeyCode::Char('1') | KeyCode::Char('h') => Some(Priority::High),
        KeyCode::Char('2') | KeyCode::Char('m') => Some(Priority::Medium),
        KeyCode::Char('3') | KeyCode::Char('l') => Some(Priority::Low),
        _ => None,
    }
}
