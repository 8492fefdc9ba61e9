mod app;

use std::{io, time::Duration};

use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use taskboard_core::{
    storage::KvStore,
    tasks::{Priority, TaskId},
    view::{LaneView, SortDirection, ViewConfig},
};
use taskboard_task::Board;

use self::app::{App, Mode};

/// Three-lane board. Keys are decoded into board events; every change is
/// saved before the next frame is drawn. Press `q` or `Esc` to exit.
pub async fn launch<S: KvStore>(board: &mut Board<S>) -> Result<()> {
    // Guard restores the terminal even if we early-return.
    let guard = TerminalGuard::enter()?;
    let mut terminal = guard.terminal()?;
    let mut app = App::default();

    while !app.should_quit {
        let pending = {
            let lanes = board.lanes();
            app.clamp(&lanes);
            let view = *board.view();
            let selected = board.selected_id();
            terminal.draw(|frame| render(frame, &lanes, &view, selected, &app))?;

            if !event::poll(Duration::from_millis(150))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code, &lanes)
                }
                _ => None,
            }
        };

        if let Some(event) = pending {
            match board.dispatch(event).await {
                Ok(true) => {}
                Ok(false) => app.status = Some("Nothing changed.".to_string()),
                Err(err) => app.status = Some(format!("Save failed: {err:#}")),
            }
        }
    }

    Ok(())
}

fn render(
    frame: &mut Frame<'_>,
    lanes: &[LaneView<'_>],
    view: &ViewConfig,
    selected: Option<TaskId>,
    app: &App,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    frame.render_widget(header(view), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[1]);
    for (index, lane) in lanes.iter().enumerate() {
        render_lane(frame, columns[index], lane, selected, app, index);
    }

    frame.render_widget(footer(app), chunks[2]);
}

fn header(view: &ViewConfig) -> Paragraph<'static> {
    let check = |on: bool| if on { "[x]" } else { "[ ]" };
    let arrow = match view.sort_direction {
        SortDirection::Asc => "asc",
        SortDirection::Desc => "desc",
    };
    Paragraph::new(Line::from(vec![
        Span::styled(
            "Taskboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} completed  {} incomplete   sort: {} ({arrow})",
            check(view.filter.show_completed),
            check(view.filter.show_incomplete),
            view.sort_by.label(),
        )),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
}

fn render_lane(
    frame: &mut Frame<'_>,
    area: Rect,
    lane: &LaneView<'_>,
    selected: Option<TaskId>,
    app: &App,
    index: usize,
) {
    let items: Vec<ListItem> = lane
        .tasks
        .iter()
        .map(|task| {
            let mark = if task.completed { "[x] " } else { "[ ] " };
            let mut text_style = Style::default();
            if task.completed {
                text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
            }
            if selected == Some(task.id) {
                text_style = text_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
            }
            ListItem::new(Line::from(vec![
                Span::raw(mark),
                Span::styled(task.text.clone(), text_style),
            ]))
        })
        .collect();

    let focused = app.focus == index;
    let border = if focused {
        Style::default().fg(lane_color(lane.priority))
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!("{} Priority ({})", lane.priority, lane.tasks.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if focused && !lane.tasks.is_empty() {
        state.select(Some(app.cursors[index]));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn footer(app: &App) -> Paragraph<'static> {
    let line = match &app.mode {
        Mode::Adding { text } => prompt("New task", text),
        Mode::PickingNewPriority { .. } => {
            Line::from("Lane for new task: 1 High, 2 Medium, 3 Low (Esc cancels)")
        }
        Mode::Editing { text, .. } => prompt("Edit", text),
        Mode::PickingPriority { .. } => {
            Line::from("Move to: 1 High, 2 Medium, 3 Low (Esc cancels)")
        }
        Mode::Normal => match &app.status {
            Some(status) => Line::from(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            )),
            None => Line::from(
                "a add  e edit  p priority  H/M/L move  space done  enter select  d delete  c/i filters  s sort  r direction  q quit",
            ),
        },
    };
    Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Controls"))
}

fn prompt(label: &str, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Cyan)),
        Span::raw(text.to_string()),
        Span::raw("_"),
    ])
}

fn lane_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Enter alternate screen to avoid polluting the shell buffer.
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }

    fn terminal(&self) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; errors are reported but not propagated from Drop.
        if let Err(err) = disable_raw_mode() {
            eprintln!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
            eprintln!("failed to restore terminal: {err}");
        }
    }
}
