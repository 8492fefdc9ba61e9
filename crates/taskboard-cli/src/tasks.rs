use std::io::Write;

use color_eyre::Result;
use taskboard_core::{
    storage::KvStore,
    tasks::{Priority, Task, TaskId},
    view::{project_lane, SortDirection, ViewConfig},
};
use taskboard_task::TaskStore;

use crate::{cli::TaskCommand, config, storage};

/// Execute a task subcommand against the configured file store.
pub async fn handle(cmd: TaskCommand, config: &config::Config) -> Result<()> {
    let mut store = TaskStore::open(storage::store_from_config(config)?).await;
    let mut out = std::io::stdout().lock();
    run(cmd, &mut store, config.view_config(), &mut out).await
}

async fn run<S: KvStore>(
    cmd: TaskCommand,
    store: &mut TaskStore<S>,
    base_view: ViewConfig,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        TaskCommand::List {
            lane,
            sort,
            desc,
            hide_completed,
            hide_incomplete,
        } => {
            if store.tasks().is_empty() {
                writeln!(
                    out,
                    "No tasks yet. Add one with `taskboard task add <text> --priority <lane>`."
                )?;
                return Ok(());
            }
            let mut view = base_view;
            if let Some(sort) = sort {
                view.sort_by = sort.into();
            }
            if desc {
                view.sort_direction = SortDirection::Desc;
            }
            view.filter.show_completed &= !hide_completed;
            view.filter.show_incomplete &= !hide_incomplete;

            let lanes = lane.map_or_else(|| Priority::ALL.to_vec(), |p| vec![p]);
            for priority in lanes {
                let tasks = project_lane(store.tasks(), priority, &view);
                write!(out, "{}", render_lane(priority, &tasks))?;
            }
        }
        TaskCommand::Add { text, priority } => {
            match store
                .add_task(&text.join(" "), Some(priority))
                .await
                .map_err(report)?
            {
                Some(task) => writeln!(out, "Created task {}: {} [{}]", task.id, task.text, task.priority)?,
                None => writeln!(out, "Nothing added: task text is empty.")?,
            }
        }
        TaskCommand::Toggle { id } => {
            match store.toggle_complete(TaskId(id)).await.map_err(report)? {
                Some(task) if task.completed => writeln!(out, "Marked done: {}", task.text)?,
                Some(task) => writeln!(out, "Marked not done: {}", task.text)?,
                None => not_found(out, id)?,
            }
        }
        TaskCommand::Edit { id, text } => {
            let text = text.join(" ");
            if store.get(TaskId(id)).is_none() {
                not_found(out, id)?;
            } else {
                match store.edit_task(TaskId(id), &text).await.map_err(report)? {
                    Some(task) => writeln!(out, "Updated {}: {}", task.id, task.text)?,
                    None => writeln!(out, "Nothing changed: task text is empty.")?,
                }
            }
        }
        TaskCommand::Move { id, priority } => {
            match store
                .change_priority(id, Some(priority))
                .await
                .map_err(report)?
            {
                Some(task) => writeln!(out, "Moved {} to {}", task.text, task.priority)?,
                None => not_found(out, id)?,
            }
        }
        TaskCommand::Delete { id } => {
            match store.delete_task(TaskId(id)).await.map_err(report)? {
                Some(task) => writeln!(out, "Deleted: {}", task.text)?,
                None => not_found(out, id)?,
            }
        }
    }

    Ok(())
}

fn not_found(out: &mut impl Write, id: i64) -> std::io::Result<()> {
    writeln!(out, "Nothing changed: no task with id {id}.")
}

fn report(err: anyhow::Error) -> color_eyre::Report {
    color_eyre::eyre::eyre!("{err:#}")
}

/// One lane as plain text: a header with the count, then one line per task.
fn render_lane(priority: Priority, tasks: &[&Task]) -> String {
    let mut rendered = format!("{} ({})\n", priority, tasks.len());
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        rendered.push_str(&format!("  [{mark}] {} {}\n", task.id, task.text));
    }
    rendered
}
