//! Command handlers for the `rmnd` binary.
//!
//! Each invocation opens one [`Session`], runs a single command against it,
//! and ends. User-facing task numbers are 1-based here and converted before
//! they reach the task list.

use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use indicatif::ProgressDrawTarget;
use std::io::{self, BufRead, Write};

use crate::cli::{Command, MarkAction};
use crate::prompt::ask_with;
use crate::render::{progress_bar, render_table, DisplayConfig};
use crate::store::{open_task_list, FileTaskStore};
use crate::task::{Filter, Task, TaskError, TaskList};
use crate::util::is_blank;

/// Name used when neither the user nor the environment supplies one.
pub const FALLBACK_USERNAME: &str = "friend";

/// Width of the progress bar in the post-command summary.
const PROGRESS_WIDTH: usize = 40;

/// Asks the user to confirm a question.
pub type Confirmer<'a> = Box<dyn FnMut(&str) -> io::Result<bool> + 'a>;

/// Ask a first-time user for their name.
///
/// A blank answer falls back to `login` (usually `$USER`), then to
/// [`FALLBACK_USERNAME`].
pub fn first_run_username<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    login: Option<String>,
) -> io::Result<String> {
    let answer = ask_with(input, output, "Enter Username")?;
    if !is_blank(&answer) {
        return Ok(answer);
    }
    let username = login.unwrap_or_else(|| FALLBACK_USERNAME.to_string());
    tracing::warn!(%username, "no username entered, using fallback");
    Ok(username)
}

/// Turn task-list rejections into the messages the CLI prints.
fn user_facing(err: TaskError) -> anyhow::Error {
    match err {
        TaskError::InvalidInput(message) => anyhow!(message),
        TaskError::DuplicateTask(_) => anyhow!("Task already exists!"),
        other => other.into(),
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user declined a confirmation; nothing was changed.
    Aborted,
}

pub struct Session<'a, W: Write> {
    store: &'a FileTaskStore,
    tasks: TaskList<'a>,
    display: DisplayConfig,
    confirm: Confirmer<'a>,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    /// Load the task list from `store` and bind it for saving.
    pub fn open(
        store: &'a FileTaskStore,
        display: DisplayConfig,
        confirm: Confirmer<'a>,
        out: W,
    ) -> Result<Self> {
        let tasks = open_task_list(store)?;
        Ok(Self {
            store,
            tasks,
            display,
            confirm,
            out,
        })
    }

    pub fn tasks(&self) -> &TaskList<'a> {
        &self.tasks
    }

    /// Entry point: greet if needed, then run `command` (if any).
    pub fn start(&mut self, command: Option<Command>, first_run: bool) -> Result<Outcome> {
        let username = self.store.username().unwrap_or_default();
        let username = username.cyan().bold();
        if first_run {
            writeln!(self.out, "Welcome {}!", username)?;
            if command.is_none() {
                writeln!(self.out, "Use 'rmnd add' to create a task!")?;
                return Ok(Outcome::Completed);
            }
        }

        match command {
            Some(command) => self.run(command),
            None => {
                writeln!(self.out, "Hello {}.", username)?;
                self.summary()?;
                Ok(Outcome::Completed)
            }
        }
    }

    pub fn run(&mut self, command: Command) -> Result<Outcome> {
        tracing::debug!(?command, "running command");
        match command {
            Command::Add { name } => self.add(name),
            Command::Delete { task_id } => self.delete(task_id),
            Command::Rename { task_id, name } => self.rename(task_id, name),
            Command::Move { old_id, new_id } => self.move_task(old_id, new_id),
            Command::Clear => self.clear(),
            Command::RemoveDone => self.remove_done(),
            Command::Callme { name } => self.callme(name),
            Command::Tasks { filter } => self.show(filter),
            Command::Done => self.show(Filter::Done),
            Command::Pending => self.show(Filter::Pending),
            Command::Mark { action } => match action {
                MarkAction::Done { task_id } => self.mark_single(task_id, true),
                MarkAction::Pending { task_id } => self.mark_single(task_id, false),
                MarkAction::AllDone => self.mark_all(true),
                MarkAction::AllPending => self.mark_all(false),
            },
        }
    }

    /// Translate a 1-based task number into a list index.
    fn index_of(&self, task_id: usize) -> Result<usize> {
        match task_id.checked_sub(1) {
            Some(no) if self.tasks.has_task(no) => Ok(no),
            _ => bail!("Task #{} does not exist!", task_id),
        }
    }

    fn confirmed(&mut self, question: &str) -> Result<bool> {
        if (self.confirm)(question)? {
            return Ok(true);
        }
        writeln!(self.out, "Aborted.")?;
        Ok(false)
    }

    fn add(&mut self, name: String) -> Result<Outcome> {
        let task = Task::new(name.as_str()).map_err(user_facing)?;
        self.tasks.add(task).map_err(user_facing)?;
        writeln!(self.out, "Task \"{}\" has been added.", name)?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn delete(&mut self, task_id: usize) -> Result<Outcome> {
        let no = self.index_of(task_id)?;
        if !self.confirmed(&format!(
            "Are you sure that you want to delete Task #{}?",
            task_id
        ))? {
            return Ok(Outcome::Aborted);
        }
        self.tasks.remove(no)?;
        writeln!(self.out, "Task #{} has been deleted.", task_id)?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn rename(&mut self, task_id: usize, name: String) -> Result<Outcome> {
        let no = self.index_of(task_id)?;
        self.tasks
            .change(no, Some(name.clone()), None)
            .map_err(user_facing)?;
        writeln!(self.out, "Task #{} has been renamed to {}.", task_id, name)?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn move_task(&mut self, old_id: usize, new_id: usize) -> Result<Outcome> {
        let old = self.index_of(old_id)?;
        let new = self.index_of(new_id)?;
        self.tasks.swap(old, new)?;
        writeln!(self.out, "Task #{} has been moved to {}.", old_id, new_id)?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn clear(&mut self) -> Result<Outcome> {
        if !self.confirmed("Are you sure that you want to clear your tasklist?")? {
            return Ok(Outcome::Aborted);
        }
        self.tasks.clear()?;
        writeln!(self.out, "Tasklist has been cleared.")?;
        Ok(Outcome::Completed)
    }

    fn remove_done(&mut self) -> Result<Outcome> {
        if !self.confirmed("Are you sure that you want to remove all completed tasks?")? {
            return Ok(Outcome::Aborted);
        }
        self.tasks.remove_done()?;
        writeln!(self.out, "All completed tasks have been removed.")?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn callme(&mut self, name: String) -> Result<Outcome> {
        if is_blank(&name) {
            bail!("Username cannot be an empty string!");
        }
        if !self.confirmed(&format!(
            "Are you sure that you want to change your username to {}?",
            name
        ))? {
            return Ok(Outcome::Aborted);
        }
        self.store.set_username(name.as_str())?;
        writeln!(
            self.out,
            "Username has been changed to {}.",
            name.as_str().cyan().bold()
        )?;
        Ok(Outcome::Completed)
    }

    fn mark_single(&mut self, task_id: usize, status: bool) -> Result<Outcome> {
        let no = self.index_of(task_id)?;
        self.tasks.change(no, None, Some(status))?;
        writeln!(
            self.out,
            "Task #{} has been marked {}.",
            task_id,
            if status { "done" } else { "pending" }
        )?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn mark_all(&mut self, status: bool) -> Result<Outcome> {
        let question = if status {
            "Are you sure that you want to mark all tasks as completed?"
        } else {
            "Are you sure that you want to mark all tasks as incomplete?"
        };
        if !self.confirmed(question)? {
            return Ok(Outcome::Aborted);
        }
        self.tasks.mark_all(status)?;
        writeln!(
            self.out,
            "All tasks have been marked as {}.",
            if status { "done" } else { "pending" }
        )?;
        self.summary()?;
        Ok(Outcome::Completed)
    }

    fn show(&mut self, filter: Filter) -> Result<Outcome> {
        match render_table(&self.tasks.filtered_view(filter), &self.display) {
            Some(table) => writeln!(self.out, "{}", table)?,
            None => match filter {
                Filter::All => writeln!(self.out, "No tasks.")?,
                other => writeln!(self.out, "No {} tasks.", other)?,
            },
        }
        Ok(Outcome::Completed)
    }

    /// Post-command overview: the full table and a progress bar.
    fn summary(&mut self) -> Result<()> {
        let total = self.tasks.count(Filter::All);
        if total == 0 {
            writeln!(self.out, "No tasks found.")?;
            return Ok(());
        }

        self.show(Filter::All)?;
        let done = self.tasks.count(Filter::Done);
        self.out.flush()?;
        progress_bar(done, total, PROGRESS_WIDTH, ProgressDrawTarget::stdout()).abandon();
        if self.tasks.count(Filter::Pending) == 0 {
            writeln!(self.out, "No pending tasks remaining!")?;
        }
        Ok(())
    }
}
