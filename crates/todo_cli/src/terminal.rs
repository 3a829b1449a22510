//! Terminal implementation of the todo view and dialogs.
//!
//! # Responsibility
//! - Print the list, counter and inline messages.
//! - Ask edit/delete decisions on a line-oriented input.
//!
//! # Invariants
//! - Read failures and end-of-input count as "cancel".
//! - Write failures are ignored; the todo state is already settled.

use std::io::{BufRead, Write};
use todo_core::{
    count_label, priority_options, summarize, MessageKind, TodoDialogs, TodoItem, TodoPatch,
    TodoView, EMPTY_STATE_MESSAGE,
};

const CANCEL_INPUT: &str = "q";

/// Writes list renders to `out` and error messages to `err`.
pub struct TerminalView<W: Write, E: Write> {
    out: W,
    err: E,
    skip_next_render: bool,
}

impl<W: Write, E: Write> TerminalView<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            skip_next_render: false,
        }
    }

    /// Swallows the next `render`; used to hide the startup list for
    /// commands that render their own result.
    pub fn skip_initial_render(mut self) -> Self {
        self.skip_next_render = true;
        self
    }

    #[cfg(test)]
    fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl<W: Write, E: Write> TodoView for TerminalView<W, E> {
    fn render(&mut self, todos: &[TodoItem]) {
        if std::mem::take(&mut self.skip_next_render) {
            return;
        }

        let _ = writeln!(self.out, "Your Todos ({})", count_label(todos.len()));
        if todos.is_empty() {
            let _ = writeln!(self.out, "  {EMPTY_STATE_MESSAGE}");
            return;
        }
        for summary in summarize(todos) {
            let _ = writeln!(self.out, "  [{}] {}", summary.id, summary.name);
            let _ = writeln!(
                self.out,
                "      {} | Due: {}",
                summary.priority_label, summary.due_date
            );
        }
    }

    fn show_message(&mut self, message: &str, kind: MessageKind) {
        let _ = match kind {
            MessageKind::Success => writeln!(self.out, "{message}"),
            MessageKind::Error => writeln!(self.err, "error: {message}"),
        };
    }
}

/// Line-prompt dialogs. A preset patch or `assume_yes` skips the prompt.
pub struct TerminalDialogs<R: BufRead, W: Write> {
    input: R,
    output: W,
    preset_edit: Option<TodoPatch>,
    assume_yes: bool,
}

enum Answer {
    Keep,
    Replace(String),
    Cancel,
}

impl Answer {
    /// `None` on cancel, otherwise the field's patch value.
    fn into_value(self) -> Option<Option<String>> {
        match self {
            Self::Keep => Some(None),
            Self::Replace(value) => Some(Some(value)),
            Self::Cancel => None,
        }
    }
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            preset_edit: None,
            assume_yes: false,
        }
    }

    pub fn with_preset_edit(mut self, patch: TodoPatch) -> Self {
        self.preset_edit = Some(patch);
        self
    }

    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn ask(&mut self, label: &str, current: &str) -> Answer {
        let _ = write!(self.output, "{label} [{current}]: ");
        let _ = self.output.flush();
        match self.read_line() {
            None => Answer::Cancel,
            Some(line) if line.trim() == CANCEL_INPUT => Answer::Cancel,
            Some(line) if line.trim().is_empty() => Answer::Keep,
            Some(line) => Answer::Replace(line),
        }
    }
}

impl<R: BufRead, W: Write> TodoDialogs for TerminalDialogs<R, W> {
    fn edit(&mut self, item: &TodoItem) -> Option<TodoPatch> {
        if let Some(patch) = self.preset_edit.take() {
            return Some(patch);
        }

        let _ = writeln!(
            self.output,
            "Edit Todo Item (blank keeps the current value, `{CANCEL_INPUT}` cancels)"
        );
        let priorities = priority_options()
            .iter()
            .map(|(level, _)| level.as_str())
            .collect::<Vec<_>>()
            .join("/");

        let name = self.ask("Todo name", &item.name).into_value()?;
        let priority = self
            .ask(&format!("Priority ({priorities})"), &item.priority)
            .into_value()?;
        let due_date = self
            .ask("Due date (YYYY-MM-DD)", &item.due_date)
            .into_value()?;

        Some(TodoPatch {
            name,
            priority: priority.map(|value| value.trim().to_string()),
            due_date: due_date.map(|value| value.trim().to_string()),
        })
    }

    fn confirm_delete(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let _ = write!(self.output, "{prompt}\n[y/N]: ");
        let _ = self.output.flush();
        matches!(
            self.read_line().map(|line| line.trim().to_ascii_lowercase()),
            Some(answer) if answer == "y" || answer == "yes"
        )
    }
}
