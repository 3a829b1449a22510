//! Terminal front end for the simple todo app.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Drive `todo_core` intents and print their outcome.
//!
//! # Invariants
//! - User mistakes (validation, unknown ids, cancelled dialogs) exit 0 with
//!   an inline message; only an unusable database exits non-zero.

mod terminal;

use clap::{Parser, Subcommand};
use log::{info, warn};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use terminal::{TerminalDialogs, TerminalView};
use todo_core::db::{open_db, open_db_in_memory};
use todo_core::{
    current_date, default_log_level, init_logging, KeyValueStore, SqliteKeyValueStore,
    TodoController, TodoId, TodoList, TodoPatch, TodoStorage, TodoView,
};

const DEFAULT_DB_FILE_NAME: &str = "simple_todo.sqlite3";

/// Keep a small todo list with a name, priority and due date per item.
#[derive(Parser, Debug)]
#[command(name = "simple-todo", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite file holding the todo list
    #[arg(long, env = "SIMPLE_TODO_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of the database file
    #[arg(long, global = true, conflicts_with = "db_path")]
    memory: bool,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "SIMPLE_TODO_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "SIMPLE_TODO_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Show all todos in insertion order
    List,

    /// Add a new todo
    Add {
        /// Todo name
        name: String,

        /// high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Due date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Edit a todo; prompts for each field when no field flag is given
    Edit {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        priority: Option<String>,

        #[arg(short, long)]
        due: Option<String>,
    },

    /// Delete a todo after confirmation
    Delete {
        id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove every stored todo
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    start_logging(&cli);

    let stdin = io::stdin();
    let input = stdin.lock();

    if cli.memory {
        return match open_db_in_memory() {
            Ok(conn) => run_with_connection(&conn, cli.command, input),
            Err(err) => fail(&format!("failed to open in-memory store: {err}")),
        };
    }

    let db_path = resolve_db_path(cli.db_path);
    match open_db(&db_path) {
        Ok(conn) => run_with_connection(&conn, cli.command, input),
        Err(err) => fail(&format!("failed to open `{}`: {err}", db_path.display())),
    }
}

fn start_logging(cli: &Cli) {
    let Some(log_dir) = cli.log_dir.as_ref() else {
        return;
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn resolve_db_path(configured: Option<PathBuf>) -> PathBuf {
    configured
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}

fn run_with_connection(conn: &Connection, command: Command, input: impl BufRead) -> ExitCode {
    match SqliteKeyValueStore::try_new(conn) {
        Ok(store) => {
            let terminal = Terminal {
                input,
                out: io::stdout(),
                err: io::stderr(),
                prompts: io::stderr(),
            };
            run(store, command, terminal);
            ExitCode::SUCCESS
        }
        Err(err) => fail(&format!("storage is not usable: {err}")),
    }
}

/// Streams a command reads from and writes to.
struct Terminal<R, W, E, P> {
    input: R,
    out: W,
    err: E,
    prompts: P,
}

/// Executes one command against `store`.
fn run<S, R, W, E, P>(store: S, command: Command, terminal: Terminal<R, W, E, P>)
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
    E: Write,
    P: Write,
{
    let Terminal {
        input,
        out,
        err,
        prompts,
    } = terminal;
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&command)
    );

    let view = match command {
        Command::List => TerminalView::new(out, err),
        _ => TerminalView::new(out, err).skip_initial_render(),
    };
    let mut dialogs = TerminalDialogs::new(input, prompts);
    if let Command::Delete { yes, .. } = command {
        dialogs = dialogs.assume_yes(yes);
    }
    if let Command::Edit {
        name,
        priority,
        due,
        ..
    } = &command
    {
        let patch = TodoPatch {
            name: name.clone(),
            priority: priority.clone(),
            due_date: due.clone(),
        };
        if !patch.is_empty() {
            dialogs = dialogs.with_preset_edit(patch);
        }
    }

    let list = TodoList::new(TodoStorage::new(store));
    let mut controller = TodoController::new(list, view, dialogs);
    controller.start();

    match command {
        Command::List => {}
        Command::Add {
            name,
            priority,
            due,
        } => {
            let due = due.unwrap_or_else(current_date);
            controller.submit_new(&name, &priority, &due);
        }
        Command::Edit { id, .. } => {
            controller.request_edit(TodoId::from(id));
        }
        Command::Delete { id, .. } => {
            controller.request_delete(TodoId::from(id));
        }
        Command::Clear => {
            if let Err(storage_err) = controller.list_mut().reset() {
                warn!("event=cli_clear module=cli status=error error={storage_err}");
            }
            let snapshot = controller.list().items().to_vec();
            controller.view_mut().render(&snapshot);
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Add { .. } => "add",
        Command::Edit { .. } => "edit",
        Command::Delete { .. } => "delete",
        Command::Clear => "clear",
    }
}

fn fail(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::FAILURE
}
