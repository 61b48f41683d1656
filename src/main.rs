use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use taskmaster::{Backend, Config, FilterCriterion, Storage, Task, TaskStore, ThemePreference};
use tracing::Level;

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = "TaskMaster - create, complete, reorder and search your tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/taskmaster/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the task data
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Storage backend
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add { text: String },

    /// Replace a task's text
    Edit {
        /// Task id or 1-based position
        task: String,
        text: String,
    },

    /// Toggle a task between pending and completed
    Toggle {
        /// Task id or 1-based position
        task: String,
    },

    /// Delete a task
    Delete {
        /// Task id or 1-based position
        task: String,
    },

    /// Move a task from one position to another (1-based, full list)
    Move { from: usize, to: usize },

    /// Mark every pending task as completed
    CompleteAll,

    /// Remove every pending task
    RemovePending,

    /// List tasks
    List {
        /// Show all, completed or pending tasks
        #[arg(short, long, value_enum, default_value_t = FilterCriterion::All)]
        filter: FilterCriterion,

        /// Case-insensitive text search
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show task counts
    Stats,

    /// Show or toggle dark mode
    Theme {
        #[arg(value_parser = ["toggle"])]
        action: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(log_level(&config.log_level, cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let storage = config.open_storage()?;
    let mut store = TaskStore::open(storage);
    let theme = ThemePreference::load(store.storage());

    match cli.command {
        Commands::Add { text } => {
            if !store.add_task(&text) {
                fail("Please enter a task");
            }
            let task = store.tasks().last().ok_or_else(|| eyre!("Task missing after add"))?;
            println!("Added {}", task.id.dimmed());
        }
        Commands::Edit { task, text } => {
            if let Err(message) = edit_task(&mut store, &task, &text) {
                fail(message);
            }
        }
        Commands::Toggle { task } => {
            let id = resolve_task_id(&store, &task);
            store.toggle_task(&id);
        }
        Commands::Delete { task } => {
            let id = resolve_task_id(&store, &task);
            store.delete_task(&id);
        }
        Commands::Move { from, to } => {
            match (from.checked_sub(1), to.checked_sub(1)) {
                (Some(from), Some(to)) => store.reorder_tasks(from, to),
                _ => fail("Positions start at 1"),
            }
        }
        Commands::CompleteAll => {
            store.mark_all_completed();
        }
        Commands::RemovePending => {
            if store.task_stats().pending == 0 {
                println!("No pending tasks to remove!");
            } else {
                let removed = store.remove_pending_tasks();
                println!("Removed {} pending task(s)", removed);
            }
        }
        Commands::List { filter, search } => {
            store.set_filter(filter);
            store.set_search_term(&search);
            print_list(&store, theme);
        }
        Commands::Stats => {
            print_stats(&store);
        }
        Commands::Theme { action } => {
            let mut theme = theme;
            if action.is_some() {
                theme.toggle(store.storage_mut());
            }
            println!("Dark mode: {}", if theme.is_dark() { "on" } else { "off" });
        }
    }

    if let Some(err) = store.last_persist_error() {
        eprintln!("{} changes are not saved yet: {}", "warning:".yellow().bold(), err);
    }

    Ok(())
}

/// Map config level plus `-v` count onto a tracing level
fn log_level(configured: &str, verbose: u8) -> Level {
    match verbose {
        0 => Level::from_str(configured).unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Accept an exact id, falling back to a 1-based position in the full list
///
/// Anything else is passed through unchanged so stale ids stay silent no-ops.
fn resolve_task_id<S: Storage>(store: &TaskStore<S>, arg: &str) -> String {
    if store.get(arg).is_some() {
        return arg.to_string();
    }
    match arg.parse::<usize>() {
        Ok(pos) if pos >= 1 && pos <= store.tasks().len() => store.tasks()[pos - 1].id.clone(),
        _ => arg.to_string(),
    }
}

/// Run an edit the way the inline edit form does, reporting why it failed
fn edit_task<S: Storage>(store: &mut TaskStore<S>, arg: &str, text: &str) -> std::result::Result<(), &'static str> {
    let id = resolve_task_id(store, arg);
    store.set_edit_task(Some(&id));
    let Some(current) = store.edit_task() else {
        return Err("No such task");
    };
    println!("Editing: {}", current.text);

    if !store.edit_task_text(&id, text) {
        return Err("Please enter a task");
    }
    Ok(())
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", "error:".red().bold(), message);
    process::exit(1);
}

fn print_list<S: Storage>(store: &TaskStore<S>, theme: ThemePreference) {
    let visible = store.filtered_tasks();
    if visible.is_empty() {
        println!("{}", "No tasks yet - add one!".dimmed());
        return;
    }

    for task in visible {
        // Positions always refer to the full list so `move` and `toggle` agree
        let position = store.tasks().iter().position(|t| t.id == task.id).map_or(0, |p| p + 1);
        println!("{:>3}. {}", position, render_task(task, theme));
    }
}

fn render_task(task: &Task, theme: ThemePreference) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let text = if task.completed {
        task.text.dimmed().strikethrough().to_string()
    } else if theme.is_dark() {
        task.text.bright_white().to_string()
    } else {
        task.text.normal().to_string()
    };
    format!("{} {}  {}", check, text, task.id.dimmed())
}

fn print_stats<S: Storage>(store: &TaskStore<S>) {
    let stats = store.task_stats();
    println!(
        "{}  {}  {}",
        format!("done {}", stats.completed).green(),
        format!("pending {}", stats.pending).yellow(),
        format!("{}%", stats.completion_percentage()).blue()
    );
    for criterion in FilterCriterion::VARIANTS {
        let count = match criterion {
            FilterCriterion::All => stats.total,
            FilterCriterion::Pending => stats.pending,
            FilterCriterion::Completed => stats.completed,
        };
        println!("  {:<10} {}", criterion, count);
    }
}
