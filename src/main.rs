use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use ticklist::app::{AppState, AutoConfirm, Command, Confirmer, ModalConfirm, PromptConfirm};
use ticklist::config::{self, Config};
use ticklist::kv::SqliteKv;
use ticklist::store::{FilterMode, RenameOutcome, Task, TaskStore, filtered, items_left_label};
use ticklist::{logging, tui};

#[derive(Parser)]
#[command(
    name = "ticklist",
    version = env!("TICKLIST_VERSION"),
    about = "A keyboard-driven todo list for the terminal"
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive list (default)
    Tui,
    /// Create the ticklist data directory
    Init,
    /// Add a task
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// List tasks
    List {
        /// all, active or completed
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },
    /// Mark a task completed
    Done {
        /// Task id or unique id prefix
        id: String,
    },
    /// Mark a task active again
    Reopen {
        /// Task id or unique id prefix
        id: String,
    },
    /// Change a task's title
    Rename {
        /// Task id or unique id prefix
        id: String,
        /// New title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Write the task list as JSON
    Export {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current preference (default)
    Show,
    /// Advance auto → light → dark → auto
    Cycle,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    config::ensure_dirs()?;
    let config = config::load()?;
    logging::init_tracing(&config::log_path()?, config.log.level.as_deref(), cli.verbose)?;

    match command {
        Commands::Tui => {
            let state = open_state(&config, Box::new(ModalConfirm))?;
            tui::run(state, &config)
        }
        Commands::Init => {
            let base = config::base_dir()?;
            let store = open_store(&config)?;
            println!(
                "ticklist initialized at {} ({} tasks)",
                base.display(),
                store.tasks().len()
            );
            Ok(())
        }
        Commands::Add { title } => {
            let mut store = open_store(&config)?;
            let Some(id) = store.add(&title.join(" ")) else {
                bail!("task title cannot be empty");
            };
            let task = store.get(&id).context("task vanished after add")?;
            println!("Added {} {}", task.short_id(), task.title);
            Ok(())
        }
        Commands::List { filter } => {
            let store = open_store(&config)?;
            let rows = filtered(store.tasks(), filter);
            if rows.is_empty() {
                println!("No {} tasks.", filter.as_str());
            } else {
                for t in rows {
                    println!("  {} {}  {}", t.symbol(), t.short_id(), t.title);
                }
            }
            println!("{}", items_left_label(store.remaining()));
            Ok(())
        }
        Commands::Done { id } => set_completed(&config, &id, true),
        Commands::Reopen { id } => set_completed(&config, &id, false),
        Commands::Rename { id, title } => {
            let mut store = open_store(&config)?;
            let task = find_task(&store, &id)?;
            let (id, old) = (task.id.clone(), task.title.clone());
            let title = title.join(" ");
            match store.rename(&id, &title) {
                RenameOutcome::Renamed => println!("Renamed '{old}' to '{}'", title.trim()),
                RenameOutcome::Unchanged => println!("Title unchanged"),
                RenameOutcome::Rejected => bail!("task title cannot be empty"),
                RenameOutcome::Missing => bail!("task '{id}' not found"),
            }
            Ok(())
        }
        Commands::Rm { id, yes } => {
            let confirmer: Box<dyn Confirmer> = if yes {
                Box::new(AutoConfirm)
            } else {
                Box::new(PromptConfirm::stdio())
            };
            let mut state = open_state(&config, confirmer)?;
            let task = find_task(&state.store, &id)?;
            let (id, title) = (task.id.clone(), task.title.clone());
            state.dispatch(Command::RequestDelete { id: id.clone() });
            if state.store.get(&id).is_none() {
                println!("Deleted '{title}'");
            } else {
                println!("Kept '{title}'");
            }
            Ok(())
        }
        Commands::ClearCompleted => {
            let mut store = open_store(&config)?;
            let removed = store.clear_completed();
            println!("Removed {removed} completed task(s)");
            Ok(())
        }
        Commands::Theme { action } => {
            let mut state = open_state(&config, Box::new(ModalConfirm))?;
            if matches!(action, Some(ThemeAction::Cycle)) {
                state.dispatch(Command::CycleTheme);
            }
            println!("theme: {}", state.theme().as_str());
            Ok(())
        }
        Commands::Export { output } => {
            let store = open_store(&config)?;
            let json = store.to_json_pretty()?;
            match output {
                Some(path) => {
                    fs::write(&path, &json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Exported {} tasks to {}",
                        store.tasks().len(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<TaskStore> {
    let path = config.data_path()?;
    let kv = SqliteKv::open(&path)?;
    kv.migrate()?;
    Ok(TaskStore::with_system_defaults(Box::new(kv)))
}

fn open_state(config: &Config, confirmer: Box<dyn Confirmer>) -> Result<AppState> {
    Ok(AppState::new(open_store(config)?, confirmer))
}

fn set_completed(config: &Config, id: &str, completed: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let task = find_task(&store, id)?;
    let (id, title) = (task.id.clone(), task.title.clone());
    store.toggle_completed(&id, completed);
    let verb = if completed { "Completed" } else { "Reopened" };
    println!("{verb} '{title}'");
    Ok(())
}

fn find_task<'a>(store: &'a TaskStore, id: &str) -> Result<&'a Task> {
    store
        .resolve_prefix(id)
        .with_context(|| format!("no single task matches '{id}'"))
}
