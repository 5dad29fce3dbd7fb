use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use taskday::commands::*;
use taskday::config::Config;
use taskday::storage::TaskStore;
use taskday::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskday")]
#[command(about = "Personal task tracker with day-by-day grouping", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task name (quoted if it has spaces)
        name: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Due date in YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Time of day, HH:MM or h:MM AM/PM
        #[arg(short, long)]
        time: Option<String>,
    },
    /// List pending tasks grouped by due day
    List,
    /// Mark a task as complete
    Done {
        id: u64,
    },
    /// Move a completed task back to pending
    Undo {
        id: u64,
    },
    /// Delete a task
    Remove {
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show completed tasks from before yesterday
    History {
        /// Include tasks completed today and yesterday
        #[arg(short, long)]
        all: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_env("TASKDAY_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn run(cli: Cli, cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut store = TaskStore::open(cfg.data_file());

    match cli.command {
        Some(Commands::Add { name, description, due, time }) => {
            cmd_add(&mut store, AddInput { name, description, due, time }, &now, false)?;
        }
        Some(Commands::List) => cmd_list(&store, &now, cfg.undated),
        Some(Commands::Done { id }) => cmd_complete(&mut store, id, &now, false)?,
        Some(Commands::Undo { id }) => cmd_reopen(&mut store, id, false)?,
        Some(Commands::Remove { id, force }) => {
            let name = match store.get(id) {
                Some(t) => t.name.clone(),
                None => return Err(format!("Task {} not found", id).into()),
            };
            if !force && !confirm(&format!("Delete task '{}'? This cannot be undone.", name))? {
                println!("Aborted.");
                return Ok(());
            }
            cmd_remove(&mut store, id, false)?;
        }
        Some(Commands::History { all }) => cmd_history(&store, &now, all),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => return Err(format!("Unsupported shell: {}", shell).into()),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskday", &mut io::stdout());
        }
        Some(Commands::Ui) | None => run_tui(store, &cfg)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = Config::load().unwrap_or_else(|e| {
        eprintln!("{}; using defaults", e);
        Config::default()
    });

    match run(cli, cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
