//! # Taskhub
//!
//! A terminal client for a shared task-tracking service. Taskhub combines a fast CLI for quick entry with a TUI (Terminal User Interface) for interactive management of the team's task list.
//!
//! ## Features
//!
//! *   **Shared task list**: Tasks live on the task service and are visible to every signed-in user.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard with transient status toasts.
//! *   **Deadlines**: Optional due date and time per task, with Overdue labelling.
//! *   **Recurrence**: Hourly, daily, weekly, monthly or yearly repeats.
//! *   **Assignment**: Tasks are assigned to users and optionally to groups; only the assignee can complete or delete a task.
//!
//! ## Usage
//!
//! ### Signing in
//!
//! ```bash
//! taskhub login alice
//! # The API key is stored locally; all further commands use it.
//! ```
//!
//! ### Interactive Mode (TUI)
//!
//! Run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! taskhub
//! # or explicitly
//! taskhub ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task
//! *   `Space`: Mark selected task as complete
//! *   `d`: Delete selected task
//! *   `r`: Refresh the task list
//! *   `c`: Toggle Show/Hide completed tasks
//! *   `x`: Dismiss the current toast
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Basic task
//! taskhub add "Water the plants"
//!
//! # With a deadline (date and time go together)
//! taskhub add "File the report" --date 2025-12-01 --time 17:00
//!
//! # Recurring, assigned to a team
//! taskhub add "Team standup" --recur daily --group Backend
//!
//! # List open tasks / all tasks
//! taskhub list
//! taskhub list --all
//!
//! # Complete or delete a task you are assigned to
//! taskhub complete 12
//! taskhub delete 12
//! ```
//!
//! ## Configuration
//!
//! *   `TASKHUB_URL`: base URL of the task service (default `http://localhost:8000`).
//! *   `TASKHUB_KEY_FILE`: overrides where the API key is stored. By default it lives in your local data directory:
//!     *   Linux: `~/.local/share/taskhub/api_key`
//!     *   macOS: `~/Library/Application Support/taskhub/api_key`
//!     *   Windows: `%APPDATA%\taskhub\api_key`

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use taskhub::commands::*;
use taskhub::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskhub")]
#[command(about = "Terminal client for the shared task service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the API key
    Login {
        /// Username on the task service
        username: String,
        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored API key
    Logout,
    /// List tasks
    List {
        /// Show completed tasks too
        #[arg(short, long)]
        all: bool,
    },
    /// Add a new task
    Add {
        /// Task description (quoted if it has spaces)
        description: String,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Due date in YYYY-MM-DD (requires --time)
        #[arg(short, long)]
        date: Option<String>,
        /// Due time in HH:MM (requires --date)
        #[arg(short, long)]
        time: Option<String>,
        /// Recurrence (hourly, daily, weekly, monthly, yearly)
        #[arg(short, long)]
        recur: Option<String>,
        /// Assigned group, by name or id
        #[arg(short, long)]
        group: Option<String>,
        /// Assigned user, by name or id (defaults to you)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Mark a task as complete
    Complete {
        id: u64,
    },
    /// Delete a task
    Delete {
        id: u64,
    },
    /// Show the signed-in user's profile
    Whoami,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Login { username, password }) => cmd_login(username, password),
        Some(Commands::Logout) => cmd_logout(),
        Some(Commands::List { all }) => cmd_list(all),
        Some(Commands::Add { description, notes, date, time, recur, group, user }) => {
            cmd_add(description, notes, date, time, recur, group, user)
        }
        Some(Commands::Complete { id }) => cmd_complete(id),
        Some(Commands::Delete { id }) => cmd_delete(id),
        Some(Commands::Whoami) => cmd_whoami(),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskhub", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
