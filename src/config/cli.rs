use crate::config::toml_config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::domain::model::{Interval, ThemeMode};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "six-wraps")]
#[command(about = "Command-line client for the Six Wraps shop dashboard")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Bearer token to use instead of the saved session
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Override api.api_path from the config file
    #[arg(long, global = true)]
    pub api_path: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Import legacy users from a CSV file into the user database
    ImportUsers {
        /// CSV file to read (defaults to import.csv_path)
        #[arg(long)]
        file: Option<String>,

        /// SQLite URL (defaults to import.database_url)
        #[arg(long)]
        database_url: Option<String>,

        /// Run against an in-memory store; nothing is written
        #[arg(long)]
        dry_run: bool,
    },

    /// Log in and save the session tokens
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the current profile
    Profile,

    /// Switch the profile between light and dark mode
    Theme { theme: ThemeMode },

    /// Trade the saved refresh token for fresh session tokens
    Refresh,

    /// Move the session to another organization and franchise
    SwitchOrg {
        organization_id: String,
        franchise_id: String,
    },

    /// Reset a forgotten password
    RecoverPassword {
        #[command(subcommand)]
        action: RecoverAction,
    },

    /// Fetch franchise metadata (retries with backoff) and cache it
    Metadata,

    /// List jobs
    Jobs {
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        interval: Option<Interval>,

        /// Customer name filter, applied by the API
        #[arg(long)]
        customer: Option<String>,

        #[command(flatten)]
        view: ListArgs,

        /// Write every matching job to this CSV file
        #[arg(long)]
        export: Option<String>,
    },

    /// Work with a single job
    Job {
        #[command(subcommand)]
        action: JobAction,
    },

    /// List customers
    Customers {
        #[command(flatten)]
        view: ListArgs,

        /// Write every customer to this CSV file
        #[arg(long)]
        export: Option<String>,
    },

    /// Quick customer lookup by name, email or phone
    SearchCustomers { term: String },

    /// List services
    Services {
        /// Show inactive services instead of active ones
        #[arg(long)]
        inactive: bool,

        #[command(flatten)]
        view: ListArgs,
    },

    /// Activate or deactivate a service
    ToggleService { id: String },

    /// List franchise users
    Users {
        #[command(flatten)]
        view: ListArgs,
    },

    /// Work with a single franchise user
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// List pending invites
    Invites {
        #[command(flatten)]
        view: ListArgs,
    },

    /// Work with a single invite
    Invite {
        #[command(subcommand)]
        action: InviteAction,
    },

    /// Show analytics and chart data for an interval
    Analytics {
        #[arg(long)]
        interval: Option<Interval>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum InviteAction {
    /// Check an invite token
    Check { token: String },

    /// Send an invite
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long, default_value = "user")]
        role: String,
    },

    /// Re-send an invite email
    Resend { token: String },

    /// Revoke an invite
    Delete { token: String },

    /// Accept an invite and log in as the new user
    Accept {
        token: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RecoverAction {
    /// Email a recovery link
    Request {
        #[arg(long)]
        email: String,
    },

    /// Check that a recovery token is still valid
    Check { token: String },

    /// Set a new password with a recovery token
    Set {
        token: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserAction {
    /// Remove a user from the franchise
    Remove { id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum JobAction {
    /// Delete a job
    Delete { id: String },

    /// Email the invoice for a job to its customer
    Invoice { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive search term
    #[arg(long)]
    pub search: Option<String>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to list.limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

impl Cli {
    /// Folds command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(api_path) = &self.api_path {
            config.api.api_path = api_path.clone();
        }
        if let Command::ImportUsers {
            file, database_url, ..
        } = &self.command
        {
            if let Some(file) = file {
                config.import.csv_path = file.clone();
            }
            if let Some(url) = database_url {
                config.import.database_url = url.clone();
            }
        }
    }
}
