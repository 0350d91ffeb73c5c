use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeTrack
#[derive(Parser)]
#[command(
    name = "rtimetrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee time tracking: clock in/out, breaks, idle time, activity and billing summaries on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Print the JSON response envelope instead of human-readable output
    #[arg(global = true, long = "json")]
    pub json: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "all", help = "Include migration records")]
        all: bool,
    },

    /// Start a work session
    ClockIn {
        /// Employee identifier
        employee: String,

        #[arg(long, help = "Free-text notes")]
        notes: Option<String>,

        #[arg(long, help = "Where the employee works from (office, remote, ...)")]
        location: Option<String>,
    },

    /// Close the active work session
    ClockOut {
        /// Employee identifier
        employee: String,

        #[arg(long, help = "Notes appended to the session")]
        notes: Option<String>,
    },

    /// Start or end a break
    Break {
        #[command(subcommand)]
        action: BreakAction,
    },

    /// Record idle-detection signals
    Idle {
        #[command(subcommand)]
        action: IdleAction,
    },

    /// Log application or website activity
    Activity {
        #[command(subcommand)]
        action: ActivityAction,
    },

    /// Show where an employee is in the session lifecycle
    Status {
        /// Employee identifier
        employee: String,
    },

    /// Daily or range summary with billing totals
    Summary {
        /// Employee identifier
        employee: String,

        #[arg(long, help = "Day to summarize (YYYY-MM-DD, default: today)", conflicts_with_all = ["from", "to"])]
        date: Option<String>,

        #[arg(long, help = "Range start (YYYY-MM-DD)", requires = "to")]
        from: Option<String>,

        #[arg(long, help = "Range end (YYYY-MM-DD)", requires = "from")]
        to: Option<String>,
    },

    /// List recent work sessions
    Sessions {
        /// Employee identifier
        employee: String,

        #[arg(long, default_value_t = 20, help = "How many sessions to show")]
        limit: usize,

        #[arg(long, help = "Show breaks, idle periods and activity per session")]
        details: bool,
    },

    /// Export work sessions
    Export {
        /// Employee identifier
        employee: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Range start (YYYY-MM-DD, default: today)")]
        from: Option<String>,

        #[arg(long, help = "Range end (YYYY-MM-DD, default: from)")]
        to: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Send one request through the API boundary and print the response
    Api {
        #[arg(long, default_value = "GET")]
        method: String,

        #[arg(long, help = "Route path with optional query string")]
        path: String,

        #[arg(long, help = "JSON request body")]
        body: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BreakAction {
    /// Start a break in a work session
    Start {
        work_session_id: i64,

        #[arg(long)]
        notes: Option<String>,
    },

    /// End the active break, by break id or by work session id
    End {
        #[arg(long = "break-id", conflicts_with = "session", required_unless_present = "session")]
        break_id: Option<i64>,

        #[arg(long = "session")]
        session: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum IdleAction {
    /// Employee became idle
    Start { work_session_id: i64 },

    /// Employee is active again
    End { work_session_id: i64 },
}

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Application in focus
    App {
        work_session_id: i64,
        name: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, default_value_t = 0, help = "Seconds spent")]
        duration: i64,
    },

    /// Website visited
    Web {
        work_session_id: i64,
        url: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, default_value_t = 0, help = "Seconds spent")]
        duration: i64,
    },
}
