mod commands;
mod render;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ocal")]
#[command(about = "Manage your Outlook calendar from the command line")]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the default timezone and calendar
    Configure,
    /// Store an access token for the Graph API
    Login {
        /// Access token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// Minutes until the token expires
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Forget the stored access token
    Logout,
    /// Show events in a date range
    Agenda {
        /// Start date or date/time (default: today)
        #[arg(long)]
        start: Option<String>,

        /// End date or date/time (default: a week after start)
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        tz: Option<String>,

        /// Only events whose subject, location or body contain this text
        #[arg(long)]
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Show the events of a single day
    List {
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        tz: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Create an event
    Add {
        subject: String,

        /// Start (e.g. "2025-03-20T15:00", or a date with --all-day)
        #[arg(long)]
        start: String,

        #[arg(long, required_unless_present = "all_day")]
        end: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        body: Option<String>,

        /// Attendee e-mail address (repeatable)
        #[arg(long = "attendee")]
        attendees: Vec<String>,

        /// Reminder, in minutes before start
        #[arg(long)]
        reminder: Option<i64>,

        #[arg(long)]
        all_day: bool,

        /// Recurrence rule, e.g. "FREQ=WEEKLY;INTERVAL=2;COUNT=5"
        #[arg(long)]
        recurrence: Option<String>,

        #[arg(long)]
        tz: Option<String>,
    },
    /// Change an existing event
    Edit {
        id: String,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        body: Option<String>,

        /// Replaces all attendees (repeatable)
        #[arg(long = "attendee")]
        attendees: Vec<String>,

        #[arg(long)]
        reminder: Option<i64>,

        #[arg(long)]
        tz: Option<String>,
    },
    /// Delete an event
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Search events by subject, location or body
    Search {
        query: String,

        /// Start date or date/time (default: now)
        #[arg(long)]
        start: Option<String>,

        /// End date or date/time (default: 30 days after start)
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        tz: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Import the events of an .ics file
    Import {
        file: PathBuf,

        /// Calendar to import into (default: configured calendar)
        #[arg(long)]
        calendar: Option<String>,
    },
    /// Create an event from text like "Tomorrow 12:30pm: Lunch @ Cafe"
    Quickadd {
        text: String,

        #[arg(long)]
        tz: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {e:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// `--verbose` forces debug; otherwise `RUST_LOG` applies, falling back to warn.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Configure => commands::configure::run(),
        Commands::Login { token, expires_in } => commands::login::run(token, expires_in),
        Commands::Logout => commands::login::logout(),
        Commands::Agenda {
            start,
            end,
            tz,
            query,
            json,
        } => {
            let args = commands::agenda::AgendaArgs {
                start,
                end,
                query,
                json,
            };
            commands::agenda::run(args, tz.as_deref()).await
        }
        Commands::List { date, tz, json } => {
            commands::agenda::list(date.as_deref(), tz.as_deref(), json).await
        }
        Commands::Add {
            subject,
            start,
            end,
            location,
            body,
            attendees,
            reminder,
            all_day,
            recurrence,
            tz,
        } => {
            let args = commands::add::AddArgs {
                subject,
                start,
                end,
                location,
                body,
                attendees,
                reminder,
                all_day,
                recurrence,
            };
            commands::add::run(args, tz.as_deref()).await
        }
        Commands::Edit {
            id,
            subject,
            start,
            end,
            location,
            body,
            attendees,
            reminder,
            tz,
        } => {
            let args = commands::edit::EditArgs {
                subject,
                start,
                end,
                location,
                body,
                attendees,
                reminder,
            };
            commands::edit::run(&id, args, tz.as_deref()).await
        }
        Commands::Delete { id, yes } => commands::delete::run(&id, yes).await,
        Commands::Search {
            query,
            start,
            end,
            tz,
            json,
        } => commands::agenda::search(&query, start, end, tz.as_deref(), json).await,
        Commands::Import { file, calendar } => {
            commands::import::run(&file, calendar.as_deref()).await
        }
        Commands::Quickadd { text, tz } => commands::quickadd::run(&text, tz.as_deref()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_sets_the_level() {
        assert_eq!(log_filter(false, Some("debug")).to_string(), "debug");
    }

    #[test]
    fn warn_without_rust_log() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
    }

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(log_filter(true, Some("error")).to_string(), "debug");
    }

    #[test]
    fn quickadd_help_example_parses() {
        let example = "Tomorrow 12:30pm: Lunch @ Cafe";
        let cli = Cli::try_parse_from(["ocal", "quickadd", example]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Quickadd { ref text, tz: None } if text == example
        ));
    }
}
