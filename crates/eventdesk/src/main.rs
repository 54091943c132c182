//! EventDesk command line tool.

mod commands;

use anyhow::{Context as AnyhowContext, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventdesk_client::models::SortOrder;
use eventdesk_client::{ClientConfig, EventDesk, Location, Navigator};

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(version, about = "EventDesk Command Line Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend URL (overrides EVENTDESK_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit only the JSON response
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    /// Examples:
    ///     eventdesk login --email ana@example.com
    ///     eventdesk login --email ana@example.com --return-to /calendar
    #[command(verbatim_doc_comment)]
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,

        /// Location to continue at after signing in
        #[arg(long)]
        return_to: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the current session
    Status,
    /// Request a password recovery email
    ForgotPassword {
        email: String,
    },
    /// Set a new password with the token from a recovery email
    RecoverPassword {
        token: String,

        /// Prompted for (twice) when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Event management
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
    /// Guests of an event
    Guests {
        #[command(subcommand)]
        command: GuestsCommand,
    },
    /// User administration (ADMIN only)
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Catalog administration (ADMIN only)
    Catalogs {
        #[command(subcommand)]
        command: CatalogsCommand,
    },
}

#[derive(Subcommand)]
pub enum EventsCommand {
    /// List events
    /// Examples:
    ///     eventdesk events list
    ///     eventdesk events list --keyword boda --from 2025-01-01 --order asc
    #[command(verbatim_doc_comment)]
    List {
        #[arg(short, long)]
        keyword: Option<String>,

        /// First date, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long)]
        sort_by: Option<String>,

        /// ASC or DESC
        #[arg(long)]
        order: Option<SortOrder>,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show one event
    Get { id: String },
    /// Delete an event
    Delete { id: String },
    /// Events between two dates, both inclusive
    Calendar { from: NaiveDate, to: NaiveDate },
    /// Attendance summary of an event
    Stats { id: String },
}

#[derive(Subcommand)]
pub enum GuestsCommand {
    /// List the guests of an event
    List {
        event_id: String,

        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show one guest
    Get { event_id: String, guest_id: String },
    /// Remove a guest
    Delete { event_id: String, guest_id: String },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users
    List {
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Show one user
    Get { id: i64 },
}

#[derive(Subcommand)]
pub enum CatalogsCommand {
    /// List the entries of a catalog
    /// Examples:
    ///     eventdesk catalogs list package
    ///     eventdesk catalogs list eventGroup --json
    #[command(verbatim_doc_comment)]
    List {
        /// addon, eventGroup, guestType or package
        kind: String,
    },
}

/// Tells the user the backend ended the session.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, to: &Location) {
        tracing::debug!(to = %to, "Redirect");
        eprintln!("Session is no longer valid. Sign in again with `eventdesk login`.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,eventdesk=info,eventdesk_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }
    tracing::debug!(api_url = %config.api.base_url, "Configuration loaded");

    let desk = EventDesk::start(config, Arc::new(TerminalNavigator))
        .await
        .context("Failed to start client")?;

    let result = commands::run(&desk, cli.command, cli.json).await;
    desk.shutdown().await;
    result
}
