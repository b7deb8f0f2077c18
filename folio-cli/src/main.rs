//! Folio CLI - Command-line client for the Folio bookstore

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_core::{FolioConfig, SortKey};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a count argument (must be at least 1)
fn parse_positive(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the bookstore API
    #[arg(long, global = true, env = "FOLIO_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_parser = parse_positive)]
    timeout: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books from the catalog
    Books {
        /// Filter by title or author
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort order (featured, newest, price-low, price-high)
        #[arg(long, default_value = "featured")]
        sort: SortKey,

        /// Number of books to fetch
        #[arg(short, long, value_parser = parse_positive)]
        limit: Option<u32>,

        /// Only books in this category
        #[arg(short, long)]
        category: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single book
    Book {
        /// Book id
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List book categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the landing feed and its featured books
    Home {
        /// Keep rotating the featured books
        #[arg(short, long)]
        watch: bool,

        /// Number of rotations to show with --watch
        #[arg(long, default_value = "5", value_parser = parse_positive)]
        ticks: u32,

        /// Seconds each featured book stays up
        #[arg(long, value_parser = parse_positive)]
        period: Option<u32>,

        /// Start the rotation at this featured book
        #[arg(long)]
        start: Option<usize>,
    },

    /// Sign in and show the account
    Login {
        /// Username or email
        #[arg(short, long, env = "FOLIO_USERNAME")]
        username: String,

        /// Password
        #[arg(short, long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,

        /// Sign out again before exiting
        #[arg(long)]
        logout: bool,
    },

    /// Create an account
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Password confirmation
        #[arg(long)]
        password2: String,
    },

    /// Show profile and borrowing statistics
    Profile {
        /// Username or email
        #[arg(short, long, env = "FOLIO_USERNAME")]
        username: String,

        /// Password
        #[arg(short, long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Borrow a book
    Borrow {
        /// Book id
        id: i64,

        /// Days until the book is due
        #[arg(long, default_value = "14", value_parser = parse_positive)]
        days: u32,

        /// Username or email
        #[arg(short, long, env = "FOLIO_USERNAME")]
        username: String,

        /// Password
        #[arg(short, long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Return a borrowed book
    Return {
        /// Borrow id, as listed by `folio profile`
        borrow_id: i64,

        /// Username or email
        #[arg(short, long, env = "FOLIO_USERNAME")]
        username: String,

        /// Password
        #[arg(short, long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Buy a copy of a book
    Buy {
        /// Book id
        id: i64,

        /// Username or email
        #[arg(short, long, env = "FOLIO_USERNAME")]
        username: String,

        /// Password
        #[arg(short, long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug,folio_client=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = FolioConfig::from_env().context("Invalid FOLIO_* environment")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = Duration::from_secs(secs.into());
    }
    tracing::debug!("Using API at {}", config.api_url);

    match cli.command {
        Commands::Books {
            search,
            sort,
            limit,
            category,
            json,
        } => commands::books(&config, &search, sort, limit, category, json).await,

        Commands::Book { id, json } => commands::book(&config, id, json).await,

        Commands::Categories { json } => commands::categories(&config, json).await,

        Commands::Home {
            watch,
            ticks,
            period,
            start,
        } => {
            if let Some(secs) = period {
                config.hero_period = Duration::from_secs(secs.into());
            }
            let ticks = if watch { ticks } else { 0 };
            commands::home(&config, ticks, start).await
        }

        Commands::Login {
            username,
            password,
            logout,
        } => commands::login(&config, &username, &password, logout).await,

        Commands::Register {
            username,
            email,
            password,
            password2,
        } => commands::register(&config, &username, &email, &password, &password2).await,

        Commands::Profile {
            username,
            password,
            json,
        } => commands::profile(&config, &username, &password, json).await,

        Commands::Borrow {
            id,
            days,
            username,
            password,
        } => commands::borrow(&config, &username, &password, id, days).await,

        Commands::Return {
            borrow_id,
            username,
            password,
        } => commands::return_book(&config, &username, &password, borrow_id).await,

        Commands::Buy {
            id,
            username,
            password,
        } => commands::buy(&config, &username, &password, id).await,
    }
}
