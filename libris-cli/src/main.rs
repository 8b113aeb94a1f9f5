//! Libris CLI - library feeds, search and wishlist from the terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Context;
use libris_core::config::DEFAULT_API_BASE;
use libris_core::gateway::{SortBy, SortOrder};
use libris_core::SearchFilters;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a cap (must be at least 1)
fn parse_cap(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("cap must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the library service API
    #[arg(long, global = true, env = "LIBRIS_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Bearer token for authenticated endpoints
    #[arg(long, global = true, env = "LIBRIS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Directory holding this session's cached feeds
    #[arg(long, global = true, env = "LIBRIS_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a recommendation feed, topped up from fallback sources
    Feed {
        /// Feed name (discover, recommendations)
        name: String,

        /// Sections shorter than this are topped up
        #[arg(long)]
        desired_min: Option<usize>,

        /// Maximum size of a topped-up section
        #[arg(long, value_parser = parse_cap)]
        cap: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the copy of a feed cached in this session
    Cached {
        /// Feed name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the catalogue
    Search {
        /// Title, author or ISBN; empty lists everything
        #[arg(default_value = "")]
        query: String,

        /// Only books that can be borrowed now
        #[arg(long)]
        available_only: bool,

        /// Earliest publication year
        #[arg(long)]
        year_from: Option<i32>,

        /// Latest publication year
        #[arg(long)]
        year_to: Option<i32>,

        /// Sort field (title, author, year)
        #[arg(long, default_value = "title")]
        sort_by: SortBy,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },

    /// Manage the browsing session
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

#[derive(Subcommand)]
enum WishlistCommand {
    /// Add a book by barcode
    Add { barcode: String },

    /// Remove a book by barcode
    Remove { barcode: String },

    /// List the wishlist
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// List the feeds cached in this session
    List,

    /// End the session and drop every cached feed
    End,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose {
        "libris_cli=debug,libris_core=debug"
    } else {
        "libris_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = Context::new(cli.api_base, cli.token, cli.session_dir)?;

    match cli.command {
        Commands::Feed {
            name,
            desired_min,
            cap,
            json,
        } => commands::feed(&ctx, &name, desired_min, cap, json).await,

        Commands::Cached { name, json } => commands::cached(&ctx, &name, json),

        Commands::Search {
            query,
            available_only,
            year_from,
            year_to,
            sort_by,
            order,
            json,
        } => {
            let filters = SearchFilters {
                query,
                available_only,
                year_from,
                year_to,
                sort_by,
                order,
            };
            commands::search(&ctx, &filters, json).await
        }

        Commands::Wishlist { action } => match action {
            WishlistCommand::Add { barcode } => commands::wishlist_add(&ctx, &barcode).await,
            WishlistCommand::Remove { barcode } => commands::wishlist_remove(&ctx, &barcode).await,
            WishlistCommand::List { json } => commands::wishlist_list(&ctx, json).await,
        },

        Commands::Session { action } => match action {
            SessionCommand::List => commands::session_list(&ctx),
            SessionCommand::End => commands::session_end(&ctx),
        },
    }
}
