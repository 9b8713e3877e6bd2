//! Pustakalaya CLI - the staff console from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the password is read from stdin if not given)
//! pk login -e librarian@pustakalaya.org
//!
//! # Counters shown on every console screen
//! pk stats
//!
//! # Second page of books matching "devkota"
//! pk list books --search devkota --page 2
//!
//! # Delete a donor without the confirmation prompt
//! pk delete donors 12 --yes
//!
//! # Move two copies of book 4 to a branch
//! pk transfer --book 4 --count 2 --destination "Butwal Branch"
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session management
//! - `stats` - Library counters
//! - `list` - Filtered, paged listing of one resource
//! - `delete` - Delete one record after confirmation
//! - `transfer` - Record a book transfer
//!
//! The session is shared with the browser console through
//! `PUSTAKALAYA_SESSION_FILE`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{Context, ResourceArg};

#[derive(Parser)]
#[command(name = "pk")]
#[command(author, version, about = "Pustakalaya staff console CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the identity
    Login {
        /// Staff email address
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long, env = "PUSTAKALAYA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored identity
    Logout,
    /// Show who is signed in
    Whoami,
    /// Show the library counters
    Stats,
    /// List records of one kind
    List {
        #[arg(value_enum)]
        resource: ResourceArg,

        /// Case-insensitive filter over the searchable fields
        #[arg(short, long, default_value = "")]
        search: String,

        /// 1-based page of ten records
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Delete one record
    Delete {
        #[arg(value_enum)]
        resource: ResourceArg,

        /// Record id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Record a transfer of copies to another location
    Transfer {
        /// Source book id
        #[arg(short, long)]
        book: String,

        /// Copies to move
        #[arg(short, long, default_value = "1")]
        count: String,

        /// Where the copies go
        #[arg(short, long)]
        destination: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading any PUSTAKALAYA_* variable
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pustakalaya_console=warn,pustakalaya_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut ctx = Context::from_env()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&mut ctx, email, password).await?;
        }
        Commands::Logout => commands::session::logout(&mut ctx)?,
        Commands::Whoami => commands::session::whoami(&ctx)?,
        Commands::Stats => commands::stats::show(&ctx).await?,
        Commands::List {
            resource,
            search,
            page,
        } => commands::records::list(&ctx, resource, &search, page).await?,
        Commands::Delete { resource, id, yes } => {
            commands::records::delete(&ctx, resource, id, yes).await?;
        }
        Commands::Transfer {
            book,
            count,
            destination,
        } => commands::transfer::record(&ctx, book, count, destination).await?,
    }
    Ok(())
}
