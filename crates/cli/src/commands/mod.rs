//! Command implementations.
//!
//! Every command runs against the same controllers the browser console
//! uses, so filtering, paging, validation, and the messages shown on
//! failure match the console exactly.

pub mod records;
pub mod session;
pub mod stats;
pub mod transfer;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::ValueEnum;
use pustakalaya_console::config::{ApiConfig, ConfigError, session_file_from_env};
use pustakalaya_console::controller::SubmitError;
use pustakalaya_console::gateway::{ApiClient, GatewayError};
use pustakalaya_console::session::{FileIdentityStore, LoginError, SessionHolder};
use pustakalaya_core::{ResourceKind, Session};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Gateway(#[from] GatewayError),

    #[error("{}", .0.user_message())]
    Login(#[from] LoginError),

    #[error("{}", .0.user_message())]
    Submit(#[from] SubmitError),

    /// No stored identity.
    #[error("Not logged in. Run `pk login` first.")]
    NotLoggedIn,

    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Resource kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceArg {
    Books,
    Donors,
    Librarians,
    Transfers,
}

impl From<ResourceArg> for ResourceKind {
    fn from(arg: ResourceArg) -> Self {
        match arg {
            ResourceArg::Books => Self::Book,
            ResourceArg::Donors => Self::Donor,
            ResourceArg::Librarians => Self::Librarian,
            ResourceArg::Transfers => Self::Transfer,
        }
    }
}

/// API client and session shared by every command.
pub struct Context {
    pub api: Arc<ApiClient>,
    pub session: SessionHolder,
}

impl Context {
    /// Build the client from `PUSTAKALAYA_*` variables and restore the
    /// stored identity.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` if the API settings are missing or invalid.
    pub fn from_env() -> Result<Self, CliError> {
        let api = ApiClient::new(&ApiConfig::from_env()?)?;
        let store = FileIdentityStore::new(session_file_from_env());
        tracing::debug!(path = %store.path().display(), "Using session file");

        let mut session = SessionHolder::new(Box::new(store));
        session.restore();

        Ok(Self {
            api: Arc::new(api),
            session,
        })
    }

    /// The signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns `CliError::NotLoggedIn` without one.
    pub fn require_session(&self) -> Result<&Session, CliError> {
        self.session.current().ok_or(CliError::NotLoggedIn)
    }
}

/// Ask `prompt` on stderr and read a yes/no answer from stdin.
///
/// # Errors
///
/// Returns an I/O error if the terminal cannot be read.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{prompt} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
