//! The signed-in staff identity and where it is kept between runs.
//!
//! [`SessionHolder`] is the single owner of the current [`Session`]. It is
//! restored once at start from an [`IdentityStore`], replaced on login, and
//! cleared on logout. Only the identity is stored; the remote API keeps no
//! server-side session for the console.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pustakalaya_core::Session;
use thiserror::Error;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::gateway::{Authenticator, Credentials, GatewayError};

/// Errors reading or writing the persisted identity.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("session record is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable storage for one identity record.
pub trait IdentityStore: Send + Sync {
    /// The stored identity, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if a record exists but cannot be read.
    fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Overwrite the stored identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove the stored identity. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Keeps the identity as a JSON file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Keeps the identity only for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    record: std::sync::Mutex<Option<Session>>,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // A poisoned lock still holds a valid record.
        self.record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.record().clone())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.record() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.record() = None;
        Ok(())
    }
}

/// Errors from a login attempt.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Email or password was left blank; nothing was sent.
    #[error("Please enter both email and password")]
    Incomplete,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl LoginError {
    /// Text shown under the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Incomplete => self.to_string(),
            Self::Gateway(e) => e.user_message(),
        }
    }
}

/// Owner of the current session.
pub struct SessionHolder {
    store: Box<dyn IdentityStore>,
    current: Option<Session>,
}

impl std::fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHolder")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SessionHolder {
    /// A holder with no session. Call [`restore`](Self::restore) to pick up a
    /// stored one.
    #[must_use]
    pub fn new(store: Box<dyn IdentityStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Load the stored identity, if there is a readable one.
    ///
    /// An unreadable record is removed and treated as logged out.
    pub fn restore(&mut self) -> Option<&Session> {
        self.current = match self.store.load() {
            Ok(session) => session,
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable session record");
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "Failed to remove unreadable session record");
                }
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session record");
                None
            }
        };

        if let Some(session) = &self.current {
            tracing::info!(user_id = %session.user_id, "Session restored");
            set_sentry_user(session);
        }
        self.current.as_ref()
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Authenticate and store the resulting identity.
    ///
    /// If the identity cannot be written to the store the session still
    /// holds for this process.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Incomplete` if a credential is blank, or the
    /// gateway error. A session that existed before the attempt is kept.
    #[instrument(skip(self, authenticator, credentials), fields(email = %credentials.email.trim()))]
    pub async fn login(
        &mut self,
        authenticator: &dyn Authenticator,
        credentials: Credentials,
    ) -> Result<&Session, LoginError> {
        if !credentials.is_complete() {
            return Err(LoginError::Incomplete);
        }

        let session = match authenticator.login(&credentials).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "Failed to persist session; it will not survive a restart");
        }
        tracing::info!(user_id = %session.user_id, role = %session.role, "Logged in");
        set_sentry_user(&session);
        Ok(self.current.insert(session))
    }

    /// End the session in memory and in the store. Safe to call repeatedly.
    pub fn logout(&mut self) {
        if let Some(session) = &self.current {
            tracing::info!(user_id = %session.user_id, "Logged out");
        }
        self.forget();
    }

    fn forget(&mut self) {
        self.current = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to remove session record");
        }
        clear_sentry_user();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use pustakalaya_core::Role;

    use super::*;

    fn session() -> Session {
        serde_json::from_value(serde_json::json!({
            "id": 7, "email": "maya@pustakalaya.org", "name": "Maya", "role": "librarian"
        }))
        .unwrap()
    }

    struct Fixed(Result<Session, &'static str>);

    #[async_trait]
    impl Authenticator for Fixed {
        async fn login(&self, _: &Credentials) -> Result<Session, GatewayError> {
            self.0
                .clone()
                .map_err(|m| GatewayError::Rejected(m.to_string()))
        }
    }

    struct ReadOnlyStore;

    impl IdentityStore for ReadOnlyStore {
        fn load(&self) -> Result<Option<Session>, StoreError> {
            Ok(None)
        }

        fn save(&self, _: &Session) -> Result<(), StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("maya@pustakalaya.org", "pa55")
    }

    #[tokio::test]
    async fn test_login_persists_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");
        let mut holder = SessionHolder::new(Box::new(FileIdentityStore::new(&path)));

        let logged_in = holder
            .login(&Fixed(Ok(session())), credentials())
            .await
            .unwrap();
        assert_eq!(logged_in.display_name, "Maya");

        let mut restored = SessionHolder::new(Box::new(FileIdentityStore::new(&path)));
        let restored = restored.restore().unwrap();
        assert_eq!(restored.role, Role::Librarian);
        assert_eq!(restored.user_id.as_str(), "7");
    }

    #[tokio::test]
    async fn test_failed_login_creates_no_session() {
        let mut holder = SessionHolder::new(Box::new(MemoryIdentityStore::new()));

        let err = holder
            .login(&Fixed(Err("Invalid email or password")), credentials())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(holder.current().is_none());
        assert!(holder.store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let store = MemoryIdentityStore::new();
        store.save(&session()).unwrap();
        let mut holder = SessionHolder::new(Box::new(store));
        holder.restore();

        holder
            .login(&Fixed(Err("Invalid email or password")), credentials())
            .await
            .unwrap_err();
        holder
            .login(&Fixed(Ok(session())), Credentials::new("", ""))
            .await
            .unwrap_err();

        assert_eq!(holder.current().unwrap().display_name, "Maya");
        assert!(holder.store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        let mut holder = SessionHolder::new(Box::new(MemoryIdentityStore::new()));
        let err = holder
            .login(&Fixed(Ok(session())), Credentials::new("  ", "pa55"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Incomplete));
        assert!(!holder.is_logged_in());
    }

    #[tokio::test]
    async fn test_unwritable_store_keeps_session_in_memory() {
        let mut holder = SessionHolder::new(Box::new(ReadOnlyStore));
        holder
            .login(&Fixed(Ok(session())), credentials())
            .await
            .unwrap();
        assert!(holder.is_logged_in());
    }

    #[test]
    fn test_corrupt_record_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();

        let mut holder = SessionHolder::new(Box::new(FileIdentityStore::new(&path)));
        assert!(holder.restore().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileIdentityStore::new(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let mut holder = SessionHolder::new(Box::new(store.clone()));
        holder.restore();
        holder.logout();
        holder.logout();

        assert!(holder.current().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_missing_record_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileIdentityStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
        assert!(store.clear().is_ok());
    }
}
