//! Staff login endpoint.

use async_trait::async_trait;
use pustakalaya_core::Session;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{ApiClient, Authenticator, GatewayError};

const SCRIPT: &str = "p_login_web.php";

/// Fallback shown when the server refuses a login without a message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Staff login credentials.
///
/// Implements `Debug` manually to redact the password.
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Whether both fields were filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError> {
        let url = self.endpoint(SCRIPT, &[])?;
        let body = serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password.expose_secret(),
        });
        self.post_data(url, &body, LOGIN_FAILED_MESSAGE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("asha@pustakalaya.org", "kathmandu-2024");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("asha@pustakalaya.org"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("kathmandu-2024"));
    }

    #[test]
    fn test_credentials_completeness() {
        assert!(Credentials::new("a@b.c", "pw").is_complete());
        assert!(!Credentials::new("  ", "pw").is_complete());
        assert!(!Credentials::new("a@b.c", "").is_complete());
    }
}
