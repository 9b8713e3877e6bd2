//! `pk login`, `pk logout`, and `pk whoami`.

use std::io::{self, BufRead, Write};

use pustakalaya_console::gateway::Credentials;

use super::{CliError, Context};
use crate::output;

/// Sign in and store the identity.
///
/// # Errors
///
/// Returns the login error, or an I/O error if the password prompt fails.
pub async fn login(
    ctx: &mut Context,
    email: String,
    password: Option<String>,
) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let api = ctx.api.clone();
    let session = ctx
        .session
        .login(api.as_ref(), Credentials::new(email, password))
        .await?;
    output::line(&format!(
        "Logged in as {} ({})",
        session.display_name,
        session.role.label()
    ))?;
    Ok(())
}

/// Forget the stored identity. Succeeds when no one is signed in.
///
/// # Errors
///
/// Returns an I/O error if stdout cannot be written.
pub fn logout(ctx: &mut Context) -> Result<(), CliError> {
    let was_logged_in = ctx.session.is_logged_in();
    ctx.session.logout();
    output::line(if was_logged_in {
        "Logged out"
    } else {
        "Not logged in"
    })?;
    Ok(())
}

/// Print the signed-in identity.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` without one.
pub fn whoami(ctx: &Context) -> Result<(), CliError> {
    let session = ctx.require_session()?;
    output::line(&format!(
        "{} <{}> - {}",
        session.display_name,
        session.email,
        session.role.label()
    ))?;
    Ok(())
}

fn read_password() -> io::Result<String> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}
