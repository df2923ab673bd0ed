// Registration, login, and password-reset requests
//
// Validation failures surface immediately as typed errors; nothing here
// retries. Passwords are stored as SHA-256 hex digests.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::db::{KvStore, UserRepository};
use crate::entities::User;
use crate::session::Session;

/// Validation failures surfaced directly to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Registration with an email that already has an account.
    EmailTaken(String),
    /// Login with an unknown email or a wrong password.
    InvalidCredentials,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::EmailTaken(email) => write!(f, "email already registered: {}", email),
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub center_name: String,
    pub address: String,
    pub email: String,
    pub password: String,
}

/// Register a new center and log it in.
///
/// Rejects a duplicate email with `AuthError::EmailTaken`; otherwise the new
/// account is appended to the collection, persisted, and mirrored as the
/// active session.
pub fn register<S: KvStore>(
    repo: &mut UserRepository<S>,
    form: Registration,
    at: DateTime<Utc>,
) -> Result<Session> {
    let mut users = repo.load_users()?;

    if users.iter().any(|u| u.email == form.email) {
        return Err(AuthError::EmailTaken(form.email).into());
    }

    let user = User::new(
        form.center_name,
        form.address,
        form.email,
        hash_password(&form.password),
        at,
    );

    users.push(user.clone());
    repo.save_users(&users)?;
    repo.save_session(&user)?;

    Ok(Session::new(user))
}

/// Log in with email and password. Failure is `AuthError::InvalidCredentials`
/// regardless of which half was wrong.
pub fn login<S: KvStore>(
    repo: &mut UserRepository<S>,
    email: &str,
    password: &str,
) -> Result<Session> {
    let hash = hash_password(password);
    let user = repo
        .load_users()?
        .into_iter()
        .find(|u| u.email == email && u.password_hash == hash)
        .ok_or(AuthError::InvalidCredentials)?;

    repo.save_session(&user)?;
    Ok(Session::new(user))
}

/// Drop the session mirror. The collection document is untouched.
pub fn logout<S: KvStore>(repo: &mut UserRepository<S>) -> Result<()> {
    repo.clear_session()
}

/// Restore a session persisted by an earlier run, if any.
pub fn restore_session<S: KvStore>(repo: &UserRepository<S>) -> Result<Option<Session>> {
    Ok(repo.load_session()?.map(Session::new))
}

/// Outcome of a password-reset request. Email delivery is simulated; the
/// message never reveals whether the account exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    pub email: String,
    pub account_exists: bool,
}

impl ResetRequest {
    pub fn message(&self) -> String {
        format!(
            "If an account exists for {}, a password reset link has been sent.",
            self.email
        )
    }
}

pub fn request_password_reset<S: KvStore>(
    repo: &UserRepository<S>,
    email: &str,
) -> Result<ResetRequest> {
    let account_exists = repo.find_by_email(email)?.is_some();
    Ok(ResetRequest {
        email: email.to_string(),
        account_exists,
    })
}
