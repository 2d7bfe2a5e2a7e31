//! Authentication service
//!
//! Registration, lookup and credential checks over the repository's user
//! collection. Username uniqueness lives here, not in the repository; the
//! store itself appends users unconditionally.

use serde::Serialize;

use crate::models::User;
use crate::repository::MovieRepository;
use crate::services::password::{hash_password, verify_password};

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// The username is already taken
    #[error("username '{0}' is already taken")]
    NameNotUnique(String),

    /// No user with the requested username
    #[error("user '{0}' is unknown")]
    UnknownUser(String),

    /// The password does not match the stored hash
    #[error("authentication failed for user '{0}'")]
    AuthenticationFailed(String),

    /// Hashing or verification failed
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Serializable user view; the password field carries the hash
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub username: String,
    pub password: String,
}

/// Register a new user, hashing the password before storage.
pub fn add_user(
    username: &str,
    password: &str,
    repo: &mut dyn MovieRepository,
) -> Result<(), AuthServiceError> {
    if repo.get_user(username).is_some() {
        return Err(AuthServiceError::NameNotUnique(username.to_string()));
    }

    let password_hash = hash_password(password)?;
    repo.add_user(User::new(username, password_hash));
    Ok(())
}

/// Fetch a user as a view.
pub fn get_user(
    username: &str,
    repo: &dyn MovieRepository,
) -> Result<UserView, AuthServiceError> {
    let user = repo
        .get_user(username)
        .ok_or_else(|| AuthServiceError::UnknownUser(username.to_string()))?;

    Ok(UserView {
        username: user.username.clone(),
        password: user.password.clone(),
    })
}

/// Check a username/password pair against the stored hash.
pub fn authenticate_user(
    username: &str,
    password: &str,
    repo: &dyn MovieRepository,
) -> Result<(), AuthServiceError> {
    let user = repo
        .get_user(username)
        .ok_or_else(|| AuthServiceError::UnknownUser(username.to_string()))?;

    if verify_password(password, &user.password)? {
        Ok(())
    } else {
        Err(AuthServiceError::AuthenticationFailed(username.to_string()))
    }
}
