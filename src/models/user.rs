//! User model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity, identified by a case-sensitive username.
///
/// The password field holds the argon2 hash, never the plaintext; hashing
/// happens in the auth service (or the loader) before construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Username (unique, case-sensitive)
    pub username: String,
    /// Password hash (PHC string)
    #[serde(skip_serializing)]
    pub password: String,
    /// Ids of the comments authored by this user, in arrival order
    #[serde(default)]
    pub comments: Vec<Uuid>,
}

impl User {
    /// Create a new user with no comments
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            comments: Vec::new(),
        }
    }

    /// Record a comment back-reference on the user side
    pub fn add_comment(&mut self, comment_id: Uuid) {
        self.comments.push(comment_id);
    }

    /// Number of comments authored by this user
    pub fn number_of_comments(&self) -> usize {
        self.comments.len()
    }
}
