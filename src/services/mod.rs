//! Services layer
//!
//! Validation, absence-to-error conversion and domain-to-view translation
//! between the repository and any presentation layer. Services hold no
//! state; each function takes the repository it works against.

pub mod article;
pub mod auth;
pub mod password;

pub use article::{ArticleServiceError, ArticleView, CommentView, TagView};
pub use auth::{AuthServiceError, UserView};
pub use password::{hash_password, verify_password};
