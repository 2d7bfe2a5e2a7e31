//! Domain model
//!
//! Entities (Article, Tag, User, Comment) and the association helpers that
//! establish their bidirectional links. Back-references are lightweight
//! identifiers resolved through the repository, so the entities themselves
//! stay acyclic and owned by the store.

mod article;
mod comment;
mod tag;
mod user;

pub use article::Article;
pub use comment::{make_comment, Comment};
pub use tag::{make_tag_association, Tag};
pub use user::User;

/// Error raised on invalid domain-level association attempts
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The article already carries this tag
    #[error("article {article_id:?} is already tagged with '{tag}'")]
    DuplicateTagAssociation {
        /// Name of the tag involved
        tag: String,
        /// Id of the article, when it has one
        article_id: Option<i64>,
    },
}
