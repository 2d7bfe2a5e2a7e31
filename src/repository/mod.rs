//! Repository layer
//!
//! This module provides:
//! - `MovieRepository` trait defining ordered and indexed access to the
//!   article, tag, user and comment collections
//! - `MemoryRepository` implementing the trait over in-memory collections
//!
//! Absence is never an error at this layer: lookups return `Option`/empty
//! vectors. The one active invariant is `add_comment`, which refuses a
//! comment whose user and article do not already reference it.

pub mod memory;

pub use memory::MemoryRepository;

use chrono::NaiveDate;

use crate::models::{Article, Comment, Tag, User};

/// Error raised when a repository operation would corrupt the store.
///
/// Only `add_comment` enforces an invariant; everything else treats absence
/// as an empty result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The comment names no user, or its user does not reference it
    #[error("comment is not correctly attached to a user")]
    CommentNotAttachedToUser,

    /// The comment names no article, or its article does not reference it
    #[error("comment is not correctly attached to an article")]
    CommentNotAttachedToArticle,
}

/// Ordered and indexed access to the blog's collections.
///
/// Articles are kept sorted by date to support range and neighbor queries;
/// an id index backs direct lookups. The model is single-threaded and
/// synchronous: mutation goes through `&mut self` and nothing blocks.
pub trait MovieRepository {
    /// Append a user. Username uniqueness is the auth service's concern.
    fn add_user(&mut self, user: User);

    /// Find a user by exact, case-sensitive username match
    fn get_user(&self, username: &str) -> Option<&User>;

    /// Mutable variant of `get_user`, for establishing comment back-references
    fn get_user_mut(&mut self, username: &str) -> Option<&mut User>;

    /// Insert an article at its date-ordered position and index it by id.
    ///
    /// An article without an id is assigned the next free one. Re-adding an
    /// existing id overwrites the indexed entry.
    fn add_article(&mut self, article: Article);

    /// Look up an article by id
    fn get_article(&self, id: i64) -> Option<&Article>;

    /// Mutable variant of `get_article`, for establishing comment back-references
    fn get_article_mut(&mut self, id: i64) -> Option<&mut Article>;

    /// All articles published on the given date, in storage order.
    /// Empty when no article matches.
    fn get_articles_by_date(&self, date: NaiveDate) -> Vec<&Article>;

    /// Number of stored articles
    fn get_number_of_articles(&self) -> usize;

    /// The earliest-dated article, when any are stored
    fn get_first_article(&self) -> Option<&Article>;

    /// The latest-dated article, when any are stored
    fn get_last_article(&self) -> Option<&Article>;

    /// The articles for the given ids, preserving input order.
    /// Unknown ids are silently dropped.
    fn get_articles_by_id(&self, ids: &[i64]) -> Vec<&Article>;

    /// Ids of all articles carrying the named tag; empty when the tag is
    /// unknown
    fn get_article_ids_for_tag(&self, tag_name: &str) -> Vec<i64>;

    /// The greatest stored date strictly before the article's date, or
    /// `None` when the article is the earliest or its date is not stored
    fn get_date_of_previous_article(&self, article: &Article) -> Option<NaiveDate>;

    /// The least stored date strictly after the article's date, or `None`
    /// when the article is the latest or its date is not stored
    fn get_date_of_next_article(&self, article: &Article) -> Option<NaiveDate>;

    /// Append a tag
    fn add_tag(&mut self, tag: Tag);

    /// All tags
    fn get_tags(&self) -> &[Tag];

    /// Append a comment.
    ///
    /// The comment must already be cross-linked: its user and its article
    /// must both be stored and reference the comment's id. Anything else is
    /// a caller-side bug in association ordering and is rejected.
    fn add_comment(&mut self, comment: Comment) -> Result<(), RepositoryError>;

    /// All comments
    fn get_comments(&self) -> &[Comment];
}
