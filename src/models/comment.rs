//! Comment model
//!
//! A comment is user-authored text attached to exactly one article and one
//! user. It carries its own identity (a v4 uuid) so that users and articles
//! can hold back-references without embedding the comment itself. A comment
//! is only valid once both sides reference it; `make_comment` establishes
//! the links atomically from the caller's perspective, and the repository
//! refuses comments that skipped it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Article, User};

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier, assigned at construction
    pub id: Uuid,
    /// Username of the author; required for the comment to be storable
    pub username: Option<String>,
    /// Id of the target article; required for the comment to be storable
    pub article_id: Option<i64>,
    /// Comment text
    pub text: String,
    /// When the comment was made
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Construct a comment without establishing any back-references.
    ///
    /// Prefer `make_comment`, which also links the user and article sides.
    pub fn new(
        username: Option<String>,
        article_id: Option<i64>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            article_id,
            text: text.into(),
            timestamp,
        }
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Construct a comment and establish both back-references.
///
/// After this returns, the user and the article each hold the comment's id,
/// so no partially-linked comment is ever observable.
pub fn make_comment(
    text: impl Into<String>,
    user: &mut User,
    article: &mut Article,
    timestamp: DateTime<Utc>,
) -> Comment {
    let comment = Comment::new(
        Some(user.username.clone()),
        article.id,
        text,
        timestamp,
    );

    user.add_comment(comment.id);
    article.add_comment(comment.id);

    comment
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_article() -> Article {
        Article::new(
            NaiveDate::from_ymd_opt(2007, 2, 2).unwrap(),
            "The Devil Wears Prada (2006) - 6/10",
            "A smart but sensible new graduate lands a job as an assistant.",
            "https://www.imdb.com/find?q=The+Devil+Wears+Prada",
            "https://example.org/cover.png",
        )
        .with_id(298)
    }

    #[test]
    fn test_make_comment_establishes_relationships() {
        let mut user = User::new("dbowie", "1234567890");
        let mut article = sample_article();

        let comment = make_comment("Awesome Movie!", &mut user, &mut article, Utc::now());

        // The user knows about the comment, and the comment about the user.
        assert!(user.comments.contains(&comment.id));
        assert_eq!(comment.username.as_deref(), Some("dbowie"));

        // The article knows about the comment, and the comment about the article.
        assert!(article.comments.contains(&comment.id));
        assert_eq!(comment.article_id, Some(298));
    }

    #[test]
    fn test_comment_equality_is_by_id() {
        let now = Utc::now();
        let a = Comment::new(Some("dbowie".into()), Some(1), "Wow!", now);
        let b = Comment::new(Some("dbowie".into()), Some(1), "Wow!", now);

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
