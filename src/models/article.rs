//! Article model
//!
//! An article is the primary timeline entity: a single movie news item with
//! a publish date that drives the repository's storage order. Tag and
//! comment associations are held as lightweight identifiers (tag names and
//! comment ids) resolved through the repository.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    /// Unique identifier; absent until the article is added to a repository
    pub id: Option<i64>,
    /// Publish date, the primary sort key
    pub date: NaiveDate,
    /// Article title
    pub title: String,
    /// Summary paragraph
    pub first_para: String,
    /// Link to the full story
    pub hyperlink: String,
    /// Link to the cover image
    pub image_hyperlink: String,
    /// Names of the tags applied to this article
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Ids of the comments attached to this article, in arrival order
    #[serde(default)]
    pub comments: Vec<Uuid>,
}

impl Article {
    /// Create a new article without an id.
    ///
    /// The id is assigned when the article is added to a repository.
    pub fn new(
        date: NaiveDate,
        title: impl Into<String>,
        first_para: impl Into<String>,
        hyperlink: impl Into<String>,
        image_hyperlink: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            date,
            title: title.into(),
            first_para: first_para.into(),
            hyperlink: hyperlink.into(),
            image_hyperlink: image_hyperlink.into(),
            tags: BTreeSet::new(),
            comments: Vec::new(),
        }
    }

    /// Set the id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Record a tag association on the article side.
    ///
    /// Callers should go through `make_tag_association`, which rejects
    /// duplicates and keeps the tag side in sync.
    pub fn add_tag(&mut self, tag_name: impl Into<String>) {
        self.tags.insert(tag_name.into());
    }

    /// Record a comment back-reference on the article side
    pub fn add_comment(&mut self, comment_id: Uuid) {
        self.comments.push(comment_id);
    }

    /// Whether any tag is applied to this article
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Whether the given tag is applied to this article
    pub fn is_tagged_by(&self, tag: &super::Tag) -> bool {
        self.tags.contains(&tag.name)
    }

    /// Number of tags applied to this article
    pub fn number_of_tags(&self) -> usize {
        self.tags.len()
    }

    /// Number of comments attached to this article
    pub fn number_of_comments(&self) -> usize {
        self.comments.len()
    }
}
