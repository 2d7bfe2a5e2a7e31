//! Tag model
//!
//! Tags categorize articles. A tag holds non-owning back-references (article
//! ids) to the articles it is applied to; the article side tracks the tag by
//! name. `make_tag_association` keeps both sides in sync and rejects
//! duplicate links.

use serde::{Deserialize, Serialize};

use super::{Article, ModelError};

/// Tag entity, identified by its name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Tag name (identity)
    pub name: String,
    /// Ids of the articles this tag is applied to
    #[serde(default)]
    pub tagged_articles: Vec<i64>,
}

impl Tag {
    /// Create a new tag with no associated articles
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tagged_articles: Vec::new(),
        }
    }

    /// Whether this tag is applied to the given article
    pub fn is_applied_to(&self, article: &Article) -> bool {
        article
            .id
            .map(|id| self.tagged_articles.contains(&id))
            .unwrap_or(false)
    }

    /// Number of articles this tag is applied to
    pub fn number_of_tagged_articles(&self) -> usize {
        self.tagged_articles.len()
    }
}

/// Establish the bidirectional link between an article and a tag.
///
/// Fails when the article already carries the tag; the first association
/// wins and later attempts are a caller bug.
pub fn make_tag_association(article: &mut Article, tag: &mut Tag) -> Result<(), ModelError> {
    if article.is_tagged_by(tag) {
        return Err(ModelError::DuplicateTagAssociation {
            tag: tag.name.clone(),
            article_id: article.id,
        });
    }

    article.add_tag(tag.name.clone());
    if let Some(id) = article.id {
        tag.tagged_articles.push(id);
    }

    Ok(())
}
