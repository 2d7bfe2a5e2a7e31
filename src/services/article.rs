//! Article service
//!
//! Translates repository lookups into serializable views for the
//! presentation layer and converts absence into typed errors where an
//! operation requires existence. No state of its own: every function takes
//! the repository it operates on, as the store is single-threaded.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Article, Comment};
use crate::repository::{MovieRepository, RepositoryError};

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// No article with the requested id
    #[error("article {0} does not exist")]
    NonExistentArticle(i64),

    /// The repository holds no articles at all
    #[error("no articles are stored")]
    NoArticles,

    /// No user with the requested username
    #[error("user '{0}' is unknown")]
    UnknownUser(String),

    /// The repository rejected a comment; indicates a service-layer bug
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Serializable article view, the contract towards the web layer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArticleView {
    pub id: i64,
    pub date: NaiveDate,
    pub title: String,
    pub first_para: String,
    pub hyperlink: String,
    pub image_hyperlink: String,
    pub comments: Vec<CommentView>,
    pub tags: Vec<TagView>,
}

/// Serializable comment view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentView {
    pub comment_text: String,
    pub username: String,
    pub article_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// Serializable tag view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TagView {
    pub name: String,
}

fn comment_view(comment: &Comment) -> Option<CommentView> {
    Some(CommentView {
        comment_text: comment.text.clone(),
        username: comment.username.clone()?,
        article_id: comment.article_id?,
        timestamp: comment.timestamp,
    })
}

fn article_view(article: &Article, repo: &dyn MovieRepository) -> Option<ArticleView> {
    let comments = repo
        .get_comments()
        .iter()
        .filter(|comment| article.comments.contains(&comment.id))
        .filter_map(comment_view)
        .collect();

    let tags = article
        .tags
        .iter()
        .map(|name| TagView { name: name.clone() })
        .collect();

    Some(ArticleView {
        id: article.id?,
        date: article.date,
        title: article.title.clone(),
        first_para: article.first_para.clone(),
        hyperlink: article.hyperlink.clone(),
        image_hyperlink: article.image_hyperlink.clone(),
        comments,
        tags,
    })
}

/// Fetch a single article by id.
pub fn get_article(
    id: i64,
    repo: &dyn MovieRepository,
) -> Result<ArticleView, ArticleServiceError> {
    let article = repo
        .get_article(id)
        .ok_or(ArticleServiceError::NonExistentArticle(id))?;

    article_view(article, repo).ok_or(ArticleServiceError::NonExistentArticle(id))
}

/// The earliest-dated article.
pub fn get_first_article(
    repo: &dyn MovieRepository,
) -> Result<ArticleView, ArticleServiceError> {
    let article = repo.get_first_article().ok_or(ArticleServiceError::NoArticles)?;
    article_view(article, repo).ok_or(ArticleServiceError::NoArticles)
}

/// The latest-dated article.
pub fn get_last_article(
    repo: &dyn MovieRepository,
) -> Result<ArticleView, ArticleServiceError> {
    let article = repo.get_last_article().ok_or(ArticleServiceError::NoArticles)?;
    article_view(article, repo).ok_or(ArticleServiceError::NoArticles)
}

/// All articles on a date, plus the nearest earlier and later publish dates.
///
/// A date with no articles yields an empty list and no neighbor dates; that
/// is an expected miss, not an error.
pub fn get_articles_by_date(
    date: NaiveDate,
    repo: &dyn MovieRepository,
) -> (Vec<ArticleView>, Option<NaiveDate>, Option<NaiveDate>) {
    let matching = repo.get_articles_by_date(date);

    let (prev_date, next_date) = match matching.first() {
        Some(first) => (
            repo.get_date_of_previous_article(first),
            repo.get_date_of_next_article(first),
        ),
        None => (None, None),
    };

    let views = matching
        .iter()
        .filter_map(|article| article_view(article, repo))
        .collect();

    (views, prev_date, next_date)
}

/// The articles for the given ids; unknown ids are silently dropped.
pub fn get_articles_by_id(ids: &[i64], repo: &dyn MovieRepository) -> Vec<ArticleView> {
    repo.get_articles_by_id(ids)
        .iter()
        .filter_map(|article| article_view(article, repo))
        .collect()
}

/// Ids of the articles carrying the named tag; empty for an unknown tag.
pub fn get_article_ids_for_tag(tag_name: &str, repo: &dyn MovieRepository) -> Vec<i64> {
    repo.get_article_ids_for_tag(tag_name)
}

/// All tags, as views.
pub fn get_tags(repo: &dyn MovieRepository) -> Vec<TagView> {
    repo.get_tags()
        .iter()
        .map(|tag| TagView {
            name: tag.name.clone(),
        })
        .collect()
}

/// The comments attached to an article, in arrival order.
pub fn get_comments_for_article(
    article_id: i64,
    repo: &dyn MovieRepository,
) -> Result<Vec<CommentView>, ArticleServiceError> {
    let article = repo
        .get_article(article_id)
        .ok_or(ArticleServiceError::NonExistentArticle(article_id))?;

    Ok(repo
        .get_comments()
        .iter()
        .filter(|comment| article.comments.contains(&comment.id))
        .filter_map(comment_view)
        .collect())
}

/// Post a comment on an article.
///
/// Checks existence of both the article and the user, establishes the
/// back-references on the stored objects, then hands the comment to the
/// repository, whose linkage check is the final safety net.
pub fn add_comment(
    article_id: i64,
    text: &str,
    username: &str,
    repo: &mut dyn MovieRepository,
) -> Result<(), ArticleServiceError> {
    if repo.get_article(article_id).is_none() {
        return Err(ArticleServiceError::NonExistentArticle(article_id));
    }
    if repo.get_user(username).is_none() {
        return Err(ArticleServiceError::UnknownUser(username.to_string()));
    }

    let comment = Comment::new(
        Some(username.to_string()),
        Some(article_id),
        text,
        Utc::now(),
    );

    if let Some(user) = repo.get_user_mut(username) {
        user.add_comment(comment.id);
    }
    if let Some(article) = repo.get_article_mut(article_id) {
        article.add_comment(comment.id);
    }

    repo.add_comment(comment)?;
    Ok(())
}
