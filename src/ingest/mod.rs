//! Dataset ingestion
//!
//! Loads the three flat CSV files (articles+tags, users, comments) and
//! populates a repository. Associations are established while the objects
//! are still owned by the loader; everything is added to the repository only
//! once fully linked, so the repository's comment-linkage check always holds
//! for a well-formed dataset.
//!
//! Row shapes (header-addressed, extra columns ignored):
//! - articles: `id,date,title,first_para,hyperlink,image_hyperlink,tags`
//!   where `tags` is a comma-separated list inside one field
//! - users: `id,username,password` (plaintext in the file, hashed at load)
//! - comments: `user_id,article_id,comment,timestamp`

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::config::DataConfig;
use crate::models::{make_comment, make_tag_association, Article, Comment, Tag, User};
use crate::repository::MovieRepository;
use crate::services::password::hash_password;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct ArticleRow {
    id: i64,
    date: NaiveDate,
    title: String,
    first_para: String,
    hyperlink: String,
    image_hyperlink: String,
    tags: String,
}

#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct CommentRow {
    user_id: String,
    article_id: i64,
    comment: String,
    timestamp: String,
}

fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Load the dataset from `data` into `repo`.
pub fn populate(data: &DataConfig, repo: &mut dyn MovieRepository) -> Result<()> {
    let (mut articles, tag_map) = load_articles_and_tags(&data.path.join(&data.articles_file))?;
    let tags = build_tags(&mut articles, tag_map)?;
    let mut users = load_users(&data.path.join(&data.users_file))?;
    let comments = load_comments(&data.path.join(&data.comments_file), &mut users, &mut articles)?;

    tracing::debug!(
        articles = articles.len(),
        tags = tags.len(),
        users = users.len(),
        comments = comments.len(),
        "dataset parsed, filling repository"
    );

    for article in articles.into_values() {
        repo.add_article(article);
    }
    for tag in tags {
        repo.add_tag(tag);
    }
    for user in users.into_values() {
        repo.add_user(user);
    }
    for comment in comments {
        repo.add_comment(comment)
            .context("comment row is not fully linked")?;
    }

    Ok(())
}

/// Parse the articles file into owned articles plus a tag-name to
/// article-ids map.
fn load_articles_and_tags(
    path: &Path,
) -> Result<(BTreeMap<i64, Article>, BTreeMap<String, Vec<i64>>)> {
    let mut articles = BTreeMap::new();
    let mut tag_map: BTreeMap<String, Vec<i64>> = BTreeMap::new();

    for row in csv_reader(path)?.deserialize::<ArticleRow>() {
        let row = row.with_context(|| format!("bad article row in {}", path.display()))?;

        for tag_name in row.tags.split(',') {
            let tag_name = tag_name.trim();
            if !tag_name.is_empty() {
                tag_map.entry(tag_name.to_string()).or_default().push(row.id);
            }
        }

        let article = Article::new(
            row.date,
            row.title,
            row.first_para,
            row.hyperlink,
            row.image_hyperlink,
        )
        .with_id(row.id);
        articles.insert(row.id, article);
    }

    Ok((articles, tag_map))
}

/// Turn the tag map into Tag objects, associating each with its articles.
fn build_tags(
    articles: &mut BTreeMap<i64, Article>,
    tag_map: BTreeMap<String, Vec<i64>>,
) -> Result<Vec<Tag>> {
    let mut tags = Vec::with_capacity(tag_map.len());

    for (name, article_ids) in tag_map {
        let mut tag = Tag::new(&name);
        for article_id in article_ids {
            let article = articles
                .get_mut(&article_id)
                .with_context(|| format!("tag '{name}' references unknown article {article_id}"))?;
            make_tag_association(article, &mut tag)
                .with_context(|| format!("duplicate tag '{name}' on article {article_id}"))?;
        }
        tags.push(tag);
    }

    Ok(tags)
}

/// Parse the users file, hashing each password. Keyed by the file's user id
/// so comment rows can refer back to their author.
fn load_users(path: &Path) -> Result<HashMap<String, User>> {
    let mut users = HashMap::new();

    for row in csv_reader(path)?.deserialize::<UserRow>() {
        let row = row.with_context(|| format!("bad user row in {}", path.display()))?;
        let password_hash = hash_password(&row.password)
            .with_context(|| format!("failed to hash password for user '{}'", row.username))?;
        users.insert(row.id, User::new(row.username, password_hash));
    }

    Ok(users)
}

/// Parse the comments file and link each comment to its (still owned) user
/// and article.
fn load_comments(
    path: &Path,
    users: &mut HashMap<String, User>,
    articles: &mut BTreeMap<i64, Article>,
) -> Result<Vec<Comment>> {
    let mut comments = Vec::new();

    for row in csv_reader(path)?.deserialize::<CommentRow>() {
        let row = row.with_context(|| format!("bad comment row in {}", path.display()))?;

        let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT)
            .with_context(|| format!("bad comment timestamp '{}'", row.timestamp))?
            .and_utc();
        let user = users
            .get_mut(&row.user_id)
            .with_context(|| format!("comment references unknown user '{}'", row.user_id))?;
        let article = articles
            .get_mut(&row.article_id)
            .with_context(|| format!("comment references unknown article {}", row.article_id))?;

        comments.push(make_comment(row.comment, user, article, timestamp));
    }

    Ok(comments)
}
