//! In-memory repository
//!
//! Articles are stored in a `HashMap` keyed by id, with a separate id vector
//! kept sorted by publish date. Insertion finds the leftmost position for
//! the new date with a binary search; date queries binary-search the same
//! vector and scan while the date matches. Tags, users and comments are
//! plain vectors scanned linearly.
//!
//! The whole structure is single-threaded: mutation goes through `&mut self`
//! and no synchronization exists or is needed.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Article, Comment, Tag, User};

use super::{MovieRepository, RepositoryError};

/// In-memory store for articles, tags, users and comments
#[derive(Debug, Default)]
pub struct MemoryRepository {
    /// Articles indexed by id
    articles: HashMap<i64, Article>,
    /// Article ids ordered by publish date
    order: Vec<i64>,
    tags: Vec<Tag>,
    users: Vec<User>,
    comments: Vec<Comment>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    fn date_of(&self, id: i64) -> Option<NaiveDate> {
        self.articles.get(&id).map(|article| article.date)
    }

    /// Leftmost position in the ordered id vector whose article has exactly
    /// the given date. `None` when no stored article matches, which also
    /// covers the empty store and dates past either end.
    fn leftmost_index(&self, date: NaiveDate) -> Option<usize> {
        let index = self
            .order
            .partition_point(|&id| self.date_of(id).is_some_and(|d| d < date));

        match self.order.get(index) {
            Some(&id) if self.date_of(id) == Some(date) => Some(index),
            _ => None,
        }
    }

    fn next_id(&self) -> i64 {
        self.articles.keys().copied().max().map_or(1, |max| max + 1)
    }
}

impl MovieRepository for MemoryRepository {
    fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    fn get_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    fn get_user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.username == username)
    }

    fn add_article(&mut self, mut article: Article) {
        let id = match article.id {
            Some(id) => id,
            None => {
                let id = self.next_id();
                article.id = Some(id);
                id
            }
        };

        // Re-adding an existing id replaces the stored article. Its old
        // order slot must go first: once the map entry is overwritten,
        // `date_of` would report the new date for the stale slot and the
        // vector would no longer be sorted.
        if let Some(previous_date) = self.date_of(id) {
            let run = self
                .order
                .partition_point(|&other| self.date_of(other).is_some_and(|d| d < previous_date));
            if let Some(offset) = self.order[run..].iter().position(|&other| other == id) {
                self.order.remove(run + offset);
            }
        }

        // Leftmost insertion keeps equal dates in a stable run.
        let position = self
            .order
            .partition_point(|&other| self.date_of(other).is_some_and(|d| d < article.date));
        self.order.insert(position, id);
        self.articles.insert(id, article);
    }

    fn get_article(&self, id: i64) -> Option<&Article> {
        self.articles.get(&id)
    }

    fn get_article_mut(&mut self, id: i64) -> Option<&mut Article> {
        self.articles.get_mut(&id)
    }

    fn get_articles_by_date(&self, date: NaiveDate) -> Vec<&Article> {
        let mut matching = Vec::new();

        if let Some(start) = self.leftmost_index(date) {
            for &id in &self.order[start..] {
                match self.articles.get(&id) {
                    Some(article) if article.date == date => matching.push(article),
                    _ => break,
                }
            }
        }

        matching
    }

    fn get_number_of_articles(&self) -> usize {
        self.order.len()
    }

    fn get_first_article(&self) -> Option<&Article> {
        self.order.first().and_then(|id| self.articles.get(id))
    }

    fn get_last_article(&self) -> Option<&Article> {
        self.order.last().and_then(|id| self.articles.get(id))
    }

    fn get_articles_by_id(&self, ids: &[i64]) -> Vec<&Article> {
        ids.iter().filter_map(|id| self.articles.get(id)).collect()
    }

    fn get_article_ids_for_tag(&self, tag_name: &str) -> Vec<i64> {
        self.tags
            .iter()
            .find(|tag| tag.name == tag_name)
            .map(|tag| tag.tagged_articles.clone())
            .unwrap_or_default()
    }

    fn get_date_of_previous_article(&self, article: &Article) -> Option<NaiveDate> {
        let index = self.leftmost_index(article.date)?;

        self.order[..index]
            .iter()
            .rev()
            .filter_map(|&id| self.date_of(id))
            .find(|&date| date < article.date)
    }

    fn get_date_of_next_article(&self, article: &Article) -> Option<NaiveDate> {
        let index = self.leftmost_index(article.date)?;

        self.order
            .get(index + 1..)
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.date_of(id))
            .find(|&date| date > article.date)
    }

    fn add_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    fn get_tags(&self) -> &[Tag] {
        &self.tags
    }

    fn add_comment(&mut self, comment: Comment) -> Result<(), RepositoryError> {
        let attached_to_user = comment
            .username
            .as_deref()
            .and_then(|username| self.get_user(username))
            .is_some_and(|user| user.comments.contains(&comment.id));
        if !attached_to_user {
            return Err(RepositoryError::CommentNotAttachedToUser);
        }

        let attached_to_article = comment
            .article_id
            .and_then(|id| self.articles.get(&id))
            .is_some_and(|article| article.comments.contains(&comment.id));
        if !attached_to_article {
            return Err(RepositoryError::CommentNotAttachedToArticle);
        }

        self.comments.push(comment);
        Ok(())
    }

    fn get_comments(&self) -> &[Comment] {
        &self.comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{make_comment, make_tag_association};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn article(id: i64, published: NaiveDate) -> Article {
        Article::new(
            published,
            format!("Article {id}"),
            format!("Summary for article {id}"),
            format!("https://example.org/articles/{id}"),
            "https://example.org/cover.png",
        )
        .with_id(id)
    }

    /// Repository with the scenario dataset: ids 1..=4 dated
    /// 2020-01-01, 2020-01-05, 2020-01-05, 2020-01-10.
    fn scenario_repo() -> MemoryRepository {
        let mut repo = MemoryRepository::new();
        repo.add_article(article(1, date(2020, 1, 1)));
        repo.add_article(article(2, date(2020, 1, 5)));
        repo.add_article(article(3, date(2020, 1, 5)));
        repo.add_article(article(4, date(2020, 1, 10)));
        repo
    }

    // ========================================================================
    // User tests
    // ========================================================================

    #[test]
    fn test_add_and_get_user() {
        let mut repo = MemoryRepository::new();
        repo.add_user(User::new("dave", "hash"));

        let user = repo.get_user("dave").expect("user should be found");
        assert_eq!(user.username, "dave");
    }

    #[test]
    fn test_get_user_is_case_sensitive() {
        let mut repo = MemoryRepository::new();
        repo.add_user(User::new("Dave", "hash"));

        assert!(repo.get_user("dave").is_none());
        assert!(repo.get_user("Dave").is_some());
    }

    #[test]
    fn test_get_unknown_user_returns_none() {
        let repo = MemoryRepository::new();
        assert!(repo.get_user("prince").is_none());
    }

    #[test]
    fn test_add_user_does_not_enforce_uniqueness() {
        // Uniqueness belongs to the auth service; the repository appends.
        let mut repo = MemoryRepository::new();
        repo.add_user(User::new("dave", "first"));
        repo.add_user(User::new("dave", "second"));

        let user = repo.get_user("dave").expect("user should be found");
        assert_eq!(user.password, "first");
    }

    // ========================================================================
    // Article tests
    // ========================================================================

    #[test]
    fn test_add_article_then_get_by_id() {
        let mut repo = MemoryRepository::new();
        repo.add_article(article(298, date(2007, 2, 2)));

        let stored = repo.get_article(298).expect("article should be found");
        assert_eq!(stored.id, Some(298));
        assert_eq!(stored.title, "Article 298");
    }

    #[test]
    fn test_add_article_assigns_missing_id() {
        let mut repo = MemoryRepository::new();
        repo.add_article(article(7, date(2020, 3, 1)));
        repo.add_article(Article::new(
            date(2020, 3, 2),
            "Untitled",
            "No id yet",
            "https://example.org",
            "https://example.org/cover.png",
        ));

        let assigned = repo.get_article(8).expect("next free id should be 8");
        assert_eq!(assigned.title, "Untitled");
    }

    #[test]
    fn test_add_article_overwrites_existing_id() {
        let mut repo = MemoryRepository::new();
        repo.add_article(article(1, date(2020, 1, 1)));

        let mut replacement = article(1, date(2020, 1, 1));
        replacement.title = "Replacement".into();
        repo.add_article(replacement);

        let stored = repo.get_article(1).expect("article should be found");
        assert_eq!(stored.title, "Replacement");
    }

    #[test]
    fn test_add_article_overwrite_with_new_date_stays_sorted() {
        let mut repo = MemoryRepository::new();
        repo.add_article(article(1, date(2020, 1, 1)));
        repo.add_article(article(2, date(2020, 1, 5)));
        repo.add_article(article(3, date(2020, 1, 10)));

        // Re-add id 1 with a later date; it moves to the end instead of
        // leaving a stale slot behind.
        repo.add_article(article(1, date(2020, 1, 20)));

        assert_eq!(repo.get_number_of_articles(), 3);
        let dates: Vec<NaiveDate> = repo
            .order
            .iter()
            .filter_map(|&id| repo.date_of(id))
            .collect();
        assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));

        let on_fifth: Vec<i64> = repo
            .get_articles_by_date(date(2020, 1, 5))
            .iter()
            .filter_map(|a| a.id)
            .collect();
        assert_eq!(on_fifth, vec![2]);
        assert_eq!(repo.get_last_article().and_then(|a| a.id), Some(1));
    }

    #[test]
    fn test_get_unknown_article_returns_none() {
        let repo = scenario_repo();
        assert!(repo.get_article(1001).is_none());
    }

    #[test]
    fn test_number_of_articles() {
        assert_eq!(MemoryRepository::new().get_number_of_articles(), 0);
        assert_eq!(scenario_repo().get_number_of_articles(), 4);
    }

    #[test]
    fn test_articles_stored_sorted_by_date() {
        // Insert out of order; storage order must come out sorted.
        let mut repo = MemoryRepository::new();
        repo.add_article(article(4, date(2020, 1, 10)));
        repo.add_article(article(1, date(2020, 1, 1)));
        repo.add_article(article(3, date(2020, 1, 5)));
        repo.add_article(article(2, date(2020, 1, 5)));

        let dates: Vec<NaiveDate> = repo
            .order
            .iter()
            .filter_map(|&id| repo.date_of(id))
            .collect();
        assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(repo.get_first_article().and_then(|a| a.id), Some(1));
        assert_eq!(repo.get_last_article().and_then(|a| a.id), Some(4));
    }

    #[test]
    fn test_first_and_last_on_empty_repository() {
        let repo = MemoryRepository::new();
        assert!(repo.get_first_article().is_none());
        assert!(repo.get_last_article().is_none());
    }

    // ========================================================================
    // Date query tests
    // ========================================================================

    #[test]
    fn test_get_articles_by_date_collects_all_matches() {
        let repo = scenario_repo();

        let matching = repo.get_articles_by_date(date(2020, 1, 5));
        let mut ids: Vec<i64> = matching.iter().filter_map(|a| a.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_get_articles_by_date_misses_return_empty() {
        let repo = scenario_repo();

        // Before the first, between entries, after the last.
        assert!(repo.get_articles_by_date(date(2019, 12, 31)).is_empty());
        assert!(repo.get_articles_by_date(date(2020, 1, 7)).is_empty());
        assert!(repo.get_articles_by_date(date(2020, 3, 8)).is_empty());
    }

    #[test]
    fn test_get_articles_by_date_on_empty_repository() {
        let repo = MemoryRepository::new();
        assert!(repo.get_articles_by_date(date(2020, 1, 1)).is_empty());
    }

    #[test]
    fn test_get_articles_by_id_preserves_order_and_drops_unknown() {
        let repo = scenario_repo();

        let articles = repo.get_articles_by_id(&[3, 1001, 1]);
        let ids: Vec<i64> = articles.iter().filter_map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_get_articles_by_id_all_unknown() {
        let repo = scenario_repo();
        assert!(repo.get_articles_by_id(&[0, 10001]).is_empty());
    }

    // ========================================================================
    // Previous / next date tests
    // ========================================================================

    #[test]
    fn test_date_of_previous_article() {
        let repo = scenario_repo();

        let second = repo.get_article(2).unwrap().clone();
        assert_eq!(
            repo.get_date_of_previous_article(&second),
            Some(date(2020, 1, 1))
        );

        let last = repo.get_article(4).unwrap().clone();
        assert_eq!(
            repo.get_date_of_previous_article(&last),
            Some(date(2020, 1, 5))
        );
    }

    #[test]
    fn test_no_previous_article_for_earliest() {
        let repo = scenario_repo();
        let earliest = repo.get_article(1).unwrap().clone();
        assert_eq!(repo.get_date_of_previous_article(&earliest), None);
    }

    #[test]
    fn test_date_of_next_article() {
        let repo = scenario_repo();

        let first = repo.get_article(1).unwrap().clone();
        assert_eq!(repo.get_date_of_next_article(&first), Some(date(2020, 1, 5)));

        let third = repo.get_article(3).unwrap().clone();
        assert_eq!(
            repo.get_date_of_next_article(&third),
            Some(date(2020, 1, 10))
        );
    }

    #[test]
    fn test_no_next_article_for_latest() {
        let repo = scenario_repo();
        let latest = repo.get_article(4).unwrap().clone();
        assert_eq!(repo.get_date_of_next_article(&latest), None);
    }

    #[test]
    fn test_neighbor_queries_treat_unknown_date_as_not_found() {
        let repo = scenario_repo();
        let stranger = article(99, date(2021, 6, 1));

        assert_eq!(repo.get_date_of_previous_article(&stranger), None);
        assert_eq!(repo.get_date_of_next_article(&stranger), None);
    }

    // ========================================================================
    // Tag tests
    // ========================================================================

    #[test]
    fn test_add_and_get_tags() {
        let mut repo = MemoryRepository::new();
        repo.add_tag(Tag::new("Motoring"));

        assert_eq!(repo.get_tags().len(), 1);
        assert_eq!(repo.get_tags()[0].name, "Motoring");
    }

    #[test]
    fn test_get_article_ids_for_tag() {
        let mut repo = scenario_repo();
        let mut tag = Tag::new("Action");
        for id in [2, 4] {
            let stored = repo.get_article_mut(id).unwrap();
            make_tag_association(stored, &mut tag).unwrap();
        }
        repo.add_tag(tag);

        assert_eq!(repo.get_article_ids_for_tag("Action"), vec![2, 4]);
    }

    #[test]
    fn test_get_article_ids_for_unknown_tag() {
        let repo = scenario_repo();
        assert!(repo.get_article_ids_for_tag("United States").is_empty());
    }

    // ========================================================================
    // Comment tests
    // ========================================================================

    #[test]
    fn test_add_comment_when_properly_attached() {
        let mut repo = scenario_repo();
        repo.add_user(User::new("thorke", "hash"));

        let comment = Comment::new(Some("thorke".into()), Some(2), "Wow!", Utc::now());
        repo.get_user_mut("thorke").unwrap().add_comment(comment.id);
        repo.get_article_mut(2).unwrap().add_comment(comment.id);

        let id = comment.id;
        repo.add_comment(comment).expect("attached comment is accepted");
        assert!(repo.get_comments().iter().any(|c| c.id == id));
    }

    #[test]
    fn test_add_comment_without_user_fails() {
        let mut repo = scenario_repo();

        let comment = Comment::new(None, Some(2), "Wow!", Utc::now());
        assert_eq!(
            repo.add_comment(comment),
            Err(RepositoryError::CommentNotAttachedToUser)
        );
        assert!(repo.get_comments().is_empty());
    }

    #[test]
    fn test_add_comment_not_referenced_by_article_fails() {
        let mut repo = scenario_repo();
        repo.add_user(User::new("thorke", "hash"));

        // User references the comment, the article does not.
        let comment = Comment::new(Some("thorke".into()), Some(2), "Wow!", Utc::now());
        repo.get_user_mut("thorke").unwrap().add_comment(comment.id);

        assert_eq!(
            repo.add_comment(comment),
            Err(RepositoryError::CommentNotAttachedToArticle)
        );
    }

    #[test]
    fn test_make_comment_then_add_via_owned_objects() {
        // The loader's path: link while owned, then add everything.
        let mut repo = MemoryRepository::new();
        let mut user = User::new("fmercury", "hash");
        let mut art = article(1, date(2014, 8, 1));

        let comment = make_comment("Boo!", &mut user, &mut art, Utc::now());

        repo.add_article(art);
        repo.add_user(user);
        repo.add_comment(comment).expect("comment is fully linked");
        assert_eq!(repo.get_comments().len(), 1);
    }

    // ========================================================================
    // Property-based tests
    // ========================================================================

    use proptest::prelude::*;

    proptest! {
        /// Whatever the insertion order, storage order is sorted by date and
        /// date queries return exactly the matching articles.
        #[test]
        fn property_storage_sorted_and_date_queries_exact(
            days in proptest::collection::vec(1u32..=28, 1..40),
            probe in 1u32..=28,
        ) {
            let mut repo = MemoryRepository::new();
            for (i, &day) in days.iter().enumerate() {
                repo.add_article(article(i as i64 + 1, date(2020, 1, day)));
            }

            let dates: Vec<NaiveDate> = repo
                .order
                .iter()
                .filter_map(|&id| repo.date_of(id))
                .collect();
            prop_assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));

            let target = date(2020, 1, probe);
            let mut reported: Vec<i64> = repo
                .get_articles_by_date(target)
                .iter()
                .filter_map(|a| a.id)
                .collect();
            reported.sort_unstable();

            let mut expected: Vec<i64> = days
                .iter()
                .enumerate()
                .filter(|(_, &day)| day == probe)
                .map(|(i, _)| i as i64 + 1)
                .collect();
            expected.sort_unstable();

            prop_assert_eq!(reported, expected);
        }

        /// Neighbor queries return the nearest strictly different dates.
        #[test]
        fn property_neighbor_dates(
            days in proptest::collection::vec(1u32..=28, 1..40),
            pick in 0usize..39,
        ) {
            let mut repo = MemoryRepository::new();
            for (i, &day) in days.iter().enumerate() {
                repo.add_article(article(i as i64 + 1, date(2020, 1, day)));
            }

            let pick = pick % days.len();
            let reference = repo.get_article(pick as i64 + 1).unwrap().clone();

            let expected_prev = days
                .iter()
                .map(|&d| date(2020, 1, d))
                .filter(|&d| d < reference.date)
                .max();
            let expected_next = days
                .iter()
                .map(|&d| date(2020, 1, d))
                .filter(|&d| d > reference.date)
                .min();

            prop_assert_eq!(repo.get_date_of_previous_article(&reference), expected_prev);
            prop_assert_eq!(repo.get_date_of_next_article(&reference), expected_next);
        }
    }
}
