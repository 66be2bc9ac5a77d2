//! Posts screen state: the fetched page, filters, and selection.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{Pagination, Post, PostListResponse};
use crate::view_state::{Category, ViewMode};

/// State container for the posts screen.
///
/// Holds the raw page as received from the backend plus every filter the
/// user can apply. `visible()` projects the raw posts through the filter
/// pipeline in a fixed order: ignored-set visibility, then category, then
/// creator scope, then free-text search. Raw order is preserved.
#[derive(Debug, Default)]
pub struct PostsViewState {
    posts: Vec<Post>,
    pub pagination: Pagination,

    pub category: Category,
    pub search: String,
    /// Restrict to one creator's posts (set from the creators screen)
    pub creator_scope: Option<String>,
    ignored: HashSet<i64>,
    /// When set, the list shows only ignored posts instead of hiding them
    pub show_ignored: bool,

    pub view_mode: ViewMode,
    pub page: u32,
    pub selected: usize,

    visible: Vec<usize>,
    dirty: bool,
    now: DateTime<Utc>,
}

impl PostsViewState {
    pub fn new() -> Self {
        Self {
            page: 1,
            dirty: true,
            now: Utc::now(),
            ..Default::default()
        }
    }

    /// Replace the raw page data after a fetch.
    pub fn set_page_data(&mut self, response: PostListResponse) {
        self.posts = response.posts;
        self.pagination = response.pagination;
        self.dirty = true;
        self.clamp_selection();
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    // ------------------------------------------------------------------
    // Filter mutators. Search and category changes reset to page 1 so the
    // pagination footer never points past the filtered result.
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, search: String) {
        if self.search != search {
            self.search = search;
            self.page = 1;
            self.dirty = true;
        }
    }

    pub fn set_category(&mut self, category: Category) {
        if self.category != category {
            self.category = category;
            self.page = 1;
            self.dirty = true;
        }
    }

    pub fn cycle_category(&mut self) {
        self.set_category(self.category.next());
    }

    pub fn set_creator_scope(&mut self, username: Option<String>) {
        self.creator_scope = username;
        self.page = 1;
        self.dirty = true;
    }

    pub fn toggle_show_ignored(&mut self) {
        self.show_ignored = !self.show_ignored;
        self.dirty = true;
    }

    /// Flip a post in or out of the ignored set.
    pub fn toggle_ignored(&mut self, post_id: i64) {
        if !self.ignored.remove(&post_id) {
            self.ignored.insert(post_id);
        }
        self.dirty = true;
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    pub fn is_ignored(&self, post_id: i64) -> bool {
        self.ignored.contains(&post_id)
    }

    /// Fix the reference instant used by the Today category.
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
        self.dirty = true;
    }

    // ------------------------------------------------------------------
    // Pagination / selection
    // ------------------------------------------------------------------

    /// Move to the next server page if one exists. Returns true when the
    /// page changed and a refetch is needed.
    pub fn next_page(&mut self) -> bool {
        if (self.page as i64) < self.pagination.total_pages {
            self.page += 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The post currently under the cursor, if any.
    pub fn selected_post(&mut self) -> Option<&Post> {
        self.recompute_if_dirty();
        let index = *self.visible.get(self.selected)?;
        self.posts.get(index)
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    /// Posts passing every active filter, in raw order.
    pub fn visible(&mut self) -> Vec<&Post> {
        self.recompute_if_dirty();
        self.visible.iter().map(|&i| &self.posts[i]).collect()
    }

    pub fn visible_len(&mut self) -> usize {
        self.recompute_if_dirty();
        self.visible.len()
    }

    fn recompute_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        let today = self.now.date_naive();
        let needle = self.search.trim().to_lowercase();

        self.visible = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| {
                // 1. ignored-set visibility
                if self.ignored.contains(&post.id) != self.show_ignored {
                    return false;
                }
                // 2. category
                let category_ok = match self.category {
                    Category::All => true,
                    Category::Engage => post.should_engage,
                    Category::NoEngage => !post.should_engage,
                    Category::Today => post.posted_at.date_naive() == today,
                };
                if !category_ok {
                    return false;
                }
                // 3. creator scope: exact, case-sensitive equality (scope
                // values come from the creator list, never typed by hand)
                if let Some(scope) = &self.creator_scope {
                    if &post.username != scope {
                        return false;
                    }
                }
                // 4. free-text search, case-insensitive over username+caption
                if needle.is_empty() {
                    return true;
                }
                post.username.to_lowercase().contains(&needle)
                    || post
                        .caption
                        .as_ref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();
        self.dirty = false;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(id: i64, username: &str, caption: Option<&str>, engage: bool) -> Post {
        Post {
            id,
            username: username.into(),
            posted_at: Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap(),
            caption: caption.map(Into::into),
            display_image_url: None,
            post_url: None,
            should_engage: engage,
            suggested_comment: None,
            tone_emoji: String::new(),
            tone_description: String::new(),
            analysis_confidence: 0.5,
            comment_freshness: String::new(),
        }
    }

    fn loaded(posts: Vec<Post>) -> PostsViewState {
        let mut state = PostsViewState::new();
        state.set_now(Utc.with_ymd_and_hms(2026, 8, 20, 18, 0, 0).unwrap());
        state.set_page_data(PostListResponse {
            posts,
            pagination: Pagination {
                total: 2,
                total_pages: 1,
                page: 1,
            },
        });
        state
    }

    #[test]
    fn search_matches_username_and_caption_case_insensitively() {
        let mut state = loaded(vec![
            post(1, "Alice", Some("Sunset at the BEACH"), true),
            post(2, "bob", Some("city lights"), false),
        ]);

        state.set_search("beach".into());
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1]);

        state.set_search("ALI".into());
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn category_filters_engage_and_today() {
        let mut yesterday = post(3, "carol", None, true);
        yesterday.posted_at = Utc.with_ymd_and_hms(2026, 8, 19, 23, 0, 0).unwrap();
        let mut state = loaded(vec![
            post(1, "alice", None, true),
            post(2, "bob", None, false),
            yesterday,
        ]);

        state.set_category(Category::Engage);
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1, 3]);

        state.set_category(Category::Today);
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1, 2]);
    }

    #[test]
    fn ignored_posts_hidden_until_show_ignored() {
        let mut state = loaded(vec![post(1, "alice", None, true), post(2, "bob", None, true)]);
        state.toggle_ignored(1);

        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![2]);

        state.toggle_show_ignored();
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn toggle_ignore_twice_is_identity() {
        let mut state = loaded(vec![post(1, "alice", None, true), post(2, "bob", None, true)]);
        let before: Vec<i64> = state.visible().iter().map(|p| p.id).collect();

        state.toggle_ignored(1);
        state.toggle_ignored(1);
        assert_eq!(state.ignored_count(), 0);
        let after: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn single_letter_search_matches_username_and_caption() {
        let mut state = loaded(vec![
            post(1, "a", None, true),
            post(2, "bob", Some("cat"), true),
            post(3, "zed", Some("dog"), true),
        ]);
        state.set_search("a".into());
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1, 2]);
    }

    #[test]
    fn creator_scope_is_exact_and_case_sensitive() {
        let mut state = loaded(vec![
            post(1, "Alice", None, true),
            post(2, "alice", None, true),
            post(3, "alice2", None, true),
        ]);
        state.set_creator_scope(Some("alice".into()));
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![2]);
    }

    #[test]
    fn search_and_category_changes_reset_page() {
        let mut state = loaded(vec![post(1, "alice", None, true)]);
        state.pagination.total_pages = 5;
        state.page = 3;

        state.set_search("a".into());
        assert_eq!(state.page, 1);

        state.page = 3;
        state.set_category(Category::Engage);
        assert_eq!(state.page, 1);

        // No-op changes leave the page alone
        state.page = 3;
        state.set_category(Category::Engage);
        assert_eq!(state.page, 3);
    }

    #[test]
    fn filters_preserve_raw_order() {
        let mut state = loaded(vec![
            post(5, "e", None, true),
            post(1, "a", None, true),
            post(3, "c", None, true),
        ]);
        let visible: Vec<i64> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![5, 1, 3]);
    }

    #[test]
    fn selection_clamps_when_list_shrinks() {
        let mut state = loaded(vec![
            post(1, "alice", None, true),
            post(2, "bob", None, false),
            post(3, "carol", None, false),
        ]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 2);

        state.set_category(Category::Engage);
        assert_eq!(state.visible_len(), 1);
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_post().unwrap().id, 1);
    }
}
