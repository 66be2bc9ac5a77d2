//! Crawl screen state: tracked posts/users tabs, the add form, and the
//! detail view over one item's tracking data.

use crate::models::{CrawlItem, CrawlKind, NewCrawlItem, TrackingData};

/// Add-form fields. Which field is required depends on the active tab.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CrawlForm {
    pub url: String,
    pub username: String,
    pub description: String,
    /// 0 = url/username, 1 = description
    pub focused_field: usize,
}

impl CrawlForm {
    /// Build the request body for the given tab, or None when the required
    /// field is blank.
    pub fn to_request(&self, kind: CrawlKind) -> Option<NewCrawlItem> {
        let description = {
            let trimmed = self.description.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        match kind {
            CrawlKind::Post => {
                let url = self.url.trim();
                if url.is_empty() {
                    return None;
                }
                Some(NewCrawlItem {
                    kind,
                    url: Some(url.to_string()),
                    username: None,
                    description,
                })
            }
            CrawlKind::User => {
                let username = self.username.trim();
                if username.is_empty() {
                    return None;
                }
                Some(NewCrawlItem {
                    kind,
                    url: None,
                    username: Some(username.to_string()),
                    description,
                })
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct CrawlViewState {
    /// Which tab is active; each tab holds its own fetched list
    pub tab: CrawlKind,
    post_items: Vec<CrawlItem>,
    user_items: Vec<CrawlItem>,
    pub selected: usize,
    pub form: Option<CrawlForm>,
    /// Item whose tracking data is open in the detail view
    pub detail: Option<(CrawlItem, Option<TrackingData>)>,
}

impl CrawlViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&mut self, kind: CrawlKind, items: Vec<CrawlItem>) {
        match kind {
            CrawlKind::Post => self.post_items = items,
            CrawlKind::User => self.user_items = items,
        }
        self.clamp_selection();
    }

    pub fn items(&self) -> &[CrawlItem] {
        match self.tab {
            CrawlKind::Post => &self.post_items,
            CrawlKind::User => &self.user_items,
        }
    }

    pub fn selected_item(&self) -> Option<&CrawlItem> {
        self.items().get(self.selected)
    }

    pub fn switch_tab(&mut self) {
        self.tab = match self.tab {
            CrawlKind::Post => CrawlKind::User,
            CrawlKind::User => CrawlKind::Post,
        };
        self.selected = 0;
        self.form = None;
    }

    pub fn select_next(&mut self) {
        let len = self.items().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_form(&mut self) {
        self.form = Some(CrawlForm::default());
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Open the detail view; tracking data arrives later via a fetch.
    pub fn open_detail(&mut self, item: CrawlItem) {
        self.detail = Some((item, None));
    }

    pub fn set_detail_data(&mut self, item_id: i64, data: TrackingData) {
        if let Some((item, slot)) = &mut self.detail {
            if item.id == item_id {
                *slot = Some(data);
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    fn clamp_selection(&mut self) {
        let len = self.items().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
