//! Key and message handling for [`App`].

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::app::{App, Screen, StatusLine};
use crate::events::{AppMessage, MutationKind};
use crate::export;
use crate::models::CrawlKind;

impl App {
    /// Route one key press. Text-entry modes capture printable keys before
    /// any global binding fires.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.search_active {
            self.handle_search_key(key);
            return;
        }
        if self.creators.is_adding() {
            self.handle_creator_form_key(key);
            return;
        }
        if self.screen == Screen::Crawl && self.crawl.form.is_some() {
            self.handle_crawl_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                // Esc-first navigation: q only quits from the top level
                if self.screen == Screen::Crawl && self.crawl.detail.is_some() {
                    self.crawl.close_detail();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('1') => self.enter_screen(Screen::Dashboard),
            KeyCode::Char('2') => self.enter_screen(Screen::Posts),
            KeyCode::Char('3') => self.enter_screen(Screen::Creators),
            KeyCode::Char('4') => self.enter_screen(Screen::Crawl),
            KeyCode::Char('r') => self.refresh_current_screen(),
            _ => match self.screen {
                Screen::Dashboard => self.handle_dashboard_key(key),
                Screen::Posts => self.handle_posts_key(key),
                Screen::Creators => self.handle_creators_key(key),
                Screen::Crawl => self.handle_crawl_key(key),
            },
        }
        self.mark_dirty();
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('s') {
            if self.mutation_in_flight(MutationKind::SchedulerToggle) {
                return;
            }
            let running = self.scheduler.map(|s| s.is_running).unwrap_or(false);
            let cache = self.cache.clone();
            self.run_mutation(MutationKind::SchedulerToggle, async move {
                if running {
                    cache.stop_scheduler().await
                } else {
                    cache.start_scheduler().await
                }
            });
        }
    }

    // ------------------------------------------------------------------
    // Posts screen
    // ------------------------------------------------------------------

    fn handle_posts_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.posts.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.posts.select_prev(),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('c') => self.posts.cycle_category(),
            KeyCode::Char('v') => self.posts.view_mode = self.posts.view_mode.toggle(),
            KeyCode::Char('i') => {
                if let Some(id) = self.posts.selected_post().map(|p| p.id) {
                    self.posts.toggle_ignored(id);
                }
            }
            KeyCode::Char('I') => self.posts.toggle_show_ignored(),
            KeyCode::Char('x') => {
                if self.posts.creator_scope.is_some() {
                    self.posts.set_creator_scope(None);
                    self.scoped_creator = None;
                    self.spawn_posts_fetch();
                    self.loading = true;
                }
            }
            KeyCode::Char('n') | KeyCode::Right => {
                if self.posts.next_page() {
                    self.spawn_posts_fetch();
                    self.loading = true;
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if self.posts.prev_page() {
                    self.spawn_posts_fetch();
                    self.loading = true;
                }
            }
            KeyCode::Char('e') => self.export_visible_posts(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => {
                let mut search = self.posts.search.clone();
                search.pop();
                self.posts.set_search(search);
            }
            KeyCode::Char(c) => {
                let mut search = self.posts.search.clone();
                search.push(c);
                self.posts.set_search(search);
            }
            _ => {}
        }
        self.mark_dirty();
    }

    fn export_visible_posts(&mut self) {
        let visible: Vec<_> = self.posts.visible().into_iter().cloned().collect();
        if visible.is_empty() {
            self.status = Some(StatusLine::info("Nothing to export"));
            return;
        }
        let report = export::posts_report(&visible, Utc::now());
        self.write_report(report);
    }

    fn write_report(&self, report: export::Report) {
        let tx = self.message_tx.clone();
        tokio::task::spawn_blocking(move || {
            let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
            let result = report.write_to(&dir).map_err(|err| err.to_string());
            let _ = tx.send(AppMessage::ExportDone(result));
        });
    }

    // ------------------------------------------------------------------
    // Creators screen
    // ------------------------------------------------------------------

    fn handle_creators_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.creators.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.creators.select_prev(),
            KeyCode::Char('a') => self.creators.open_add_form(),
            KeyCode::Char('d') => {
                if self.mutation_in_flight(MutationKind::RemoveCreator) {
                    return;
                }
                if let Some(id) = self.creators.selected_creator().map(|c| c.id) {
                    let cache = self.cache.clone();
                    self.run_mutation(MutationKind::RemoveCreator, async move {
                        cache.remove_creator(id).await
                    });
                }
            }
            KeyCode::Char('s') => {
                if self.mutation_in_flight(MutationKind::ScanCreator) {
                    return;
                }
                if let Some(username) =
                    self.creators.selected_creator().map(|c| c.username.clone())
                {
                    let cache = self.cache.clone();
                    self.run_mutation(MutationKind::ScanCreator, async move {
                        cache.scan_creator(&username).await
                    });
                }
            }
            KeyCode::Enter => {
                // Jump to the posts screen scoped to this creator
                if let Some((id, username)) = self
                    .creators
                    .selected_creator()
                    .map(|c| (c.id, c.username.clone()))
                {
                    self.posts.set_creator_scope(Some(username));
                    self.scoped_creator = Some(id);
                    self.enter_screen(Screen::Posts);
                }
            }
            _ => {}
        }
    }

    fn handle_creator_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.creators.close_add_form(),
            KeyCode::Backspace => self.creators.pop_input(),
            KeyCode::Enter => {
                if self.mutation_in_flight(MutationKind::AddCreator) {
                    return;
                }
                if let Some(username) = self.creators.take_input() {
                    let cache = self.cache.clone();
                    self.run_mutation(MutationKind::AddCreator, async move {
                        cache.add_creator(&username).await.map(|_| ())
                    });
                }
            }
            KeyCode::Char(c) => self.creators.push_input(c),
            _ => {}
        }
        self.mark_dirty();
    }

    // ------------------------------------------------------------------
    // Crawl screen
    // ------------------------------------------------------------------

    fn handle_crawl_key(&mut self, key: KeyEvent) {
        if self.crawl.detail.is_some() {
            match key.code {
                KeyCode::Esc => self.crawl.close_detail(),
                KeyCode::Char('e') => self.export_crawl_detail(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.crawl.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.crawl.select_prev(),
            KeyCode::Tab => {
                self.crawl.switch_tab();
                self.spawn_crawl_items_fetch(self.crawl.tab);
                self.loading = true;
            }
            KeyCode::Char('a') => self.crawl.open_form(),
            KeyCode::Char('d') => {
                if self.mutation_in_flight(MutationKind::RemoveCrawlItem) {
                    return;
                }
                if let Some(id) = self.crawl.selected_item().map(|i| i.id) {
                    let cache = self.cache.clone();
                    self.run_mutation(MutationKind::RemoveCrawlItem, async move {
                        cache.remove_crawl_item(id).await
                    });
                }
            }
            KeyCode::Char('t') => {
                if self.mutation_in_flight(MutationKind::ToggleCrawlItem) {
                    return;
                }
                if let Some(id) = self.crawl.selected_item().map(|i| i.id) {
                    let cache = self.cache.clone();
                    self.run_mutation(MutationKind::ToggleCrawlItem, async move {
                        cache.toggle_crawl_item(id).await.map(|_| ())
                    });
                }
            }
            KeyCode::Enter => {
                if let Some(item) = self.crawl.selected_item().cloned() {
                    let (id, kind) = (item.id, item.kind);
                    self.crawl.open_detail(item);
                    self.spawn_crawl_data_fetch(id, kind);
                }
            }
            _ => {}
        }
    }

    fn handle_crawl_form_key(&mut self, key: KeyEvent) {
        let tab = self.crawl.tab;
        let Some(form) = self.crawl.form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.crawl.close_form(),
            KeyCode::Tab => form.focused_field = (form.focused_field + 1) % 2,
            KeyCode::Backspace => {
                let field = match (form.focused_field, tab) {
                    (0, CrawlKind::Post) => &mut form.url,
                    (0, CrawlKind::User) => &mut form.username,
                    _ => &mut form.description,
                };
                field.pop();
            }
            KeyCode::Enter => {
                let request = form.to_request(tab);
                if self.mutation_in_flight(MutationKind::AddCrawlItem) {
                    return;
                }
                if let Some(request) = request {
                    self.crawl.close_form();
                    let cache = self.cache.clone();
                    self.run_mutation(MutationKind::AddCrawlItem, async move {
                        cache.add_crawl_item(&request).await.map(|_| ())
                    });
                } else {
                    let field = match tab {
                        CrawlKind::Post => "url",
                        CrawlKind::User => "username",
                    };
                    self.status = Some(StatusLine::error(format!("{} is required", field)));
                }
            }
            KeyCode::Char(c) => {
                let field = match (form.focused_field, tab) {
                    (0, CrawlKind::Post) => &mut form.url,
                    (0, CrawlKind::User) => &mut form.username,
                    _ => &mut form.description,
                };
                field.push(c);
            }
            _ => {}
        }
        self.mark_dirty();
    }

    fn export_crawl_detail(&mut self) {
        let Some((item, data)) = self.crawl.detail.clone() else {
            return;
        };
        let mut item = item;
        if item.tracking_data.is_none() {
            item.tracking_data = data;
        }
        let report = match item.kind {
            CrawlKind::Post => export::crawl_post_report(&item, Utc::now()),
            CrawlKind::User => export::crawl_user_report(&item, Utc::now()),
        };
        self.write_report(report);
    }

    // ------------------------------------------------------------------
    // Messages from background tasks
    // ------------------------------------------------------------------

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::StatsLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(stats) => self.stats = Some(stats),
                    Err(err) => self.report_error(&err.user_message()),
                }
            }
            AppMessage::SchedulerStatusLoaded(result) => match result {
                Ok(status) => self.scheduler = Some(status),
                Err(err) => self.report_error(&err.user_message()),
            },
            AppMessage::ScanLogsLoaded(result) => match result {
                Ok(logs) => self.scan_logs = logs,
                Err(err) => self.report_error(&err.user_message()),
            },
            AppMessage::CreatorsLoaded { generation, result } => {
                if generation != self.generation() {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(creators) => self.creators.set_creators(creators),
                    Err(err) => self.report_error(&err.user_message()),
                }
            }
            AppMessage::PostsLoaded {
                generation,
                page,
                result,
            } => {
                if generation != self.generation() || page != self.posts.page {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(response) => self.posts.set_page_data(response),
                    Err(err) => self.report_error(&err.user_message()),
                }
            }
            AppMessage::CrawlItemsLoaded {
                generation,
                kind,
                result,
            } => {
                if generation != self.generation() {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(items) => self.crawl.set_items(kind, items),
                    Err(err) => self.report_error(&err.user_message()),
                }
            }
            AppMessage::CrawlDataLoaded {
                generation,
                item_id,
                result,
            } => {
                if generation != self.generation() {
                    return;
                }
                match result {
                    Ok(data) => self.crawl.set_detail_data(item_id, data),
                    Err(err) => self.report_error(&err.user_message()),
                }
            }
            AppMessage::MutationDone { kind, result } => {
                self.settle_mutation(kind);
                match result {
                    Ok(()) => {
                        info!(?kind, "mutation completed");
                        self.status = Some(StatusLine::info("Done"));
                        self.refetch_after_mutation(kind);
                    }
                    Err(err) => {
                        warn!(?kind, error = %err, "mutation failed");
                        self.report_error(&err.user_message());
                    }
                }
            }
            AppMessage::ExportDone(result) => match result {
                Ok(path) => {
                    info!(path = %path.display(), "report written");
                    self.status = Some(StatusLine::info(format!(
                        "Exported to {}",
                        path.display()
                    )));
                }
                Err(err) => self.report_error(&format!("Export failed: {}", err)),
            },
        }
        self.mark_dirty();
    }

    /// After a successful mutation the cache entries for the affected lists
    /// are gone; refetch what the current screen shows.
    fn refetch_after_mutation(&mut self, kind: MutationKind) {
        match kind {
            MutationKind::AddCreator | MutationKind::RemoveCreator | MutationKind::ScanCreator => {
                self.spawn_creators_fetch();
                self.spawn_stats_fetch();
            }
            MutationKind::SchedulerToggle => self.spawn_scheduler_fetch(),
            MutationKind::AddCrawlItem
            | MutationKind::RemoveCrawlItem
            | MutationKind::ToggleCrawlItem => {
                self.spawn_crawl_items_fetch(self.crawl.tab);
                self.spawn_stats_fetch();
            }
        }
    }

    fn report_error(&mut self, message: &str) {
        self.loading = false;
        self.status = Some(StatusLine::error(message));
    }
}
