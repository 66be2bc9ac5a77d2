//! Posts screen: filter bar plus the filtered list in grid or row layout.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Post;
use crate::ui::helpers::{format_confidence, format_relative_time, truncate};
use crate::ui::theme::{
    COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_ENGAGE, COLOR_HEADER, COLOR_IGNORED, COLOR_SKIP,
};
use crate::view_state::ViewMode;

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // filter bar
            Constraint::Min(3),    // list
            Constraint::Length(1), // pagination footer
        ])
        .split(area);

    render_filter_bar(frame, chunks[0], app);
    render_list(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, app: &mut App) {
    let mut spans = Vec::new();

    let search_style = if app.search_active {
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_DIM)
    };
    let search_text = if app.search_active || !app.posts.search.is_empty() {
        format!(" search: {}_", app.posts.search)
    } else {
        " search: (press /)".to_string()
    };
    spans.push(Span::styled(search_text, search_style));

    spans.push(Span::styled(
        format!("  [{}]", app.posts.category.label()),
        Style::default().fg(COLOR_HEADER),
    ));

    if let Some(scope) = &app.posts.creator_scope {
        spans.push(Span::styled(
            format!("  @{} only (x to clear)", scope),
            Style::default().fg(COLOR_ACCENT),
        ));
    }

    if app.posts.show_ignored {
        spans.push(Span::styled(
            format!("  showing ignored ({})", app.posts.ignored_count()),
            Style::default().fg(COLOR_IGNORED),
        ));
    } else if app.posts.ignored_count() > 0 {
        spans.push(Span::styled(
            format!("  {} ignored", app.posts.ignored_count()),
            Style::default().fg(COLOR_DIM),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(frame: &mut Frame, area: Rect, app: &mut App) {
    let view_mode = app.posts.view_mode;
    let selected = app.posts.selected;
    let visible: Vec<Post> = app.posts.visible().into_iter().cloned().collect();

    if visible.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No posts match the current filters",
            Style::default().fg(COLOR_DIM),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_BORDER)),
        );
        frame.render_widget(empty, area);
        return;
    }

    match view_mode {
        ViewMode::Rows => render_rows(frame, area, app, &visible, selected),
        ViewMode::Grid => render_grid(frame, area, app, &visible, selected),
    }
}

/// One post per line: compact scan view.
fn render_rows(frame: &mut Frame, area: Rect, app: &App, posts: &[Post], selected: usize) {
    let height = area.height.saturating_sub(2) as usize;
    let offset = selected.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = posts
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(index, post)| post_line(app, post, index == selected))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Two-column card layout; each card shows the caption and suggestion.
fn render_grid(frame: &mut Frame, area: Rect, app: &App, posts: &[Post], selected: usize) {
    let card_height = 4u16;
    let rows = (area.height.saturating_sub(2) / card_height).max(1) as usize;
    let per_screen = rows * 2;
    let offset = (selected / per_screen) * per_screen;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (slot, (index, post)) in posts.iter().enumerate().skip(offset).take(per_screen).enumerate()
    {
        let row = (slot / 2) as u16;
        let column = (slot % 2) as u16;
        let width = inner.width / 2;
        let card = Rect {
            x: inner.x + column * width,
            y: inner.y + row * card_height,
            width,
            height: card_height.min(inner.height.saturating_sub(row * card_height)),
        };
        if card.height == 0 {
            break;
        }
        render_card(frame, card, app, post, index == selected);
    }
}

fn render_card(frame: &mut Frame, area: Rect, app: &App, post: &Post, is_selected: bool) {
    let mut lines = vec![post_line(app, post, is_selected)];
    if let Some(caption) = &post.caption {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate(caption, area.width.saturating_sub(4) as usize)),
            Style::default().fg(COLOR_DIM),
        )));
    }
    if let Some(suggestion) = &post.suggested_comment {
        lines.push(Line::from(vec![
            Span::styled("  > ", Style::default().fg(COLOR_ACCENT)),
            Span::raw(truncate(
                suggestion,
                area.width.saturating_sub(6) as usize,
            )),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn post_line<'a>(app: &App, post: &'a Post, is_selected: bool) -> Line<'a> {
    let marker = if is_selected { "> " } else { "  " };
    let engage = if post.should_engage {
        Span::styled("ENGAGE", Style::default().fg(COLOR_ENGAGE))
    } else {
        Span::styled("skip  ", Style::default().fg(COLOR_SKIP))
    };
    let mut spans = vec![
        Span::styled(
            marker,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("@{:<18}", post.username),
            if is_selected {
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            },
        ),
        engage,
        Span::raw(format!(
            " {} {} ",
            post.tone_emoji,
            format_confidence(post.analysis_confidence)
        )),
        Span::styled(
            format_relative_time(post.posted_at),
            Style::default().fg(COLOR_DIM),
        ),
    ];
    if app.posts.is_ignored(post.id) {
        spans.push(Span::styled(
            " [ignored]",
            Style::default().fg(COLOR_IGNORED),
        ));
    }
    Line::from(spans)
}

fn render_footer(frame: &mut Frame, area: Rect, app: &mut App) {
    let shown = app.posts.visible_len();
    let footer = footer_text(
        shown,
        app.posts.page,
        app.posts.pagination.total_pages,
        app.posts.pagination.total,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer,
            Style::default().fg(COLOR_DIM),
        ))),
        area,
    );
}

/// The locally tracked page is the one source of truth here; the server's
/// echoed page number is not consulted.
fn footer_text(shown: usize, page: u32, total_pages: i64, total: i64) -> String {
    format!(
        " {} shown | page {}/{} | {} total",
        shown,
        page,
        total_pages.max(1),
        total,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_shows_the_local_page() {
        assert_eq!(footer_text(5, 2, 3, 41), " 5 shown | page 2/3 | 41 total");
        // An empty result set still renders page 1/1
        assert_eq!(footer_text(0, 1, 0, 0), " 0 shown | page 1/1 | 0 total");
    }
}
