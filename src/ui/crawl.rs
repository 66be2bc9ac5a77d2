//! Crawl screen: tracked posts/users tabs, add form, and the detail view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{CrawlItem, CrawlKind, TrackingData};
use crate::ui::helpers::{format_relative_time, truncate};
use crate::ui::theme::{
    COLOR_ACCENT, COLOR_ACTIVE, COLOR_BORDER, COLOR_DIM, COLOR_HEADER, COLOR_PAUSED,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let constraints = if app.crawl.form.is_some() {
        vec![
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
        ]
    } else {
        vec![Constraint::Length(1), Constraint::Min(3)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_tab_bar(frame, chunks[0], app);
    if app.crawl.form.is_some() {
        render_form(frame, chunks[1], app);
        render_list(frame, chunks[2], app);
    } else {
        render_list(frame, chunks[1], app);
    }

    if app.crawl.detail.is_some() {
        render_detail(frame, area, app);
    }
}

fn render_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let tab_span = |kind: CrawlKind, label: &'static str| {
        if app.crawl.tab == kind {
            Span::styled(
                label,
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(COLOR_DIM))
        }
    };
    let line = Line::from(vec![
        tab_span(CrawlKind::Post, " Tracked Posts "),
        Span::styled("|", Style::default().fg(COLOR_DIM)),
        tab_span(CrawlKind::User, " Tracked Users "),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = &app.crawl.form else {
        return;
    };
    let (primary_label, primary_value) = match app.crawl.tab {
        CrawlKind::Post => ("URL", form.url.as_str()),
        CrawlKind::User => ("Username", form.username.as_str()),
    };
    let field_line = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(COLOR_ACCENT)
        } else {
            Style::default().fg(COLOR_DIM)
        };
        Line::from(vec![
            Span::styled(format!("{:<12}", label), style),
            Span::raw(value.to_string()),
            if focused {
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))
            } else {
                Span::raw("")
            },
        ])
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(Span::styled(
            " Add target (tab: next field, enter: save, esc: cancel) ",
            Style::default().fg(COLOR_HEADER),
        ));
    let lines = vec![
        field_line(primary_label, primary_value, form.focused_field == 0),
        field_line("Description", &form.description, form.focused_field == 1),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let items = app.crawl.items();
    let title = match app.crawl.tab {
        CrawlKind::Post => format!(" Tracked posts ({}) ", items.len()),
        CrawlKind::User => format!(" Tracked users ({}) ", items.len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(title, Style::default().fg(COLOR_HEADER)));

    if items.is_empty() {
        let hint = match app.crawl.tab {
            CrawlKind::Post => "Add Instagram posts to monitor comments and engagement",
            CrawlKind::User => "Add Instagram users to monitor their posting activity",
        };
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "Nothing tracked yet",
                Style::default().fg(COLOR_DIM),
            )),
            Line::from(Span::styled(hint, Style::default().fg(COLOR_DIM))),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(index, item)| item_line(item, index == app.crawl.selected))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn item_line(item: &CrawlItem, is_selected: bool) -> Line<'static> {
    let marker = if is_selected { "> " } else { "  " };
    let status = if item.is_active() {
        Span::styled("active", Style::default().fg(COLOR_ACTIVE))
    } else {
        Span::styled("paused", Style::default().fg(COLOR_PAUSED))
    };
    let counters = match item.kind {
        CrawlKind::Post => format!(
            "{} comments, {} reactions, {} users",
            item.comments_found, item.reactions_found, item.unique_users
        ),
        CrawlKind::User => format!(
            "{} posts, {} interactions",
            item.posts_found, item.interactions
        ),
    };
    let last_crawl = item
        .last_crawl
        .map(|at| format!("  crawled {}", format_relative_time(at)))
        .unwrap_or_default();

    Line::from(vec![
        Span::styled(
            marker.to_string(),
            Style::default().fg(COLOR_ACCENT),
        ),
        Span::styled(
            format!("{:<40}", truncate(&item.label(), 38)),
            if is_selected {
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            },
        ),
        status,
        Span::styled(
            format!("  {}{}", counters, last_crawl),
            Style::default().fg(COLOR_DIM),
        ),
    ])
}

/// Centered overlay with the item's tracking data.
fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some((item, data)) = &app.crawl.detail else {
        return;
    };

    let width = (area.width * 4 / 5).max(20);
    let height = (area.height * 4 / 5).max(10);
    let overlay = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, overlay);

    let title = match item.kind {
        CrawlKind::Post => " Post tracking details (e: export, esc: close) ".to_string(),
        CrawlKind::User => format!(
            " User: {} (e: export, esc: close) ",
            item.label()
        ),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(Span::styled(title, Style::default().fg(COLOR_HEADER)));

    let lines = match data {
        None => vec![Line::from(Span::styled(
            "Loading tracking data...",
            Style::default().fg(COLOR_DIM),
        ))],
        Some(data) => detail_lines(item, data, overlay.width.saturating_sub(4) as usize),
    };
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

fn detail_lines(item: &CrawlItem, data: &TrackingData, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match item.kind {
        CrawlKind::Post => {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} comments | {} reactions | {} unique users",
                    item.comments_found, item.reactions_found, item.unique_users
                ),
                Style::default().fg(COLOR_ACCENT),
            )));
            if !data.engagement_stats.emoji_breakdown.is_empty() {
                let top = data
                    .engagement_stats
                    .emoji_breakdown
                    .iter()
                    .map(|(emoji, count)| format!("{} {}", emoji, count))
                    .collect::<Vec<_>>()
                    .join("  ");
                lines.push(Line::from(Span::raw(format!("Top emojis: {}", top))));
            }
            lines.push(Line::default());
            for comment in &data.comments {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("@{} ", comment.username),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format_relative_time(comment.timestamp),
                        Style::default().fg(COLOR_DIM),
                    ),
                ]));
                lines.push(Line::from(Span::raw(format!(
                    "  {}",
                    truncate(&comment.text, width)
                ))));
            }
        }
        CrawlKind::User => {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} posts | {} interactions | avg engagement {}",
                    item.posts_found, item.interactions, data.activity_stats.avg_engagement
                ),
                Style::default().fg(COLOR_ACCENT),
            )));
            if !data.activity_stats.hashtag_usage.is_empty() {
                lines.push(Line::from(Span::raw(format!(
                    "Hashtags: {}",
                    data.activity_stats.hashtag_usage.join(", ")
                ))));
            }
            lines.push(Line::default());
            for post in &data.posts {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:>6} ", post.engagement),
                        Style::default().fg(COLOR_ACCENT),
                    ),
                    Span::raw(truncate(&post.caption, width.saturating_sub(8))),
                    Span::styled(
                        format!("  {}", format_relative_time(post.posted_at)),
                        Style::default().fg(COLOR_DIM),
                    ),
                ]));
            }
        }
    }
    lines
}
