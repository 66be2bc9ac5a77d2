//! Dashboard screen: stat tiles, scheduler state, recent activity, scan log.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::helpers::{format_confidence, format_relative_time};
use crate::ui::theme::{
    COLOR_ACCENT, COLOR_ACTIVE, COLOR_BORDER, COLOR_DIM, COLOR_HEADER, COLOR_PAUSED,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // stat tiles
            Constraint::Length(3), // scheduler
            Constraint::Min(4),    // activity + scan logs
        ])
        .split(area);

    render_tiles(frame, chunks[0], app);
    render_scheduler(frame, chunks[1], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_activity(frame, bottom[0], app);
    render_scan_logs(frame, bottom[1], app);
}

fn render_tiles(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    let stats = app.stats.clone().unwrap_or_default();
    let tiles = [
        ("Creators", stats.active_creators.to_string()),
        ("Posts Today", stats.posts_today.to_string()),
        ("This Week", stats.posts_this_week.to_string()),
        ("Engage", stats.engagement_opportunities.to_string()),
        ("Avg Conf", format_confidence(stats.avg_confidence)),
    ];
    for (column, (label, value)) in columns.iter().zip(tiles) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER));
        let text = vec![
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(label, Style::default().fg(COLOR_DIM))),
        ];
        frame.render_widget(Paragraph::new(text).block(block).centered(), *column);
    }
}

fn render_scheduler(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(" Scheduler ", Style::default().fg(COLOR_HEADER)));

    let line = match app.scheduler {
        Some(status) if status.is_running => Line::from(Span::styled(
            "● running - checking creators every 30 minutes",
            Style::default().fg(COLOR_ACTIVE),
        )),
        Some(_) => Line::from(Span::styled(
            "○ stopped - press s to start",
            Style::default().fg(COLOR_PAUSED),
        )),
        None => Line::from(Span::styled("…", Style::default().fg(COLOR_DIM))),
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_activity(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(
            " Recent Activity ",
            Style::default().fg(COLOR_HEADER),
        ));

    let stats = app.stats.as_ref();
    let lines: Vec<Line> = match stats {
        Some(stats) if !stats.recent_activity.is_empty() => stats
            .recent_activity
            .iter()
            .map(|entry| {
                let when = entry
                    .timestamp
                    .map(format_relative_time)
                    .unwrap_or_default();
                Line::from(vec![
                    Span::styled(format!("{:>4} ", when), Style::default().fg(COLOR_DIM)),
                    Span::raw(entry.message.clone()),
                ])
            })
            .collect(),
        _ => vec![Line::from(Span::styled(
            "No recent activity",
            Style::default().fg(COLOR_DIM),
        ))],
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_scan_logs(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(
            " Scan Log ",
            Style::default().fg(COLOR_HEADER),
        ));

    let lines: Vec<Line> = if app.scan_logs.is_empty() {
        vec![Line::from(Span::styled(
            "No scans yet",
            Style::default().fg(COLOR_DIM),
        ))]
    } else {
        app.scan_logs
            .iter()
            .map(|log| {
                let status_color = if log.status == "success" {
                    COLOR_ACTIVE
                } else {
                    COLOR_PAUSED
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:>4} ", format_relative_time(log.scan_date)),
                        Style::default().fg(COLOR_DIM),
                    ),
                    Span::raw(format!("@{} ", log.creator_username)),
                    Span::styled(
                        format!("{} posts ", log.posts_found),
                        Style::default().fg(COLOR_ACCENT),
                    ),
                    Span::styled(log.status.clone(), Style::default().fg(status_color)),
                ])
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
