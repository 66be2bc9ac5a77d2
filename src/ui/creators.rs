//! Creators screen: monitored account list and the add form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::helpers::format_relative_time;
use crate::ui::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_HEADER};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let constraints = if app.creators.is_adding() {
        vec![Constraint::Length(3), Constraint::Min(3)]
    } else {
        vec![Constraint::Min(3)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if app.creators.is_adding() {
        render_add_form(frame, chunks[0], app);
        render_list(frame, chunks[1], app);
    } else {
        render_list(frame, chunks[0], app);
    }
}

fn render_add_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(Span::styled(
            " Add creator (enter to save, esc to cancel) ",
            Style::default().fg(COLOR_HEADER),
        ));
    let input = app.creators.add_input.as_deref().unwrap_or("");
    let line = Line::from(vec![
        Span::styled("@", Style::default().fg(COLOR_DIM)),
        Span::raw(input.to_string()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(
            format!(" Creators ({}) ", app.creators.creators().len()),
            Style::default().fg(COLOR_HEADER),
        ));

    if app.creators.creators().is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No creators monitored yet",
                Style::default().fg(COLOR_DIM),
            )),
            Line::from(Span::styled(
                "Press a to add an Instagram username",
                Style::default().fg(COLOR_DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = app
        .creators
        .creators()
        .iter()
        .enumerate()
        .map(|(index, creator)| {
            let is_selected = index == app.creators.selected;
            let marker = if is_selected { "> " } else { "  " };
            let name_style = if is_selected {
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let last_scan = creator
                .last_scan
                .map(|at| format!("scanned {}", format_relative_time(at)))
                .unwrap_or_else(|| "never scanned".to_string());
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(COLOR_ACCENT)),
                Span::styled(format!("@{:<20}", creator.username), name_style),
                Span::styled(
                    format!("{:>5} posts  ", creator.posts_count),
                    Style::default().fg(COLOR_DIM),
                ),
                Span::styled(last_scan, Style::default().fg(COLOR_DIM)),
            ];
            if let Some(followers) = creator.follower_count {
                spans.push(Span::styled(
                    format!("  {} followers", followers),
                    Style::default().fg(COLOR_DIM),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
