//! Rendering.
//!
//! One stateless render function per screen, dispatched from [`render`].
//! Every screen shares the same frame: a tab header on top, the screen body,
//! and a one-line status/hint bar at the bottom.

mod crawl;
mod creators;
mod dashboard;
pub mod helpers;
mod posts;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Screen};
use theme::{COLOR_ACCENT, COLOR_DIM, COLOR_ERROR, COLOR_HEADER};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab header
            Constraint::Min(3),    // screen body
            Constraint::Length(1), // status line
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], app);
    match app.screen {
        Screen::Dashboard => dashboard::render(frame, chunks[1], app),
        Screen::Posts => posts::render(frame, chunks[1], app),
        Screen::Creators => creators::render(frame, chunks[1], app),
        Screen::Crawl => crawl::render(frame, chunks[1], app),
    }
    render_status(frame, chunks[2], app);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " scout ",
        Style::default()
            .fg(COLOR_HEADER)
            .add_modifier(Modifier::BOLD),
    )];
    for (index, screen) in [
        Screen::Dashboard,
        Screen::Posts,
        Screen::Creators,
        Screen::Crawl,
    ]
    .into_iter()
    .enumerate()
    {
        let style = if screen == app.screen {
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_DIM)
        };
        spans.push(Span::styled(
            format!(" [{}] {} ", index + 1, screen.title()),
            style,
        ));
    }
    if app.loading {
        spans.push(Span::styled("  loading...", Style::default().fg(COLOR_DIM)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status {
        Some(status) => {
            let color = if status.is_error {
                COLOR_ERROR
            } else {
                COLOR_ACCENT
            };
            Line::from(Span::styled(
                format!(" {}", status.text),
                Style::default().fg(color),
            ))
        }
        None => Line::from(Span::styled(
            hint_for(app),
            Style::default().fg(COLOR_DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn hint_for(app: &App) -> &'static str {
    match app.screen {
        Screen::Dashboard => " s: scheduler on/off | r: refresh | 1-4: screens | q: quit",
        Screen::Posts => {
            " /: search | c: category | v: layout | i: ignore | I: show ignored | e: export | n/p: page"
        }
        Screen::Creators => " a: add | d: remove | s: scan now | enter: view posts",
        Screen::Crawl => " tab: posts/users | a: add | t: pause/resume | d: remove | enter: details",
    }
}
