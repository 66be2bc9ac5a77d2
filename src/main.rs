use std::io;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use scout::api::ApiClient;
use scout::app::App;
use scout::cache::QueryCache;
use scout::config::Config;
use scout::{logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let config = Config::from_env();
    info!(base_url = %config.api_base_url, "starting scout");

    let cache = QueryCache::new(ApiClient::new(&config));
    let mut app = App::new(cache);
    app.start();

    setup_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;
    result
}

/// Restore the terminal even when we die inside the draw loop.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut message_rx = app
        .message_rx
        .take()
        .ok_or_else(|| eyre!("message receiver already taken"))?;

    loop {
        if app.dirty {
            terminal.draw(|frame| ui::render(frame, app))?;
            app.dirty = false;
        }

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key);
                    }
                    Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                    _ => {}
                }
            }
            Some(message) = message_rx.recv() => {
                app.handle_message(message);
                // Drain whatever else arrived so one redraw covers the batch
                while let Ok(message) = message_rx.try_recv() {
                    app.handle_message(message);
                }
            }
        }

        if app.should_quit {
            info!("shutting down");
            break;
        }
    }
    Ok(())
}
