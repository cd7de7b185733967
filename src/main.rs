mod action;
mod app;
mod config;
mod error;
mod event;
mod fetch;
mod github;
mod list;
mod source;
mod store;
mod theme;
mod tui;
mod types;
mod ui;

use std::fs::OpenOptions;
use std::panic;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::fetch::HealthCheck;
use crate::github::GitHub;
use crate::store::BookmarkStore;
use crate::theme::Theme;
use crate::tui::EventHandler;
use crate::types::RepositorySummary;

#[tokio::main]
async fn main() {
    init_logging();

    let config = Config::load();

    let github = match GitHub::new(config.token(), config.discovery.days) {
        Ok(github) => github,
        Err(e) => {
            eprintln!("Error creating GitHub client: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Finding the most active repositories of the last {} days...",
        config.discovery.days
    );
    let repos = match github.discover(&config.discovery).await {
        Ok(repos) => repos,
        Err(e) => {
            eprintln!("Error fetching repositories: {}", e);
            process::exit(1);
        }
    };

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(config, Arc::new(github), repos).await;
    let _ = tui::restore();

    if let Err(e) = result {
        eprintln!("Error launching UI: {}", e);
        process::exit(1);
    }
}

/// Log to a file in the cache directory; the terminal belongs to the UI
fn init_logging() {
    let writer = dirs::cache_dir()
        .map(|dir| dir.join("hotrepos"))
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("hotrepos.log"))
                .ok()
        })
        .map(|file| BoxMakeWriter::new(Mutex::new(file)))
        .unwrap_or_else(|| BoxMakeWriter::new(std::io::sink));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
}

async fn run(
    config: Config,
    github: Arc<GitHub>,
    repos: Vec<RepositorySummary>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize terminal
    let mut terminal = tui::init()?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let theme = Theme::default();
    let mut app = App::new(
        repos,
        github,
        BookmarkStore::new(config.bookmarks.database),
        HealthCheck::new(config.health_check.script),
        config.ui.list_limit,
        config.discovery.days,
        action_tx.clone(),
    );

    let size = terminal.size()?;
    app.update(Action::Resize(size.width, size.height));

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    // Main loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app, &theme))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
