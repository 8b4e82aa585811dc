// src/main.rs

use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use scan_console::app::App;
use scan_console::config::ClientConfig;
use scan_console::core::api::ApiClient;
use scan_console::core::health::spawn_health_checker;
use scan_console::core::session::Session;
use scan_console::dispatch::Dispatcher;
use scan_console::event::AppEvent;
use scan_console::keymap::handle_key;
use scan_console::{logging, ui};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const TICK_RATE: Duration = Duration::from_millis(100);
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let config = ClientConfig::load()?;
    let api = ApiClient::new(&config).wrap_err("Failed to build API client")?;
    let session = Arc::new(Session::new());
    let (tx, mut rx) = mpsc::channel::<AppEvent>(EVENT_CHANNEL_CAPACITY);

    let dispatcher = Dispatcher::new(
        api.clone(),
        session.clone(),
        tx.clone(),
        config.monitor_settings(),
        config.download_dir(),
    );
    let health = spawn_health_checker(api, session.clone(), config.health_interval(), tx);

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(session.clone());
    app.apply_default_scan_type(&config.default_scan_type);
    dispatcher.dispatch_all(app.init());
    info!("Scan console started.");

    let result = run(&mut terminal, &mut app, &dispatcher, &mut rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;

    session.shutdown();
    health.abort();
    info!("Scan console stopped.");
    result
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &Dispatcher,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let actions = handle_key(app, key);
                    dispatcher.dispatch_all(actions);
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            let actions = app.on_event(event);
            dispatcher.dispatch_all(actions);
        }

        app.on_tick();
    }
    Ok(())
}
