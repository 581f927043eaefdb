use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use comments_tui::api::ApiClient;
use comments_tui::app::{App, AppEvent};
use comments_tui::config::ClientConfig;
use comments_tui::input::{discard_queued_keys, spawn_input_task};
use comments_tui::ui;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut api_url: Option<String> = None;
    let mut health_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" => {
                if i + 1 < args.len() {
                    api_url = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --api-url requires a URL argument");
                    std::process::exit(1);
                }
            }
            "--health" => {
                health_only = true;
                i += 1;
            }
            "--help" | "-h" => {
                println!("Usage: comments-tui [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --api-url <URL>  Backend base URL (default: {})", comments_tui::config::DEFAULT_API_URL);
                println!("  --health         Check the backend and exit");
                println!("  --help, -h       Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
    }

    let mut config = ClientConfig::load().context("Failed to load configuration")?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }

    let _log_guard = init_logging(&config.log_file);
    tracing::info!(api = %config.api_base_url, "comments-tui starting");

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("Failed to build HTTP client")?;
    let api = ApiClient::with_client(&config.api_base_url, client);

    // Handle --health before starting TUI
    if health_only {
        match api.health_check().await {
            Ok(()) => {
                println!("Backend at {} is healthy", api.base_url());
                return Ok(());
            }
            Err(e) => {
                eprintln!("Backend at {} is unreachable: {}", api.base_url(), e);
                std::process::exit(1);
            }
        }
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let app = App::new(api);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("comments-tui exiting");

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging(log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("comments_tui=info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> Result<()> {
    // Create event channel
    let (tx, mut rx) = mpsc::channel::<AppEvent>(100);

    // Spawn input handler
    spawn_input_task(tx.clone(), app.input_gate.clone());

    app.start(tx.clone());

    // Non-key events drained once the editor hands the terminal back
    let mut replay: VecDeque<AppEvent> = VecDeque::new();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        let event = match replay.pop_front() {
            Some(event) => event,
            None => match rx.recv().await {
                Some(event) => event,
                None => return Ok(()),
            },
        };

        match event {
            AppEvent::Key(key) => {
                if app.handle_key(key, tx.clone()).await? {
                    return Ok(());
                }
                // Check if terminal needs clearing after external editor
                if app.needs_terminal_clear {
                    terminal.clear()?;
                    app.needs_terminal_clear = false;
                    replay.extend(discard_queued_keys(&mut rx));
                }
            }
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::CommentsLoaded { ticket, result } => {
                app.on_comments_loaded(ticket, result);
            }
        }
    }
}
