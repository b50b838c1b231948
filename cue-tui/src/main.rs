mod api;
mod app;
mod bootstrap;
mod cli;
mod clock;
mod config;
mod runtime;
mod ui;

use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use api::ApiClient;
use app::App;
use cli::{Cli, Commands};
use config::CueConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ConfigPath => {
            let path = CueConfig::config_path()?;
            if !path.exists() {
                CueConfig::default().save()?;
            }
            println!("{}", path.display());
            Ok(())
        }
        Commands::Run => {
            init_logging()?;
            let config = CueConfig::load()?;
            let client = ApiClient::new(&config)?;
            run_tui(client, config.endpoint_label()).await
        }
        Commands::Dev => {
            init_logging()?;
            run_tui(ApiClient::dev(), "dev".to_string()).await
        }
    }
}

/// Tracing goes to a file: stdout belongs to the alternate-screen TUI.
fn init_logging() -> Result<()> {
    let dir = dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("cue-tui");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("cue-tui.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_tui(client: ApiClient, endpoint_label: String) -> Result<()> {
    let mut app = App::new();
    app.endpoint_label = endpoint_label;

    // Reconcile against the remote before taking over the screen, so a
    // timer that is already running shows mid-count on the first frame.
    bootstrap::initialize_app_state(&mut app, &client).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
