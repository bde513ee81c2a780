//! Dtugraph TUI - interactive knowledge graph view in the terminal
//!
//! Loads a graph JSON file and lets you:
//! - Move a cursor between nodes to highlight their neighborhood
//! - Select and open nodes
//! - Search node labels
//! - Toggle tier filters and switch layouts

mod adapter;
mod app;
mod canvas;
mod placement;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dtugraph_core::config::Config;
use dtugraph_core::graph::GraphModel;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;

#[derive(Parser)]
#[command(name = "dtugraph-tui")]
#[command(author, version, about = "Interactive terminal view of a DTU knowledge graph", long_about = None)]
struct Args {
    /// Graph JSON file
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = Config::load()?;
    init_logging()?;

    let json = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read graph file: {}", args.file.display()))?;
    let model = GraphModel::from_json(&json)?;
    info!(
        file = %args.file.display(),
        nodes = model.node_count(),
        edges = model.edge_count(),
        "Loaded graph"
    );

    let title = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let mut app = App::new(model, &config, title);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Logs go to a file; the terminal belongs to the UI
fn init_logging() -> anyhow::Result<()> {
    let dir = Config::config_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    let path = dir.join("dtugraph-tui.log");
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dtugraph=info".parse()?))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick(Instant::now());
        if app.should_quit() {
            return Ok(());
        }
    }
}
