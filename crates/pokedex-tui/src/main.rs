//! Pokedex - A terminal browser for the PokéAPI catalog.
//!
//! This application provides a fast, keyboard-driven interface for paging
//! through and searching every Pokémon, with details fetched on demand and
//! cached for the session.

mod app;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pokedex_core::models::{Pokemon, PokemonId};
use pokedex_core::{ApiClient, Config, Orchestrator, SessionCache, ViewStateSync};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the cache directory
const LOG_FILE: &str = "pokedex.log";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Interactive browser, optionally starting from a canonical query string
    /// and with a detail page open over the list
    Browse { query: String, pokemon: Option<PokemonId> },
    /// Resolve one view and print it as JSON
    Dump { query: String },
    /// Resolve one detail record and print it as JSON
    DumpPokemon { id: PokemonId },
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::Browse { query: String::new(), pokemon: None }),
        [flag] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [flag, query] if flag == "--query" => Ok(Command::Browse { query: query.clone(), pokemon: None }),
        [flag, id] if flag == "--pokemon" => Ok(Command::Browse {
            query: String::new(),
            pokemon: Some(parse_pokemon_id(id)?),
        }),
        [q, query, p, id] if q == "--query" && p == "--pokemon" => Ok(Command::Browse {
            query: query.clone(),
            pokemon: Some(parse_pokemon_id(id)?),
        }),
        [flag, query] if flag == "--dump" => Ok(Command::Dump { query: query.clone() }),
        [flag, id] if flag == "--dump-pokemon" => Ok(Command::DumpPokemon { id: parse_pokemon_id(id)? }),
        [flag] if flag == "--query" || flag == "--dump" => bail!("{} requires a query string, e.g. \"page=2\"", flag),
        [flag] if flag == "--pokemon" || flag == "--dump-pokemon" => bail!("{} requires a Pokémon id, e.g. 25", flag),
        other => bail!("Unrecognized arguments: {}", other.join(" ")),
    }
}

fn parse_pokemon_id(value: &str) -> Result<PokemonId> {
    let id: u32 = value
        .parse()
        .with_context(|| format!("Invalid Pokémon id: {}", value))?;
    if id == 0 {
        bail!("Invalid Pokémon id: {}", value);
    }
    Ok(PokemonId(id))
}

fn print_usage() {
    println!("Usage: pokedex [--query <query>] [--pokemon <id>] [--dump <query>] [--dump-pokemon <id>]");
    println!();
    println!("  --query <query>      Open the browser at a view, e.g. \"search=char&page=1\"");
    println!("  --pokemon <id>       Open the detail page for one Pokémon");
    println!("  --dump <query>       Print the resolved view as JSON and exit");
    println!("  --dump-pokemon <id>  Print one Pokémon's details as JSON and exit");
    println!();
    println!("Environment: POKEDEX_API_URL overrides the API base URL; RUST_LOG sets the log level.");
}

/// Initialize the tracing subscriber, writing to a file so logs never
/// corrupt the terminal UI.
fn init_tracing() -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = Config::log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter)
        .init();

    Ok(guard)
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let base_url = config.base_url();
    info!(%base_url, "Using API");
    let client = ApiClient::with_timeout(&base_url, config.request_timeout())
        .context("Failed to create HTTP client")?;
    Ok(Orchestrator::new(client, SessionCache::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    if command == Command::Help {
        print_usage();
        return Ok(());
    }

    // Initialize logging; keep the guard alive so buffered lines are flushed
    let _guard = match init_tracing() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    let orchestrator = build_orchestrator(&config)?;

    match command {
        Command::Dump { query } => dump_view(orchestrator, &query).await,
        Command::DumpPokemon { id } => dump_pokemon(orchestrator, id).await,
        Command::Browse { query, pokemon } => browse(orchestrator, &query, pokemon).await,
        Command::Help => Ok(()),
    }
}

async fn browse(orchestrator: Orchestrator, query: &str, pokemon: Option<PokemonId>) -> Result<()> {
    info!("Pokedex starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and start the first load
    let mut app = App::new(orchestrator, query);
    app.sync_view();
    if let Some(id) = pokemon {
        app.open_detail(id);
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
    }

    info!("Pokedex shutting down");
    Ok(())
}

/// Resolve one view without the UI and print it to stdout as JSON
async fn dump_view(orchestrator: Orchestrator, query: &str) -> Result<()> {
    #[derive(Serialize)]
    struct DumpOutput<'a> {
        query: String,
        search: &'a str,
        page: u32,
        total_count: u64,
        total_pages: u32,
        search_active: bool,
        pokemon: Vec<&'a Pokemon>,
    }

    let view = ViewStateSync::from_query_string(query);
    let current = view.current();
    eprintln!("Loading ?{} ...", view.query_string());

    let page = orchestrator.load_view(&current).await?;

    let output = DumpOutput {
        query: view.query_string(),
        search: &page.query.search,
        page: page.query.page,
        total_count: page.total_count,
        total_pages: page.total_pages,
        search_active: page.search_active,
        pokemon: page.pokemon.iter().map(|p| p.as_ref()).collect(),
    };

    let json = serde_json::to_string_pretty(&output)?;
    println!("{}", json);

    eprintln!("Done! {} Pokémon shown.", page.pokemon.len());
    Ok(())
}

/// Resolve one detail record without the UI and print it to stdout as JSON
async fn dump_pokemon(orchestrator: Orchestrator, id: PokemonId) -> Result<()> {
    eprintln!("Loading Pokémon #{} ...", id.padded());

    let pokemon = orchestrator.load_detail(id).await?;

    let json = serde_json::to_string_pretty(pokemon.as_ref())?;
    println!("{}", json);
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Commit settled search input, then apply completed loads
        app.tick(Instant::now());
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
