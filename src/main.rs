use std::fs::{self, OpenOptions};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod column;
mod controller;
mod domain;
mod engine;
mod inputter;
mod model;
mod overview;
mod record;
mod session;
mod settings;
mod source;
mod store;
mod ui;

use controller::Controller;
use domain::{DashConfig, DashError};
use model::{Model, SessionStore, SettingsStore, Status};
use session::Session;
use settings::SettingsState;
use store::{JsonFileStore, MemoryStore, Persistence, Store};
use ui::TableUI;

/// Terminal admin dashboard with a searchable, sortable user table.
#[derive(Parser, Debug)]
#[command(name = "omnidash", version, about)]
struct Args {
    /// csv, parquet or arrow file to show instead of the demo users
    #[arg(short, long)]
    data: Option<String>,

    /// Rows per page
    #[arg(long, default_value_t = NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN))]
    page_size: NonZeroUsize,

    /// Where settings and the session are kept
    #[arg(long, default_value = "~/.config/omnidash")]
    state_dir: String,

    /// Log file, defaults to omnidash.log in the state directory
    #[arg(long)]
    log_file: Option<String>,

    /// Email prefilled in the login prompt
    #[arg(long, default_value = "demo@example.com")]
    email: String,

    /// Keep all state in memory, nothing is written
    #[arg(long)]
    ephemeral: bool,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

fn main() -> ExitCode {
    let result = run(Args::parse());
    ratatui::restore();
    match result {
        Err(e) => {
            error!("Exiting with error: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand(path: &str) -> Result<PathBuf, DashError> {
    let expanded = shellexpand::full(path).map_err(|e| DashError::loading(e.to_string()))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn init_logging(log_file: &Path) -> Result<(), DashError> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("omnidash=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| DashError::loading(format!("Cannot set up logging: {e}")))
}

fn open_stores(config: &DashConfig) -> Result<(SettingsStore, SessionStore), DashError> {
    let (settings, session): (Box<dyn Persistence<SettingsState>>, Box<dyn Persistence<Session>>) =
        match &config.state_dir {
            Some(dir) => {
                let settings = JsonFileStore::new(dir.join("settings.json").to_string_lossy());
                let session = JsonFileStore::new(dir.join("auth.json").to_string_lossy());
                info!("State in {:?} and {:?}", settings.path(), session.path());
                (Box::new(settings), Box::new(session))
            }
            None => (
                Box::new(MemoryStore::<SettingsState>::default()),
                Box::new(MemoryStore::<Session>::default()),
            ),
        };
    Ok((Store::open(settings)?, Store::open(session)?))
}

fn run(args: Args) -> Result<(), DashError> {
    let state_dir = expand(&args.state_dir)?;
    let log_file = match &args.log_file {
        Some(path) => expand(path)?,
        None if args.ephemeral => std::env::temp_dir().join("omnidash.log"),
        None => state_dir.join("omnidash.log"),
    };
    init_logging(&log_file)?;

    let config = DashConfig::default()
        .with_event_poll_time(args.poll_ms)
        .with_page_size(args.page_size)
        .with_data_path(args.data.as_deref().map(expand).transpose()?)
        .with_state_dir((!args.ephemeral).then_some(state_dir))
        .with_email(args.email);
    info!("Starting omnidash with {config:?}");

    let users = match &config.data_path {
        Some(path) => source::load_data_file(&path.to_string_lossy())?,
        None => source::demo_users(),
    };
    let (settings, session) = open_stores(&config)?;
    let mut model = Model::init(&config, users, settings, session)?;

    let mut ui = TableUI::new();
    let controller = Controller::new(&config);
    let mut terminal = ratatui::init();

    while model.status != Status::Quitting {
        terminal.draw(|f| ui.draw(&model, f))?;

        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    info!("Bye");
    Ok(())
}
