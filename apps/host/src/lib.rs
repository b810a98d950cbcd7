//! # Billsplit Host Library
//!
//! Session host for the Billsplit engine: holds the bill being edited,
//! exposes commands to a front end, and keeps the bill history.
//!
//! ## Module Organization
//! ```text
//! billsplit_host/
//! ├── lib.rs            ◄─── You are here (startup & CLI run)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── db.rs         ◄─── Database state wrapper
//! │   ├── bill.rs       ◄─── Current bill (Arc<Mutex<BillState>>)
//! │   └── config.rs     ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs        ◄─── BillView, command exports
//! │   ├── bill.rs       ◄─── Bill-wide fields, breakdown, actions
//! │   ├── participant.rs◄─── Participants
//! │   ├── item.rs       ◄─── Line items and consumption
//! │   ├── import.rs     ◄─── Pasted JSON, demo bill
//! │   ├── history.rs    ◄─── Saved bills
//! │   └── config.rs     ◄─── Configuration retrieval
//! └── error.rs          ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Host State                                           │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    DbState       │ │ BillSessionState │ │    ConfigState       │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Database pool │ │  • Current bill  │ │  • DB path           │   │
//! │  │  • Saved bills   │ │                  │ │  • Import / payment  │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  Each command only takes the state it needs.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::{Path, PathBuf};

use billsplit_core::BillState;
use billsplit_db::{Database, DbConfig, DbError};
use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use commands::BillView;
use error::ApiError;
use state::{BillSessionState, ConfigState, DbState};

/// File name of the history database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "billsplit.db";

// =============================================================================
// App State
// =============================================================================

/// Every piece of state a front end shell needs to manage.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DbState,
    pub session: BillSessionState,
    pub config: ConfigState,
}

impl AppState {
    /// Opens the history database and starts an empty session.
    pub async fn init(config: ConfigState) -> Result<Self, CliError> {
        let db_path = get_database_path(&config)?;
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        Ok(AppState {
            db: DbState::new(db),
            session: BillSessionState::new(),
            config,
        })
    }
}

// =============================================================================
// CLI
// =============================================================================

/// Errors that end the `billsplit` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Could not create data directory: {0}")]
    DataDir(std::io::Error),

    #[error("Invalid bill file: {0}")]
    InvalidBill(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Split a shared bill.
///
/// Prints the bill and who owes what as JSON. Without BILL_JSON or
/// --import the demo bill is used.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "billsplit", version)]
#[command(after_help = "Environment:\n  BILLSPLIT_DB_PATH, BILLSPLIT_HISTORY_LIMIT, RUST_LOG")]
pub struct CliArgs {
    /// A saved bill (JSON)
    #[arg(value_name = "BILL_JSON", conflicts_with = "import_path")]
    pub bill_path: Option<PathBuf>,

    /// Import items from an AI reply (JSON, may be fenced)
    #[arg(short, long = "import", value_name = "PATH")]
    pub import_path: Option<PathBuf>,

    /// Save the bill to history
    #[arg(short, long)]
    pub save: bool,

    /// List saved bills instead
    #[arg(long, conflicts_with_all = ["bill_path", "import_path", "save"])]
    pub history: bool,
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the bill the CLI works on into the session.
fn load_bill(session: &BillSessionState, args: &CliArgs) -> Result<BillView, CliError> {
    if let Some(path) = &args.bill_path {
        let bill: BillState = serde_json::from_str(&read_file(path)?)?;
        session.replace(bill.clone());
        return Ok(BillView::from(bill));
    }

    if let Some(path) = &args.import_path {
        return Ok(commands::import::import_json(session, read_file(path)?)?);
    }

    Ok(commands::import::load_demo(session))
}

/// Runs the `billsplit` command line.
///
/// ## Flow
/// ```text
/// args ──► bill file / import / demo ──► BillView ──► stdout (JSON)
///                                           │
///                                   --save ─┴─► history database
/// ```
pub async fn run(args: CliArgs) -> Result<(), CliError> {
    init_tracing();

    let config = ConfigState::from_env();

    if args.history {
        let app = AppState::init(config).await?;
        let history = commands::history::list_history(&app.db, &app.config).await?;
        println!("{}", serde_json::to_string_pretty(&history)?);
        app.db.inner().close().await;
        return Ok(());
    }

    let session = BillSessionState::new();
    let view = load_bill(&session, &args)?;
    println!("{}", serde_json::to_string_pretty(&view)?);

    if args.save {
        let app = AppState {
            session,
            ..AppState::init(config).await?
        };
        let saved = commands::history::save_bill(&app.db, &app.session, None).await?;
        info!(id = %saved.id, "Saved to history");
        app.db.inner().close().await;
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays valid JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=billsplit=trace` - Show trace for billsplit crates only
/// - Default: INFO, DEBUG for billsplit crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,billsplit=debug,sqlx=warn"));

    // A second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.billsplit.app/billsplit.db`
/// - **Windows**: `%APPDATA%\billsplit\app\data\billsplit.db`
/// - **Linux**: `~/.local/share/app/billsplit.db`
///
/// ## Override
/// Set `BILLSPLIT_DB_PATH` to use a custom path.
pub fn get_database_path(config: &ConfigState) -> Result<PathBuf, CliError> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "billsplit", "app").ok_or(CliError::NoDataDir)?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir).map_err(CliError::DataDir)?;

    Ok(data_dir.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("billsplit").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_defaults_to_demo() {
        assert_eq!(args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_options() {
        let parsed = args(&["bill.json", "--save"]).unwrap();
        assert_eq!(parsed.bill_path, Some(PathBuf::from("bill.json")));
        assert!(parsed.save);

        let parsed = args(&["-i", "reply.txt"]).unwrap();
        assert_eq!(parsed.import_path, Some(PathBuf::from("reply.txt")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--import"]).is_err());
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
        assert!(args(&["a.json", "--import", "reply.txt"]).is_err());
        assert!(args(&["--history", "--save"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_configured_database_path_wins() {
        let config = ConfigState {
            db_path: Some(PathBuf::from("/tmp/custom.db")),
            ..ConfigState::default()
        };
        assert_eq!(get_database_path(&config).unwrap(), PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_load_bill_falls_back_to_demo() {
        let session = BillSessionState::new();
        let view = load_bill(&session, &CliArgs::default()).unwrap();
        assert_eq!(view.bill.participants.len(), 4);
        assert_eq!(session.snapshot(), view.bill);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let session = BillSessionState::new();
        let args = CliArgs {
            bill_path: Some(PathBuf::from("/definitely/not/here.json")),
            ..CliArgs::default()
        };
        assert!(matches!(load_bill(&session, &args), Err(CliError::Read { .. })));
    }
}
