//! # State Module
//!
//! Manages session state for the host.
//!
//! Each concern gets its own state type, and every command takes only the
//! states it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppState (lib.rs)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │ BillSessionState │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Arc<Mutex<      │  │  db_path         │          │
//! │  │  (SQLite     │  │    BillState     │  │  payment         │          │
//! │  │   pool)      │  │  >>              │  │  import          │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • BillSessionState: value replaced wholesale under the Mutex          │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod bill;
mod config;
mod db;

pub use bill::BillSessionState;
pub use config::{ConfigState, ImportConfig, PaymentConfig, DEFAULT_HISTORY_LIMIT};
pub use db::DbState;
