//! # Database State
//!
//! Wraps the `Database` connection for use in host commands.
//!
//! ## Thread Safety
//! The `Database` struct from `billsplit-db` contains a `SqlitePool` which
//! is inherently thread-safe. History commands can run concurrently
//! without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_history(
//!     db: &DbState,
//!     config: &ConfigState,
//! ) -> Result<Vec<SavedBillSummary>, ApiError> {
//!     Ok(db.inner().bills().list_recent(config.history_limit).await?)
//! }
//! ```

use billsplit_db::Database;

/// Wrapper around `Database` for host state management.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
