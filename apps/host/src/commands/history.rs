//! # History Commands
//!
//! Host commands for saved bills.
//!
//! ## History Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  current bill ── save_bill(None) ────► new entry ──► returns its id     │
//! │       │                                                                 │
//! │       └──────── save_bill(Some(id)) ─► overwrite that entry             │
//! │                                                                         │
//! │  list_history ──► newest first, `history_limit` entries                 │
//! │                                                                         │
//! │  load_saved_bill(id) ──► replaces the current bill                      │
//! │  delete_saved_bill(id)                                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billsplit_core::SavedBill;
use billsplit_db::SavedBillSummary;
use tracing::{debug, info};

use super::BillView;
use crate::error::ApiError;
use crate::state::{BillSessionState, ConfigState, DbState};

/// Saves the current bill to history.
///
/// ## Arguments
/// * `saved_id` - Entry to overwrite; `None` creates a new entry
///
/// ## Errors
/// - `NOT_FOUND`: `saved_id` does not exist
pub async fn save_bill(
    db: &DbState,
    session: &BillSessionState,
    saved_id: Option<String>,
) -> Result<SavedBill, ApiError> {
    let bill = session.snapshot();
    let bills = db.inner().bills();

    let saved = match saved_id {
        Some(id) => bills.update(&id, &bill).await?,
        None => bills.save(&bill).await?,
    };

    info!(id = %saved.id, "Bill saved to history");
    Ok(saved)
}

/// Most recent saved bills, newest first.
pub async fn list_history(
    db: &DbState,
    config: &ConfigState,
) -> Result<Vec<SavedBillSummary>, ApiError> {
    debug!(limit = config.history_limit, "list_history command");
    Ok(db.inner().bills().list_recent(config.history_limit).await?)
}

/// Replaces the current bill with a saved one.
pub async fn load_saved_bill(
    db: &DbState,
    session: &BillSessionState,
    id: String,
) -> Result<BillView, ApiError> {
    debug!(id = %id, "load_saved_bill command");

    let saved = db
        .inner()
        .bills()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Saved bill", &id))?;

    session.replace(saved.bill.clone());
    Ok(BillView::from(saved.bill))
}

/// Deletes a saved bill. The current bill is not affected.
pub async fn delete_saved_bill(db: &DbState, id: String) -> Result<(), ApiError> {
    debug!(id = %id, "delete_saved_bill command");
    db.inner().bills().delete(&id).await?;
    Ok(())
}
