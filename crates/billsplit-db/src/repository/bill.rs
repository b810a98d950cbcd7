//! # Saved Bill Repository
//!
//! Database operations for the bill history.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         saved_bills                                     │
//! │                                                                         │
//! │  id ─────────── UUID                                                   │
//! │  payload ────── full BillState as JSON (source of truth)               │
//! │  bill_name ──┐                                                          │
//! │  grand_total ┴─ copied from the payload on every write, so the         │
//! │                 history list never decodes a payload                   │
//! │  created_at / updated_at                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billsplit_core::money::round_to_cents;
use billsplit_core::{BillState, SavedBill};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

const ENTITY: &str = "Saved bill";

/// One entry of the history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedBillSummary {
    pub id: String,
    pub bill_name: Option<String>,
    pub grand_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SavedBillRow {
    id: String,
    payload: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SavedBillRow {
    fn into_saved_bill(self) -> DbResult<SavedBill> {
        let bill: BillState = serde_json::from_str(&self.payload)?;
        Ok(SavedBill {
            id: self.id,
            bill,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for saved bills.
#[derive(Debug, Clone)]
pub struct SavedBillRepository {
    pool: SqlitePool,
}

impl SavedBillRepository {
    /// Creates a new SavedBillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SavedBillRepository { pool }
    }

    /// Stores a bill as a new history entry.
    pub async fn save(&self, bill: &BillState) -> DbResult<SavedBill> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let payload = serde_json::to_string(bill)?;

        debug!(id = %id, items = bill.items.len(), "Saving bill");

        sqlx::query(
            r#"
            INSERT INTO saved_bills (
                id, bill_name, payload, grand_total, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&bill.bill_name)
        .bind(&payload)
        .bind(round_to_cents(bill.grand_total()))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(SavedBill {
            id,
            bill: bill.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the bill stored under `id`.
    pub async fn update(&self, id: &str, bill: &BillState) -> DbResult<SavedBill> {
        let now = Utc::now();
        let payload = serde_json::to_string(bill)?;

        debug!(id = %id, "Updating saved bill");

        let result = sqlx::query(
            r#"
            UPDATE saved_bills
            SET bill_name = ?2, payload = ?3, grand_total = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&bill.bill_name)
        .bind(&payload)
        .bind(round_to_cents(bill.grand_total()))
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Gets a saved bill by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SavedBill>> {
        let row: Option<SavedBillRow> = sqlx::query_as(
            r#"
            SELECT id, payload, created_at, updated_at
            FROM saved_bills
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SavedBillRow::into_saved_bill).transpose()
    }

    /// Most recently created bills first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SavedBillSummary>> {
        let rows = sqlx::query_as::<_, SavedBillSummary>(
            r#"
            SELECT id, bill_name, grand_total, created_at, updated_at
            FROM saved_bills
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Deletes a saved bill.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting saved bill");

        let result = sqlx::query("DELETE FROM saved_bills WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }
        Ok(())
    }

    /// Number of saved bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM saved_bills")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use billsplit_core::import::demo_bill;

    async fn repo() -> SavedBillRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().bills()
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = repo().await;
        let bill = demo_bill();

        let saved = repo.save(&bill).await.unwrap();
        let loaded = repo.get_by_id(&saved.id).await.unwrap().unwrap();

        assert_eq!(loaded.bill, bill);
        assert_eq!(loaded.id, saved.id);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_bill_is_none() {
        let repo = repo().await;
        assert!(repo.get_by_id("nope").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("nope").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_recent_uses_denormalized_columns() {
        let repo = repo().await;
        let first = repo.save(&BillState::new()).await.unwrap();
        let second = repo.save(&demo_bill()).await.unwrap();

        let list = repo.list_recent(10).await.unwrap();
        assert_eq!(list.len(), 2);

        let demo = list.iter().find(|s| s.id == second.id).unwrap();
        assert_eq!(demo.bill_name.as_deref(), Some("Punjabi Aahar"));
        // 720 of items + 60 tax - 50 discount
        assert_eq!(demo.grand_total, 730.0);

        let empty = list.iter().find(|s| s.id == first.id).unwrap();
        assert_eq!(empty.bill_name, None);

        assert_eq!(repo.list_recent(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_payload() {
        let repo = repo().await;
        let saved = repo.save(&demo_bill()).await.unwrap();

        let renamed = saved.bill.with_bill_name(Some("Dinner".into()));
        let updated = repo.update(&saved.id, &renamed).await.unwrap();

        assert_eq!(updated.bill.bill_name.as_deref(), Some("Dinner"));
        assert!(updated.updated_at >= saved.updated_at);

        assert!(matches!(
            repo.update("nope", &renamed).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let saved = repo.save(&demo_bill()).await.unwrap();

        repo.delete(&saved.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
