//! # Host Commands Module
//!
//! All commands exposed to a front end.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (BillView, exports)
//! ├── bill.rs         ◄─── Bill-wide fields, breakdown, actions, reset
//! ├── participant.rs  ◄─── Add / remove participants
//! ├── item.rs         ◄─── Line items and who consumed them
//! ├── import.rs       ◄─── Pasted JSON and demo bill
//! ├── history.rs      ◄─── Saved bills
//! └── config.rs       ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Front end                                                              │
//! │  ─────────                                                              │
//! │  set_units({ itemId: '1', participantId: 'p4', units: 3 })              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust Host                                                              │
//! │  ─────────                                                              │
//! │  fn set_units(                                                          │
//! │      session: &BillSessionState,  ◄── Only the state it needs          │
//! │      item_id: String,                                                   │
//! │      participant_id: String,                                            │
//! │      units: u32,                                                        │
//! │  ) -> Result<BillView, ApiError>                                        │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Front end receives: { bill, summary }                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command that changes the bill answers with a fresh [`BillView`],
//! so the front end never recomputes totals itself.

use billsplit_core::{summarize, BillState, BillSummary};
use serde::Serialize;

pub mod bill;
pub mod config;
pub mod history;
pub mod import;
pub mod item;
pub mod participant;

/// The bill together with its computed totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillView {
    pub bill: BillState,
    pub summary: BillSummary,
}

impl From<BillState> for BillView {
    fn from(bill: BillState) -> Self {
        let summary = summarize(&bill);
        BillView { bill, summary }
    }
}
