//! # billsplit-core: Pure Bill Splitting Engine
//!
//! This crate decides who owes what on a shared bill. It holds every rule
//! about splitting as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billsplit Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (web / TS bindings)                │   │
//! │  │    Participants ──► Items ──► Totals ──► Breakdown ──► Pay      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Host commands (apps/host)                    │   │
//! │  │    add_participant, set_units, import_json, save_bill, etc.     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ billsplit-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌──────────┐   │   │
//! │  │   │   types   │  │ validation │  │allocation │  │   bill   │   │   │
//! │  │   │ BillState │  │ item_issue │  │ bill_     │  │ with_*   │   │   │
//! │  │   │ LineItem  │  │ validate_* │  │  totals   │  │ without_*│   │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └──────────┘   │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐                 │   │
//! │  │   │  import   │  │  dispatch  │  │  lookup   │                 │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                billsplit-db (Bill History)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (BillState, LineItem, Consumption, etc.)
//! - [`money`] - Rounding and per-head helpers
//! - [`validation`] - Item consistency and input checks
//! - [`allocation`] - Item shares, bill totals, participant breakdown
//! - [`bill`] - Immutable bill mutations
//! - [`import`] - Parsing externally extracted bills
//! - [`lookup`] - Participant and item lookup by id or name
//! - [`dispatch`] - Applying structured edit actions
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same bill in, same totals out
//! 2. **No I/O**: persistence and AI extraction live in other crates
//! 3. **Round Once**: shares stay unrounded until the final totals
//! 4. **Invalid Is Not an Error**: half-filled items contribute 0 and are reported
//!
//! ## Example Usage
//!
//! ```rust
//! use billsplit_core::{bill_totals, BillState, SplitMode};
//!
//! let bill = BillState::new();
//! let (bill, alice) = bill.with_participant("Alice").unwrap();
//! let (bill, bob) = bill.with_participant("Bob").unwrap();
//!
//! let (bill, paneer) = bill.with_new_item();
//! let bill = bill.with_item_details(&paneer, billsplit_core::ItemDetails {
//!     name: Some("Paneer".into()),
//!     price: Some(300.0),
//!     quantity: None,
//! }).unwrap();
//! let bill = bill.with_tax(20.0).unwrap();
//!
//! let totals = bill_totals(&bill);
//! assert_eq!(totals.get(&alice), Some(160.0));
//! assert_eq!(totals.get(&bob), Some(160.0));
//! # let _ = SplitMode::Equal;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod bill;
pub mod dispatch;
pub mod error;
pub mod import;
pub mod lookup;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{
    bill_totals, item_shares, participant_breakdown, summarize, BillSummary, BreakdownLine,
    Shares, SplitResult,
};
pub use bill::ItemDetails;
pub use dispatch::{dispatch_actions, Action};
pub use error::{CoreError, CoreResult, ImportError, ImportResult, ValidationError};
pub use import::{parse_bill_json, BillSource, ParsedBill, ProtoItem};
pub use types::*;
pub use validation::{is_bill_valid, is_item_valid, item_issue, ItemIssue};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Receipt quantity of a new item, and the capacity of an item whose
/// quantity was never set.
pub const DEFAULT_ITEM_QUANTITY: u32 = 1;

/// Maximum receipt quantity of a single line
///
/// ## Business Reason
/// Catches typos like 1000 instead of 10 on an imported receipt.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum participants on one bill
pub const MAX_PARTICIPANTS: usize = 50;
