//! # Repository Module
//!
//! Database repository implementations for Billsplit.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Host command                                                          │
//! │       │                                                                 │
//! │       │  db.bills().list_recent(20)                                    │
//! │       ▼                                                                 │
//! │  SavedBillRepository                                                   │
//! │  ├── save(&self, bill)                                                 │
//! │  ├── update(&self, id, bill)                                           │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list_recent(&self, limit)                                         │
//! │  ├── delete(&self, id)                                                 │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bill;
