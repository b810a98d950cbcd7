//! # Import Commands
//!
//! Bringing receipt lines into the current bill.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_import_prompt ──► user pastes prompt + photo into an AI chat       │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │  import_json(reply) ──► PastedJson ──┐                                  │
//! │                                       ├──► BillSource::fetch ──► append │
//! │  (AI vision source, external) ───────┘                                  │
//! │                                                                         │
//! │  load_demo ──► replace the bill with the sample dinner                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billsplit_core::import::{demo_bill, PastedJson, BILL_ANALYSIS_PROMPT};
use billsplit_core::BillSource;
use tracing::{info, warn};

use super::BillView;
use crate::error::ApiError;
use crate::state::BillSessionState;

/// Instructions for an AI chat that make it answer in the import format.
pub fn get_import_prompt() -> &'static str {
    BILL_ANALYSIS_PROMPT
}

/// Appends the items of any bill source to the current bill.
///
/// Nothing is changed when the source fails.
pub fn import_from(
    session: &BillSessionState,
    source: &dyn BillSource,
) -> Result<BillView, ApiError> {
    let parsed = source.fetch().map_err(|e| {
        warn!(source = source.name(), error = %e, "Import rejected");
        ApiError::from(e)
    })?;

    info!(source = source.name(), items = parsed.items.len(), "Importing bill");
    let bill = session.update(|b| b.with_imported_items(parsed))?;
    Ok(BillView::from(bill))
}

/// Appends items from pasted JSON, usually an AI chat reply.
///
/// ## Errors
/// - `IMPORT_ERROR`: malformed JSON, no `items` array, or a bad item
pub fn import_json(session: &BillSessionState, text: String) -> Result<BillView, ApiError> {
    import_from(session, &PastedJson(text))
}

/// Replaces the current bill with the sample dinner.
pub fn load_demo(session: &BillSessionState) -> BillView {
    info!("load_demo command");
    let demo = demo_bill();
    session.replace(demo.clone());
    BillView::from(demo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::participant::add_participant;
    use crate::error::ErrorCode;
    use billsplit_core::import::DemoBill;
    use billsplit_core::SplitMode;

    #[test]
    fn test_import_json_appends_items() {
        let session = BillSessionState::new();
        add_participant(&session, "Alice".into()).unwrap();
        add_participant(&session, "Bob".into()).unwrap();

        let reply = r#"```json
{"items":[{"name":"Dal","price":200,"splitMode":"EQUAL"},
          {"name":"Lassi","price":100,"quantity":2,"splitMode":"UNIT"}],
 "tax":10,"billName":"Lunch"}
```"#;
        let view = import_json(&session, reply.into()).unwrap();

        assert_eq!(view.bill.items.len(), 2);
        assert_eq!(view.bill.tax, 10.0);
        assert_eq!(view.bill.bill_name.as_deref(), Some("Lunch"));

        // Dal is shared by both, Lassi waits for unit counts
        assert_eq!(view.bill.items[0].consumption.participant_ids().len(), 2);
        assert_eq!(view.bill.items[1].split_mode(), SplitMode::Unit);
        assert!(!view.summary.is_valid);
    }

    #[test]
    fn test_bad_import_leaves_bill_alone() {
        let session = BillSessionState::new();
        let err = import_json(&session, "not json".into()).unwrap_err();

        assert_eq!(err.code, ErrorCode::ImportError);
        assert!(session.snapshot().items.is_empty());

        let err = import_json(&session, r#"{"items":[{"name":"Dal"}]}"#.into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImportError);
        assert!(session.snapshot().items.is_empty());
    }

    #[test]
    fn test_import_from_demo_source() {
        let session = BillSessionState::new();
        let view = import_from(&session, &DemoBill).unwrap();
        assert_eq!(view.bill.items.len(), 5);
        assert_eq!(view.bill.bill_name.as_deref(), Some("Punjabi Aahar"));
    }

    #[test]
    fn test_load_demo_replaces_bill() {
        let session = BillSessionState::new();
        add_participant(&session, "Zed".into()).unwrap();

        let view = load_demo(&session);
        assert_eq!(view.bill.participants.len(), 4);
        assert_eq!(view.summary.grand_total, 730.0);
    }

    #[test]
    fn test_prompt_mentions_items() {
        assert!(get_import_prompt().contains("items"));
    }
}
