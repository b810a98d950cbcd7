//! # Item Commands
//!
//! Host commands for line items and their consumption.
//!
//! ## Item Editing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Lifecycle                                  │
//! │                                                                         │
//! │  add_item ──► blank EQUAL line, everyone ticked                         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  update_item ──► name / price / receipt quantity                        │
//! │     │                                                                   │
//! │     ├── EQUAL ──► set_selection (tick / untick one person)              │
//! │     │                                                                   │
//! │     └── set_split_mode(UNIT) ──► set_units (units per person)          │
//! │                                                                         │
//! │  delete_item ──► gone from the bill and from every total               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An item whose consumption does not add up is not an error here. It is
//! stored, excluded from totals, and listed in `summary.invalidItems`.

use billsplit_core::{BillState, ItemDetails, ItemId, ParticipantId, SplitMode};
use serde::Serialize;
use tracing::debug;

use super::BillView;
use crate::error::ApiError;
use crate::state::BillSessionState;

/// Result of adding an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedItem {
    pub item_id: ItemId,
    #[serde(flatten)]
    pub view: BillView,
}

/// Appends a blank EQUAL item shared by everyone.
pub fn add_item(session: &BillSessionState) -> AddedItem {
    debug!("add_item command");

    let (bill, item_id) = session.apply_with(BillState::with_new_item);
    AddedItem {
        item_id,
        view: BillView::from(bill),
    }
}

/// Edits the name, price or receipt quantity of an item.
///
/// ## Errors
/// - `NOT_FOUND`: unknown item
/// - `VALIDATION_ERROR`: blank name, non-finite price, quantity out of range
pub fn update_item(
    session: &BillSessionState,
    item_id: String,
    details: ItemDetails,
) -> Result<BillView, ApiError> {
    debug!(item_id = %item_id, ?details, "update_item command");

    let id = ItemId::new(item_id);
    let bill = session.update(|b| b.with_item_details(&id, details))?;
    Ok(BillView::from(bill))
}

/// Switches an item between EQUAL and UNIT.
///
/// Switching discards the old consumption record. Switching to the mode the
/// item already has changes nothing.
pub fn set_split_mode(
    session: &BillSessionState,
    item_id: String,
    mode: SplitMode,
) -> Result<BillView, ApiError> {
    debug!(item_id = %item_id, mode = %mode, "set_split_mode command");

    let id = ItemId::new(item_id);
    let bill = session.update(|b| b.with_split_mode(&id, mode))?;
    Ok(BillView::from(bill))
}

/// Ticks or unticks one participant on an EQUAL item.
pub fn set_selection(
    session: &BillSessionState,
    item_id: String,
    participant_id: String,
    selected: bool,
) -> Result<BillView, ApiError> {
    debug!(item_id = %item_id, participant_id = %participant_id, selected, "set_selection command");

    let item = ItemId::new(item_id);
    let participant = ParticipantId::new(participant_id);
    let bill = session.update(|b| b.with_selection(&item, &participant, selected))?;
    Ok(BillView::from(bill))
}

/// Sets one participant's unit count on a UNIT item.
pub fn set_units(
    session: &BillSessionState,
    item_id: String,
    participant_id: String,
    units: u32,
) -> Result<BillView, ApiError> {
    debug!(item_id = %item_id, participant_id = %participant_id, units, "set_units command");

    let item = ItemId::new(item_id);
    let participant = ParticipantId::new(participant_id);
    let bill = session.update(|b| b.with_units(&item, &participant, units))?;
    Ok(BillView::from(bill))
}

/// Removes an item.
pub fn delete_item(session: &BillSessionState, item_id: String) -> Result<BillView, ApiError> {
    debug!(item_id = %item_id, "delete_item command");

    let id = ItemId::new(item_id);
    let bill = session.update(|b| b.without_item(&id))?;
    Ok(BillView::from(bill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::participant::add_participant;
    use crate::error::ErrorCode;
    use billsplit_core::ItemIssue;

    fn session_with_two() -> (BillSessionState, String, String) {
        let session = BillSessionState::new();
        let a = add_participant(&session, "Alice".into()).unwrap().participant_id;
        let b = add_participant(&session, "Bob".into()).unwrap().participant_id;
        (session, a.to_string(), b.to_string())
    }

    fn priced_item(session: &BillSessionState, name: &str, price: f64, quantity: u32) -> String {
        let id = add_item(session).item_id.to_string();
        update_item(
            session,
            id.clone(),
            ItemDetails {
                name: Some(name.into()),
                price: Some(price),
                quantity: Some(quantity),
            },
        )
        .unwrap();
        id
    }

    #[test]
    fn test_new_item_is_shared_by_everyone() {
        let (session, a, b) = session_with_two();
        priced_item(&session, "Naan", 100.0, 1);

        let view = BillView::from(session.snapshot());
        assert_eq!(view.summary.totals.get(&ParticipantId::new(a)), Some(50.0));
        assert_eq!(view.summary.totals.get(&ParticipantId::new(b)), Some(50.0));
    }

    #[test]
    fn test_unit_split_flow() {
        let (session, a, b) = session_with_two();
        let coke = priced_item(&session, "Coke", 90.0, 3);

        let view = set_split_mode(&session, coke.clone(), SplitMode::Unit).unwrap();
        assert!(!view.summary.is_valid);

        set_units(&session, coke.clone(), a.clone(), 2).unwrap();
        let view = set_units(&session, coke, b.clone(), 1).unwrap();

        assert!(view.summary.is_valid);
        assert_eq!(view.summary.totals.get(&ParticipantId::new(a)), Some(60.0));
        assert_eq!(view.summary.totals.get(&ParticipantId::new(b)), Some(30.0));
    }

    #[test]
    fn test_over_assigned_units_reported() {
        let (session, a, _) = session_with_two();
        let coke = priced_item(&session, "Coke", 90.0, 1);
        set_split_mode(&session, coke.clone(), SplitMode::Unit).unwrap();

        let view = set_units(&session, coke, a, 2).unwrap();
        assert_eq!(
            view.summary.invalid_items[0].1,
            ItemIssue::UnitsExceedQuantity { assigned: 2, quantity: 1 }
        );
    }

    #[test]
    fn test_selection_on_unit_item_rejected() {
        let (session, a, _) = session_with_two();
        let coke = priced_item(&session, "Coke", 90.0, 1);
        set_split_mode(&session, coke.clone(), SplitMode::Unit).unwrap();

        let err = set_selection(&session, coke, a, true).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_untick_everyone_makes_item_invalid() {
        let (session, a, b) = session_with_two();
        let naan = priced_item(&session, "Naan", 100.0, 1);

        set_selection(&session, naan.clone(), a, false).unwrap();
        let view = set_selection(&session, naan, b, false).unwrap();

        assert!(!view.summary.is_valid);
        assert_eq!(view.summary.totals.sum(), 0.0);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (session, _, _) = session_with_two();
        let id = add_item(&session).item_id.to_string();

        let err = update_item(
            &session,
            id,
            ItemDetails {
                quantity: Some(0),
                ..ItemDetails::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_negative_price_is_a_correction_line() {
        let (session, a, b) = session_with_two();
        priced_item(&session, "Naan", 100.0, 1);
        priced_item(&session, "Refund", -20.0, 1);

        let view = BillView::from(session.snapshot());
        assert_eq!(view.summary.totals.get(&ParticipantId::new(a)), Some(40.0));
        assert_eq!(view.summary.totals.get(&ParticipantId::new(b)), Some(40.0));
    }

    #[test]
    fn test_delete_item() {
        let (session, _, _) = session_with_two();
        let naan = priced_item(&session, "Naan", 100.0, 1);

        let view = delete_item(&session, naan.clone()).unwrap();
        assert!(view.bill.items.is_empty());

        let err = delete_item(&session, naan).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
