//! # Bill Commands
//!
//! Host commands for bill-wide fields and the computed views.
//!
//! ## Bill Screen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PUNJABI AAHAR                                      set_bill_name       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Items ...                                          (item.rs)           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Discount                       ₹50.00              set_discount        │
//! │  Tax / Charges                  ₹60.00              set_tax             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Alice   ₹215.83  ▸ tap ──────────────────────────► get_breakdown       │
//! │  Bob     ₹155.83                                                        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  "Charlie had both cokes" ─► (translator) ─────────► apply_actions      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billsplit_core::{
    dispatch_actions, participant_breakdown, Action, BillState, BreakdownLine, ParticipantId,
};
use tracing::{debug, info};

use super::BillView;
use crate::error::ApiError;
use crate::state::BillSessionState;

/// Gets the current bill with its totals.
pub fn get_bill(session: &BillSessionState) -> BillView {
    debug!("get_bill command");
    BillView::from(session.snapshot())
}

/// Sets the flat discount. Spread evenly over every participant.
pub fn set_discount(session: &BillSessionState, amount: f64) -> Result<BillView, ApiError> {
    debug!(amount, "set_discount command");
    let bill = session.update(|b| b.with_discount(amount))?;
    Ok(BillView::from(bill))
}

/// Sets the flat tax / service charge. Spread evenly over every participant.
pub fn set_tax(session: &BillSessionState, amount: f64) -> Result<BillView, ApiError> {
    debug!(amount, "set_tax command");
    let bill = session.update(|b| b.with_tax(amount))?;
    Ok(BillView::from(bill))
}

/// Sets the bill's display name. `None` or blank clears it.
pub fn set_bill_name(session: &BillSessionState, name: Option<String>) -> BillView {
    debug!(?name, "set_bill_name command");
    BillView::from(session.apply(|b| b.with_bill_name(name)))
}

/// Itemized view of what one participant owes.
///
/// ## Errors
/// - `NOT_FOUND`: the participant is not on the bill
pub fn get_breakdown(
    session: &BillSessionState,
    participant_id: String,
) -> Result<Vec<BreakdownLine>, ApiError> {
    debug!(participant_id = %participant_id, "get_breakdown command");

    let id = ParticipantId::new(participant_id);
    session.with_bill(|b| {
        if !b.has_participant(&id) {
            return Err(ApiError::not_found("Participant", id.as_str()));
        }
        Ok(participant_breakdown(b, &id))
    })
}

/// Applies a batch of structured edits, usually from a natural-language
/// command translator.
///
/// Actions that do not resolve are skipped, so this never fails.
pub fn apply_actions(session: &BillSessionState, actions: Vec<Action>) -> BillView {
    info!(count = actions.len(), "apply_actions command");
    BillView::from(session.apply(|b| dispatch_actions(b, &actions)))
}

/// Starts over with an empty bill.
pub fn reset_bill(session: &BillSessionState) -> BillView {
    info!("reset_bill command");
    session.replace(BillState::new());
    BillView::from(BillState::new())
}
