//! # Participant Commands
//!
//! Adding someone ticks them on every EQUAL item. Removing someone takes
//! them out of every item, so their shares move to whoever is left.

use billsplit_core::ParticipantId;
use serde::Serialize;
use tracing::debug;

use super::BillView;
use crate::error::ApiError;
use crate::state::BillSessionState;

/// Result of adding a participant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedParticipant {
    pub participant_id: ParticipantId,
    #[serde(flatten)]
    pub view: BillView,
}

/// Adds a participant by name.
///
/// ## Errors
/// - `VALIDATION_ERROR`: blank or overlong name
/// - `BUSINESS_LOGIC`: the bill is full
pub fn add_participant(
    session: &BillSessionState,
    name: String,
) -> Result<AddedParticipant, ApiError> {
    debug!(name = %name, "add_participant command");

    let (bill, participant_id) = session.update_with(|b| b.with_participant(&name))?;
    Ok(AddedParticipant {
        participant_id,
        view: BillView::from(bill),
    })
}

/// Removes a participant and every reference to them.
pub fn remove_participant(
    session: &BillSessionState,
    participant_id: String,
) -> Result<BillView, ApiError> {
    debug!(participant_id = %participant_id, "remove_participant command");

    let id = ParticipantId::new(participant_id);
    let bill = session.update(|b| b.without_participant(&id))?;
    Ok(BillView::from(bill))
}
