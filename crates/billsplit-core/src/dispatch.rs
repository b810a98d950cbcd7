//! # Action Dispatch
//!
//! Applies a batch of structured edits, typically produced by a language
//! model from a sentence like "Bob didn't have any rice".
//!
//! Actions refer to people and dishes by id OR by name, because a model
//! only ever sees names. Anything that cannot be resolved is skipped and
//! the rest of the batch still runs.
//!
//! ## Wire Shape
//! ```text
//! [
//!   { "type": "ADD_PARTICIPANT",    "name": "Eve" },
//!   { "type": "REMOVE_PARTICIPANT", "id": "Bob" },
//!   { "type": "SET_SPLIT_MODE",     "item": "Roti", "mode": "UNIT" },
//!   { "type": "SET_CHECKED",        "item": "Rice", "participants": ["Alice", "p3"] },
//!   { "type": "SET_UNIT",           "item": "Roti", "participant": "Alice", "quantity": 2 }
//! ]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::lookup::{participant_by_name, resolve_item, resolve_participant};
use crate::types::{BillState, ParticipantId, SplitMode};

/// One structured edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Action {
    AddParticipant {
        name: String,
    },
    /// `id` may also be a participant name.
    RemoveParticipant {
        id: String,
    },
    SetSplitMode {
        item: String,
        mode: SplitMode,
    },
    /// Replaces the selection of an EQUAL item with these participants.
    SetChecked {
        item: String,
        participants: Vec<String>,
    },
    SetUnit {
        item: String,
        participant: String,
        quantity: u32,
    },
}

impl Action {
    fn kind(&self) -> &'static str {
        match self {
            Action::AddParticipant { .. } => "ADD_PARTICIPANT",
            Action::RemoveParticipant { .. } => "REMOVE_PARTICIPANT",
            Action::SetSplitMode { .. } => "SET_SPLIT_MODE",
            Action::SetChecked { .. } => "SET_CHECKED",
            Action::SetUnit { .. } => "SET_UNIT",
        }
    }
}

/// Applies actions in order and returns the resulting bill.
///
/// Never fails. An action that names an unknown item or participant, or
/// targets an item in the wrong split mode, is logged and skipped.
///
/// ## Example
/// ```rust
/// use billsplit_core::dispatch::{dispatch_actions, Action};
/// use billsplit_core::import::demo_bill;
///
/// let bill = demo_bill();
/// let next = dispatch_actions(&bill, &[
///     Action::SetUnit { item: "butter roti (x3)".into(), participant: "David".into(), quantity: 3 },
///     Action::RemoveParticipant { id: "Nobody".into() },
/// ]);
///
/// assert_eq!(next.participants.len(), 4);
/// assert!(billsplit_core::is_bill_valid(&next));
/// ```
pub fn dispatch_actions(bill: &BillState, actions: &[Action]) -> BillState {
    actions.iter().fold(bill.clone(), |state, action| {
        match apply(&state, action) {
            Ok(Some(next)) => next,
            Ok(None) => {
                debug!(action = action.kind(), "Action did not resolve, skipped");
                state
            }
            Err(e) => {
                debug!(action = action.kind(), error = %e, "Action rejected, skipped");
                state
            }
        }
    })
}

/// `Ok(None)` when a reference does not resolve or the action is a no-op.
fn apply(bill: &BillState, action: &Action) -> CoreResult<Option<BillState>> {
    match action {
        Action::AddParticipant { name } => {
            if participant_by_name(bill, name).is_some() {
                return Ok(None);
            }
            bill.with_participant(name).map(|(next, _)| Some(next))
        }

        Action::RemoveParticipant { id } => match resolve_participant(bill, id) {
            Some(p) => bill.without_participant(&p.id).map(Some),
            None => Ok(None),
        },

        Action::SetSplitMode { item, mode } => match resolve_item(bill, item) {
            Some(found) => bill.with_split_mode(&found.id, *mode).map(Some),
            None => Ok(None),
        },

        Action::SetChecked { item, participants } => {
            let Some(found) = resolve_item(bill, item) else {
                return Ok(None);
            };
            if found.split_mode() != SplitMode::Equal {
                return Ok(None);
            }
            let selected: BTreeSet<ParticipantId> = participants
                .iter()
                .filter_map(|reference| resolve_participant(bill, reference))
                .map(|p| p.id.clone())
                .collect();
            bill.with_selected_participants(&found.id, selected).map(Some)
        }

        Action::SetUnit {
            item,
            participant,
            quantity,
        } => {
            let (Some(found), Some(person)) =
                (resolve_item(bill, item), resolve_participant(bill, participant))
            else {
                return Ok(None);
            };
            bill.with_units(&found.id, &person.id, *quantity).map(Some)
        }
    }
}
