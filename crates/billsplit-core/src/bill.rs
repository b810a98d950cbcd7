//! # Bill Mutations
//!
//! Every edit to a bill goes through one of the methods below. Each takes
//! `&self` and returns a NEW [`BillState`]; the receiver is never touched,
//! so a failed edit leaves the caller's bill exactly as it was.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bill Edit Operations                            │
//! │                                                                         │
//! │  User Action              Method                   Effect               │
//! │  ───────────              ──────                   ──────               │
//! │                                                                         │
//! │  Add person ─────────────► with_participant() ───► push + enroll EQUAL │
//! │                                                                         │
//! │  Remove person ──────────► without_participant() ► drop + purge items  │
//! │                                                                         │
//! │  Add row ────────────────► with_new_item() ──────► blank EQUAL, all on │
//! │                                                                         │
//! │  Toggle tick ────────────► with_selection() ─────► EQUAL items only    │
//! │                                                                         │
//! │  Set count ──────────────► with_units() ─────────► UNIT items only     │
//! │                                                                         │
//! │  Change mode ────────────► with_split_mode() ────► reset if different  │
//! │                                                                         │
//! │  NOTE: validity is NOT enforced here. An item may be left with nobody  │
//! │        selected; it simply contributes 0 until fixed.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::import::{into_line_items, ParsedBill};
use crate::types::{BillState, Consumption, ItemId, LineItem, Participant, ParticipantId, SplitMode};
use crate::validation::{
    validate_adjustment, validate_item_name, validate_participant_count,
    validate_participant_name, validate_price, validate_quantity,
};
use crate::MAX_PARTICIPANTS;

/// Partial update of an item's descriptive fields.
///
/// `None` leaves the field as it is. Consumption is edited separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemDetails {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub price: Option<f64>,
    #[ts(optional)]
    pub quantity: Option<u32>,
}

impl BillState {
    // =========================================================================
    // Participants
    // =========================================================================

    /// Adds a participant and returns the new bill with their id.
    ///
    /// The new participant is ticked on every EQUAL item, so a shared dish
    /// keeps being shared by the whole table. UNIT items are left alone:
    /// nobody can have eaten a counted item before joining.
    ///
    /// ## Errors
    /// - `Validation` if the name is empty or too long
    /// - `TooManyParticipants` at [`MAX_PARTICIPANTS`]
    ///
    /// Two participants may share a name; they keep distinct ids.
    pub fn with_participant(&self, name: &str) -> CoreResult<(BillState, ParticipantId)> {
        validate_participant_name(name)?;
        validate_participant_count(self.participant_count())
            .map_err(|_| CoreError::TooManyParticipants {
                max: MAX_PARTICIPANTS,
            })?;

        let name = name.trim();
        let participant = Participant::new(name);
        let id = participant.id.clone();

        let mut next = self.clone();
        next.participants.push(participant);
        for item in &mut next.items {
            if let Consumption::Equal(selected) = &mut item.consumption {
                selected.insert(id.clone());
            }
        }

        debug!(participant_id = %id, name = %name, "Participant added");
        Ok((next, id))
    }

    /// Removes a participant and every consumption entry that names them.
    pub fn without_participant(&self, id: &ParticipantId) -> CoreResult<BillState> {
        self.require_participant(id)?;

        let mut next = self.clone();
        next.participants.retain(|p| &p.id != id);
        for item in &mut next.items {
            item.consumption.remove(id);
        }

        debug!(participant_id = %id, "Participant removed");
        Ok(next)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Appends a blank EQUAL row shared by everyone currently on the bill.
    pub fn with_new_item(&self) -> (BillState, ItemId) {
        let item = LineItem::new("", 0.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(self.participants.iter().map(|p| p.id.clone())));
        let id = item.id.clone();

        let mut next = self.clone();
        next.items.push(item);
        (next, id)
    }

    /// Appends a fully formed item.
    ///
    /// ## Errors
    /// - `Validation` for a bad name, price or quantity
    /// - `ParticipantNotFound` if the consumption names someone not on the bill
    pub fn with_item(&self, item: LineItem) -> CoreResult<BillState> {
        validate_item_name(&item.name)?;
        validate_price(item.price)?;
        validate_quantity(item.quantity)?;
        for id in item.consumption.participant_ids() {
            self.require_participant(id)?;
        }

        let mut next = self.clone();
        next.items.push(item);
        Ok(next)
    }

    /// Updates name, price and/or quantity of an item.
    pub fn with_item_details(&self, id: &ItemId, details: ItemDetails) -> CoreResult<BillState> {
        if let Some(name) = &details.name {
            validate_item_name(name)?;
        }
        if let Some(price) = details.price {
            validate_price(price)?;
        }
        if let Some(quantity) = details.quantity {
            validate_quantity(quantity)?;
        }

        let mut next = self.clone();
        let item = next.item_mut(id)?;
        if let Some(name) = details.name {
            item.name = name;
        }
        if let Some(price) = details.price {
            item.price = price;
        }
        if let Some(quantity) = details.quantity {
            item.quantity = quantity;
        }
        Ok(next)
    }

    /// Changes an item's split mode.
    ///
    /// Consumption is reset to the empty record of the new mode. Setting
    /// the mode the item already has changes nothing.
    pub fn with_split_mode(&self, id: &ItemId, mode: SplitMode) -> CoreResult<BillState> {
        let mut next = self.clone();
        if next.item_mut(id)?.switch_mode(mode) {
            debug!(item_id = %id, mode = %mode, "Split mode changed, consumption reset");
        }
        Ok(next)
    }

    /// Ticks or unticks a participant on an EQUAL item.
    pub fn with_selection(
        &self,
        item_id: &ItemId,
        participant_id: &ParticipantId,
        selected: bool,
    ) -> CoreResult<BillState> {
        self.require_participant(participant_id)?;

        let mut next = self.clone();
        let item = next.item_mut(item_id)?;
        if item.split_mode() != SplitMode::Equal {
            return Err(mode_mismatch(item, SplitMode::Equal));
        }
        if let Consumption::Equal(set) = &mut item.consumption {
            if selected {
                set.insert(participant_id.clone());
            } else {
                set.remove(participant_id);
            }
        }
        Ok(next)
    }

    /// Replaces the whole selection of an EQUAL item.
    pub fn with_selected_participants(
        &self,
        item_id: &ItemId,
        participants: BTreeSet<ParticipantId>,
    ) -> CoreResult<BillState> {
        for id in &participants {
            self.require_participant(id)?;
        }

        let mut next = self.clone();
        let item = next.item_mut(item_id)?;
        if item.split_mode() != SplitMode::Equal {
            return Err(mode_mismatch(item, SplitMode::Equal));
        }
        item.consumption = Consumption::Equal(participants);
        Ok(next)
    }

    /// Sets how many units of a UNIT item a participant had.
    ///
    /// Zero is stored as an explicit entry and contributes nothing.
    pub fn with_units(
        &self,
        item_id: &ItemId,
        participant_id: &ParticipantId,
        units: u32,
    ) -> CoreResult<BillState> {
        self.require_participant(participant_id)?;

        let mut next = self.clone();
        let item = next.item_mut(item_id)?;
        if item.split_mode() != SplitMode::Unit {
            return Err(mode_mismatch(item, SplitMode::Unit));
        }
        if let Consumption::Unit(map) = &mut item.consumption {
            map.insert(participant_id.clone(), units);
        }
        Ok(next)
    }

    /// Removes an item.
    pub fn without_item(&self, id: &ItemId) -> CoreResult<BillState> {
        let mut next = self.clone();
        let before = next.items.len();
        next.items.retain(|i| &i.id != id);

        if next.items.len() == before {
            return Err(CoreError::ItemNotFound(id.to_string()));
        }
        Ok(next)
    }

    // =========================================================================
    // Bill-wide fields
    // =========================================================================

    /// Sets the flat discount (entered as a positive amount).
    pub fn with_discount(&self, amount: f64) -> CoreResult<BillState> {
        validate_adjustment("discount", amount)?;
        Ok(BillState {
            discount: amount,
            ..self.clone()
        })
    }

    /// Sets the flat tax / service charge.
    pub fn with_tax(&self, amount: f64) -> CoreResult<BillState> {
        validate_adjustment("tax", amount)?;
        Ok(BillState {
            tax: amount,
            ..self.clone()
        })
    }

    /// Sets or clears the bill's display name. Blank names clear it.
    pub fn with_bill_name(&self, name: Option<String>) -> BillState {
        let bill_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        BillState {
            bill_name,
            ..self.clone()
        }
    }

    /// Appends the items of an import, adopting its tax, discount and name
    /// when present.
    ///
    /// Imported EQUAL items start shared by everyone on the bill.
    pub fn with_imported_items(&self, parsed: ParsedBill) -> CoreResult<BillState> {
        if let Some(tax) = parsed.tax {
            validate_adjustment("tax", tax)?;
        }
        if let Some(discount) = parsed.discount {
            validate_adjustment("discount", discount)?;
        }

        let mut next = self.clone();
        let added = parsed.items.len();
        next.items
            .extend(into_line_items(parsed.items, &self.participants));

        if let Some(tax) = parsed.tax {
            next.tax = tax;
        }
        if let Some(discount) = parsed.discount {
            next.discount = discount;
        }
        if parsed.bill_name.is_some() {
            next = next.with_bill_name(parsed.bill_name);
        }

        debug!(items = added, "Imported items appended");
        Ok(next)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_participant(&self, id: &ParticipantId) -> CoreResult<()> {
        if self.has_participant(id) {
            Ok(())
        } else {
            Err(CoreError::ParticipantNotFound(id.to_string()))
        }
    }

    fn item_mut(&mut self, id: &ItemId) -> CoreResult<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }
}

fn mode_mismatch(item: &LineItem, expected: SplitMode) -> CoreError {
    CoreError::SplitModeMismatch {
        item_id: item.id.to_string(),
        expected,
        actual: item.split_mode(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
