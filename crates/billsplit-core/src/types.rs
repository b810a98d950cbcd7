//! # Domain Types
//!
//! Core domain types used throughout Billsplit.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌───────────────┐   │
//! │  │   BillState     │   │      LineItem        │   │  Participant  │   │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ───────────  │   │
//! │  │  participants ──┼──►│  id (ItemId)         │   │  id           │   │
//! │  │  items ─────────┼──►│  name, price         │   │  name         │   │
//! │  │  discount       │   │  quantity            │   └───────────────┘   │
//! │  │  tax            │   │  consumption ──┐     │                       │
//! │  │  bill_name      │   └────────────────┼─────┘                       │
//! │  └─────────────────┘                    ▼                              │
//! │                     ┌──────────────────────────────────────┐           │
//! │                     │  Consumption (tagged by split mode)  │           │
//! │                     │  Equal { selected: {ids} }           │           │
//! │                     │  Unit  { units: {id → u32} }         │           │
//! │                     └──────────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Line items travel as `{ splitMode, consumption: { id: bool | number } }`.
//! Decoding goes through [`LineItemRecord`], which rejects values of the
//! wrong type for the mode, negative counts and fractional counts. Once
//! decoded, an item can no longer hold such values.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::DEFAULT_ITEM_QUANTITY;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a participant, stable for the session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wraps an existing id (from storage, an import, or a test).
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    /// Generates a process-unique id.
    pub fn generate() -> Self {
        ParticipantId(format!("p-{}", Uuid::new_v4()))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId::new(id)
    }
}

/// Identifier of a line item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    /// Generates a process-unique id.
    pub fn generate() -> Self {
        ItemId(format!("i-{}", Uuid::new_v4()))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::new(id)
    }
}

// =============================================================================
// Participant
// =============================================================================

/// Someone sharing the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    /// Creates a participant with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Participant {
            id: ParticipantId::generate(),
            name: name.into(),
        }
    }

    /// Creates a participant with a known id.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Participant {
            id: ParticipantId::new(id),
            name: name.into(),
        }
    }
}

// =============================================================================
// Split Mode
// =============================================================================

/// How a line item's price is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum SplitMode {
    /// Price divided evenly among the selected participants.
    Equal,
    /// Price divided in proportion to the units each participant had.
    Unit,
}

impl SplitMode {
    /// Wire name of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SplitMode::Equal => "EQUAL",
            SplitMode::Unit => "UNIT",
        }
    }
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Equal
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Consumption
// =============================================================================

/// Who consumed a line item, in the representation its split mode needs.
///
/// The split mode of an item is the variant of its consumption record, so an
/// EQUAL item cannot hold unit counts and a UNIT item cannot hold flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumption {
    /// Participants sharing the item evenly.
    Equal(BTreeSet<ParticipantId>),
    /// Units consumed per participant. Zero entries are allowed.
    Unit(BTreeMap<ParticipantId, u32>),
}

impl Consumption {
    /// Empty record for the given mode.
    pub fn empty(mode: SplitMode) -> Self {
        match mode {
            SplitMode::Equal => Consumption::Equal(BTreeSet::new()),
            SplitMode::Unit => Consumption::Unit(BTreeMap::new()),
        }
    }

    /// EQUAL record selecting the given participants.
    pub fn equal<I, P>(selected: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Consumption::Equal(selected.into_iter().map(Into::into).collect())
    }

    /// UNIT record from `(participant, units)` pairs.
    pub fn units<I, P>(units: I) -> Self
    where
        I: IntoIterator<Item = (P, u32)>,
        P: Into<ParticipantId>,
    {
        Consumption::Unit(units.into_iter().map(|(id, n)| (id.into(), n)).collect())
    }

    /// The split mode this record belongs to.
    pub fn mode(&self) -> SplitMode {
        match self {
            Consumption::Equal(_) => SplitMode::Equal,
            Consumption::Unit(_) => SplitMode::Unit,
        }
    }

    /// True when no participant has an entry.
    pub fn is_empty(&self) -> bool {
        match self {
            Consumption::Equal(selected) => selected.is_empty(),
            Consumption::Unit(units) => units.is_empty(),
        }
    }

    /// True when the participant has an entry (selected, or any unit count).
    pub fn contains(&self, id: &ParticipantId) -> bool {
        match self {
            Consumption::Equal(selected) => selected.contains(id),
            Consumption::Unit(units) => units.contains_key(id),
        }
    }

    /// Removes every entry for the participant. Returns true if one existed.
    pub fn remove(&mut self, id: &ParticipantId) -> bool {
        match self {
            Consumption::Equal(selected) => selected.remove(id),
            Consumption::Unit(units) => units.remove(id).is_some(),
        }
    }

    /// Participant ids referenced by this record.
    pub fn participant_ids(&self) -> Vec<&ParticipantId> {
        match self {
            Consumption::Equal(selected) => selected.iter().collect(),
            Consumption::Unit(units) => units.keys().collect(),
        }
    }
}

impl Default for Consumption {
    fn default() -> Self {
        Consumption::empty(SplitMode::default())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LineItemRecord", into = "LineItemRecord")]
pub struct LineItem {
    pub id: ItemId,
    pub name: String,
    /// Total cost of the line. Negative for correction entries.
    pub price: f64,
    /// Units on the receipt. Only bounds UNIT allocation.
    pub quantity: u32,
    pub consumption: Consumption,
}

impl LineItem {
    /// Creates an item with a generated id, quantity 1 and no consumption.
    pub fn new(name: impl Into<String>, price: f64, mode: SplitMode) -> Self {
        LineItem {
            id: ItemId::generate(),
            name: name.into(),
            price,
            quantity: DEFAULT_ITEM_QUANTITY,
            consumption: Consumption::empty(mode),
        }
    }

    /// Replaces the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = ItemId::new(id);
        self
    }

    /// Sets the receipt quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the consumption record (and with it the split mode).
    pub fn with_consumption(mut self, consumption: Consumption) -> Self {
        self.consumption = consumption;
        self
    }

    /// The item's split mode.
    #[inline]
    pub fn split_mode(&self) -> SplitMode {
        self.consumption.mode()
    }

    /// Number of units available to UNIT allocation.
    ///
    /// An unset (zero) quantity counts as a single unit.
    #[inline]
    pub fn capacity(&self) -> u32 {
        if self.quantity == 0 {
            DEFAULT_ITEM_QUANTITY
        } else {
            self.quantity
        }
    }

    /// Switches the split mode, clearing consumption when the mode changes.
    ///
    /// Returns true if the mode changed.
    pub fn switch_mode(&mut self, mode: SplitMode) -> bool {
        if self.split_mode() == mode {
            return false;
        }
        self.consumption = Consumption::empty(mode);
        true
    }
}

// =============================================================================
// Line Item Wire Record
// =============================================================================

/// A single consumption value as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ConsumptionValue {
    /// EQUAL participation flag.
    Flag(bool),
    /// UNIT count. Must be a non-negative integer to be accepted.
    Units(f64),
}

/// Serialized form of a [`LineItem`].
///
/// `consumption` maps participant ids to a flag (EQUAL) or a unit count
/// (UNIT).
///
/// A value the mode cannot hold (a count on an EQUAL item, a flag, a
/// negative or a fractional count on a UNIT item) fails the decode of the
/// whole enclosing [`BillState`], naming the offending participant. Such
/// data only comes from hand edits or foreign writers; the engine itself
/// cannot produce it. Items that decode but are incomplete (no name, no
/// one assigned, over-assigned units) stay in the bill and are flagged by
/// [`crate::validation::item_issue`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemRecord {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub split_mode: SplitMode,
    #[serde(default)]
    pub consumption: BTreeMap<ParticipantId, ConsumptionValue>,
}

fn default_quantity() -> u32 {
    DEFAULT_ITEM_QUANTITY
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = ValidationError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        if !record.price.is_finite() {
            return Err(ValidationError::MustBeFinite {
                field: "price".to_string(),
            });
        }

        let consumption = match record.split_mode {
            SplitMode::Equal => {
                let mut selected = BTreeSet::new();
                for (id, value) in record.consumption {
                    match value {
                        ConsumptionValue::Flag(true) => {
                            selected.insert(id);
                        }
                        ConsumptionValue::Flag(false) => {}
                        ConsumptionValue::Units(_) => {
                            return Err(ValidationError::InvalidFormat {
                                field: format!("consumption[{}]", id),
                                reason: "EQUAL items take true/false, not unit counts"
                                    .to_string(),
                            });
                        }
                    }
                }
                Consumption::Equal(selected)
            }
            SplitMode::Unit => {
                let mut units = BTreeMap::new();
                for (id, value) in record.consumption {
                    let count = match value {
                        ConsumptionValue::Units(count) => count,
                        ConsumptionValue::Flag(_) => {
                            return Err(ValidationError::InvalidFormat {
                                field: format!("consumption[{}]", id),
                                reason: "UNIT items take unit counts, not true/false"
                                    .to_string(),
                            });
                        }
                    };
                    units.insert(id.clone(), unit_count(&id, count)?);
                }
                Consumption::Unit(units)
            }
        };

        Ok(LineItem {
            id: record.id,
            name: record.name,
            price: record.price,
            quantity: record.quantity,
            consumption,
        })
    }
}

/// Checks that a wire unit count is a non-negative integer.
fn unit_count(id: &ParticipantId, count: f64) -> Result<u32, ValidationError> {
    let field = format!("consumption[{}]", id);
    if !count.is_finite() || count.fract() != 0.0 {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "unit counts must be whole numbers".to_string(),
        });
    }
    if count < 0.0 {
        return Err(ValidationError::MustNotBeNegative { field });
    }
    if count > u32::MAX as f64 {
        return Err(ValidationError::OutOfRange {
            field,
            min: 0,
            max: u32::MAX as i64,
        });
    }
    Ok(count as u32)
}

impl From<LineItem> for LineItemRecord {
    fn from(item: LineItem) -> Self {
        let split_mode = item.split_mode();
        let consumption = match item.consumption {
            Consumption::Equal(selected) => selected
                .into_iter()
                .map(|id| (id, ConsumptionValue::Flag(true)))
                .collect(),
            Consumption::Unit(units) => units
                .into_iter()
                .map(|(id, n)| (id, ConsumptionValue::Units(n as f64)))
                .collect(),
        };

        LineItemRecord {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            split_mode,
            consumption,
        }
    }
}

// =============================================================================
// Bill State
// =============================================================================

/// Everything the engine needs to split a bill.
///
/// ## Invariants
/// - Participant and item ids are unique
/// - No item references a participant that is not in `participants`
/// - `discount` and `tax` are `>= 0` and spread over ALL participants
///
/// Values are treated as immutable: the mutation methods in
/// [`crate::bill`] return a new `BillState`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct BillState {
    pub participants: Vec<Participant>,
    #[ts(as = "Vec<LineItemRecord>")]
    pub items: Vec<LineItem>,
    /// Flat amount taken off the bill.
    pub discount: f64,
    /// Flat amount added to the bill (tax, service charge).
    pub tax: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub bill_name: Option<String>,
}

impl BillState {
    /// Creates an empty bill.
    pub fn new() -> Self {
        BillState::default()
    }

    /// Number of participants.
    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// True if the participant id is part of this bill.
    pub fn has_participant(&self, id: &ParticipantId) -> bool {
        self.participants.iter().any(|p| &p.id == id)
    }

    /// Sum of all line prices.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|i| i.price).sum()
    }

    /// Amount the whole table pays: subtotal + tax - discount.
    pub fn grand_total(&self) -> f64 {
        self.subtotal() + self.tax - self.discount
    }
}

// =============================================================================
// Saved Bill
// =============================================================================

/// A bill kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SavedBill {
    pub id: String,
    pub bill: BillState,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ParticipantId::generate();
        let b = ParticipantId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("p-"));
        assert!(ItemId::generate().as_str().starts_with("i-"));
    }

    #[test]
    fn test_split_mode_wire_names() {
        assert_eq!(serde_json::to_value(SplitMode::Equal).unwrap(), json!("EQUAL"));
        assert_eq!(serde_json::to_value(SplitMode::Unit).unwrap(), json!("UNIT"));
        assert!(serde_json::from_value::<SplitMode>(json!("PERCENT")).is_err());
    }

    #[test]
    fn test_capacity_defaults_to_one() {
        let item = LineItem::new("Roti", 60.0, SplitMode::Unit).with_quantity(0);
        assert_eq!(item.capacity(), 1);
        assert_eq!(item.with_quantity(3).capacity(), 3);
    }

    #[test]
    fn test_switch_mode_resets_consumption() {
        let mut item = LineItem::new("Naan", 90.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1", "p2"]));

        assert!(item.switch_mode(SplitMode::Unit));
        assert_eq!(item.consumption, Consumption::Unit(BTreeMap::new()));

        item.consumption = Consumption::units([("p1", 2)]);
        assert!(item.switch_mode(SplitMode::Equal));
        assert_eq!(item.consumption, Consumption::Equal(BTreeSet::new()));
    }

    #[test]
    fn test_switch_to_same_mode_keeps_consumption() {
        let mut item = LineItem::new("Naan", 90.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1"]));
        assert!(!item.switch_mode(SplitMode::Equal));
        assert!(item.consumption.contains(&"p1".into()));
    }

    #[test]
    fn test_decode_equal_item_drops_false_flags() {
        let item: LineItem = serde_json::from_value(json!({
            "id": "i1",
            "name": "Paneer",
            "price": 320,
            "splitMode": "EQUAL",
            "consumption": { "p1": true, "p2": false }
        }))
        .unwrap();

        assert_eq!(item.quantity, 1);
        assert_eq!(item.consumption, Consumption::equal(["p1"]));
    }

    #[test]
    fn test_decode_rejects_wrong_value_type() {
        let unit_with_flag = json!({
            "id": "i1", "price": 100, "splitMode": "UNIT",
            "consumption": { "p1": true }
        });
        assert!(serde_json::from_value::<LineItem>(unit_with_flag).is_err());

        let equal_with_count = json!({
            "id": "i1", "price": 100, "splitMode": "EQUAL",
            "consumption": { "p1": 2 }
        });
        assert!(serde_json::from_value::<LineItem>(equal_with_count).is_err());
    }

    #[test]
    fn test_decode_rejects_negative_and_fractional_units() {
        let negative = json!({
            "id": "i1", "price": 100, "splitMode": "UNIT",
            "consumption": { "p1": -1 }
        });
        let err = serde_json::from_value::<LineItem>(negative).unwrap_err();
        assert!(err.to_string().contains("must not be negative"));

        let fractional = json!({
            "id": "i1", "price": 100, "splitMode": "UNIT",
            "consumption": { "p1": 1.5 }
        });
        let err = serde_json::from_value::<LineItem>(fractional).unwrap_err();
        assert!(err.to_string().contains("whole numbers"));
    }

    #[test]
    fn test_bad_consumption_fails_whole_bill() {
        let bill = json!({
            "participants": [{ "id": "p1", "name": "Asha" }],
            "items": [
                {
                    "id": "i1", "name": "Naan", "price": 40,
                    "splitMode": "EQUAL", "consumption": { "p1": true }
                },
                {
                    "id": "i2", "name": "Lassi", "price": 90, "quantity": 2,
                    "splitMode": "UNIT", "consumption": { "p1": 1.5 }
                }
            ]
        });

        let err = serde_json::from_value::<BillState>(bill).unwrap_err();
        assert!(err.to_string().contains("consumption[p1]"));
    }

    #[test]
    fn test_ids_are_plain_strings_in_bindings() {
        assert_eq!(ParticipantId::inline(), "string");
        assert_eq!(ItemId::inline(), "string");
        assert_eq!(serde_json::to_value(ParticipantId::new("p1")).unwrap(), json!("p1"));
    }

    #[test]
    fn test_encode_uses_wire_shape() {
        let item = LineItem::new("Roti", 60.0, SplitMode::Unit)
            .with_id("i2")
            .with_quantity(3)
            .with_consumption(Consumption::units([("p1", 2), ("p2", 1)]));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["splitMode"], json!("UNIT"));
        assert_eq!(value["consumption"]["p1"], json!(2.0));

        let back: LineItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_bill_state_defaults_missing_fields() {
        let bill: BillState = serde_json::from_value(json!({
            "participants": [{ "id": "p1", "name": "Alice" }],
            "items": []
        }))
        .unwrap();

        assert_eq!(bill.discount, 0.0);
        assert_eq!(bill.tax, 0.0);
        assert!(bill.bill_name.is_none());
    }

    #[test]
    fn test_grand_total() {
        let bill = BillState {
            items: vec![
                LineItem::new("A", 100.0, SplitMode::Equal),
                LineItem::new("Refund", -20.0, SplitMode::Equal),
            ],
            discount: 10.0,
            tax: 5.0,
            ..BillState::default()
        };
        assert_eq!(bill.subtotal(), 80.0);
        assert_eq!(bill.grand_total(), 75.0);
    }
}
