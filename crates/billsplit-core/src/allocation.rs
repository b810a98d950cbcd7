//! # Allocation Module
//!
//! Turns line items into per-participant amounts.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       bill_totals(bill)                                 │
//! │                                                                         │
//! │  1. every participant starts at 0                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. for each item: item_shares(item) ──► add into running totals        │
//! │       │            (invalid item → no shares)                           │
//! │       ▼                                                                 │
//! │  3. - discount / participant count   (everyone)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. + tax / participant count        (everyone)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. round each total to cents, ONCE                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its input. Calling
//! [`bill_totals`] twice on the same bill gives the same result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::money::{is_significant, per_head, round_to_cents};
use crate::types::{BillState, Consumption, ItemId, LineItem, ParticipantId};
use crate::validation::{invalid_items, is_item_valid, total_units, ItemIssue};

/// Unrounded amounts owed for a single item, by participant.
///
/// Participants who owe nothing for the item have no entry.
pub type Shares = BTreeMap<ParticipantId, f64>;

/// Label of the synthetic breakdown line for the per-person tax.
pub const TAX_LINE_LABEL: &str = "Tax / Charges";

/// Label of the synthetic breakdown line for the per-person discount.
pub const DISCOUNT_LINE_LABEL: &str = "Discount";

// =============================================================================
// Item Level
// =============================================================================

/// Computes what each participant owes for one item.
///
/// Returns an empty map for an invalid item, so callers never need to check
/// validity first.
///
/// ## Example
/// ```rust
/// use billsplit_core::{Consumption, LineItem, ParticipantId, SplitMode};
/// use billsplit_core::allocation::item_shares;
///
/// let roti = LineItem::new("Roti", 60.0, SplitMode::Unit)
///     .with_quantity(3)
///     .with_consumption(Consumption::units([("p1", 1), ("p2", 2)]));
///
/// let shares = item_shares(&roti);
/// assert_eq!(shares[&ParticipantId::new("p1")], 20.0);
/// assert_eq!(shares[&ParticipantId::new("p2")], 40.0);
/// ```
pub fn item_shares(item: &LineItem) -> Shares {
    if !is_item_valid(item) {
        return Shares::new();
    }

    match &item.consumption {
        Consumption::Equal(_) => equal_shares(item),
        Consumption::Unit(_) => unit_shares(item),
    }
}

/// EQUAL split: `price / |selected|` for each selected participant.
///
/// Safe to call on any item. Returns an empty map when nobody is selected.
pub fn equal_shares(item: &LineItem) -> Shares {
    let Consumption::Equal(selected) = &item.consumption else {
        return Shares::new();
    };

    let Some(share) = per_head(item.price, selected.len()) else {
        return Shares::new();
    };

    selected.iter().map(|id| (id.clone(), share)).collect()
}

/// UNIT split: `units * (price / total units)` for each participant with
/// at least one unit.
///
/// The cost of one unit is computed once, so the result does not depend on
/// the order participants are visited in. Safe to call on any item: zero
/// total units returns an empty map.
pub fn unit_shares(item: &LineItem) -> Shares {
    let Consumption::Unit(units) = &item.consumption else {
        return Shares::new();
    };

    let total = total_units(&item.consumption);
    if total == 0 {
        return Shares::new();
    }

    let cost_per_unit = item.price / total as f64;

    units
        .iter()
        .filter(|(_, &n)| n > 0)
        .map(|(id, &n)| (id.clone(), f64::from(n) * cost_per_unit))
        .collect()
}

// =============================================================================
// Bill Level
// =============================================================================

/// Final amount owed by each participant, rounded to cents.
///
/// Every current participant has an entry, even when they owe nothing.
/// Totals may be negative when the discount exceeds what someone consumed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct SplitResult(BTreeMap<ParticipantId, f64>);

impl SplitResult {
    /// Amount owed by a participant, if they are part of the result.
    pub fn get(&self, id: &ParticipantId) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// Number of participants in the result.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the bill had no participants.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(participant, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, f64)> {
        self.0.iter().map(|(id, amount)| (id, *amount))
    }

    /// Sum of all rounded totals.
    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Splits the whole bill.
///
/// ## Steps
/// 1. Seed every participant with 0
/// 2. Add each item's shares (unknown participant ids are skipped)
/// 3. Spread the discount over all participants
/// 4. Spread the tax over all participants
/// 5. Round once
///
/// ## Example
/// ```rust
/// use billsplit_core::{BillState, Consumption, LineItem, Participant, ParticipantId, SplitMode};
/// use billsplit_core::allocation::bill_totals;
///
/// let bill = BillState {
///     participants: vec![Participant::with_id("p1", "Alice"), Participant::with_id("p2", "Bob")],
///     items: vec![LineItem::new("Item", 100.0, SplitMode::Equal)
///         .with_consumption(Consumption::equal(["p1", "p2"]))],
///     discount: 10.0,
///     ..BillState::default()
/// };
///
/// let totals = bill_totals(&bill);
/// assert_eq!(totals.get(&ParticipantId::new("p1")), Some(45.0));
/// ```
pub fn bill_totals(bill: &BillState) -> SplitResult {
    let mut totals: BTreeMap<ParticipantId, f64> = bill
        .participants
        .iter()
        .map(|p| (p.id.clone(), 0.0))
        .collect();

    for item in &bill.items {
        for (participant_id, amount) in item_shares(item) {
            match totals.get_mut(&participant_id) {
                Some(total) => *total += amount,
                None => warn!(
                    item_id = %item.id,
                    participant_id = %participant_id,
                    "Share for unknown participant skipped"
                ),
            }
        }
    }

    let count = bill.participant_count();

    if bill.discount > 0.0 {
        if let Some(discount_per_person) = per_head(bill.discount, count) {
            totals.values_mut().for_each(|t| *t -= discount_per_person);
        }
    }

    if bill.tax > 0.0 {
        if let Some(tax_per_person) = per_head(bill.tax, count) {
            totals.values_mut().for_each(|t| *t += tax_per_person);
        }
    }

    SplitResult(
        totals
            .into_iter()
            .map(|(id, amount)| (id, round_to_cents(amount)))
            .collect(),
    )
}

// =============================================================================
// Participant Breakdown
// =============================================================================

/// One line of a participant's itemized view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BreakdownLine {
    pub label: String,
    /// Unrounded amount. Negative for credits.
    pub amount: f64,
}

/// Itemizes what one participant owes.
///
/// Uses [`item_shares`], the same path as [`bill_totals`], so the lines
/// always add up to the participant's total before rounding. Shares within
/// [`crate::money::SHARE_NOISE_THRESHOLD`] of zero are left out; negative
/// shares from correction lines are kept.
///
/// An id that is not part of the bill gets an empty breakdown.
pub fn participant_breakdown(bill: &BillState, participant_id: &ParticipantId) -> Vec<BreakdownLine> {
    if !bill.has_participant(participant_id) {
        return Vec::new();
    }

    let mut lines: Vec<BreakdownLine> = bill
        .items
        .iter()
        .filter_map(|item| {
            let share = item_shares(item).get(participant_id).copied()?;
            is_significant(share).then(|| BreakdownLine {
                label: item.name.clone(),
                amount: share,
            })
        })
        .collect();

    let count = bill.participant_count();

    if bill.tax > 0.0 {
        if let Some(tax_per_person) = per_head(bill.tax, count) {
            lines.push(BreakdownLine {
                label: TAX_LINE_LABEL.to_string(),
                amount: tax_per_person,
            });
        }
    }

    if bill.discount > 0.0 {
        if let Some(discount_per_person) = per_head(bill.discount, count) {
            lines.push(BreakdownLine {
                label: DISCOUNT_LINE_LABEL.to_string(),
                amount: -discount_per_person,
            });
        }
    }

    lines
}

// =============================================================================
// Summary
// =============================================================================

/// Everything the presentation layer needs after a change to the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillSummary {
    pub totals: SplitResult,
    /// False when at least one item is excluded from the totals.
    pub is_valid: bool,
    pub invalid_items: Vec<(ItemId, ItemIssue)>,
    /// What the whole table pays: sum of prices + tax - discount.
    pub grand_total: f64,
}

/// Recomputes totals and validity for a bill.
pub fn summarize(bill: &BillState) -> BillSummary {
    let invalid_items = invalid_items(bill);

    BillSummary {
        totals: bill_totals(bill),
        is_valid: invalid_items.is_empty(),
        invalid_items,
        grand_total: round_to_cents(bill.grand_total()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Participant, SplitMode};

    const EPSILON: f64 = 1e-9;

    fn pid(id: &str) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn alice_and_bob() -> Vec<Participant> {
        vec![
            Participant::with_id("p1", "Alice"),
            Participant::with_id("p2", "Bob"),
        ]
    }

    fn shared_item(price: f64) -> LineItem {
        LineItem::new("Item", price, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1", "p2"]))
    }

    fn two_person_bill(discount: f64, tax: f64) -> BillState {
        BillState {
            participants: alice_and_bob(),
            items: vec![shared_item(100.0)],
            discount,
            tax,
            bill_name: None,
        }
    }

    #[test]
    fn test_equal_split_two_people() {
        let item = LineItem::new("Paneer", 320.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1", "p2"]));

        let shares = item_shares(&item);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[&pid("p1")], 160.0);
        assert_eq!(shares[&pid("p2")], 160.0);
    }

    #[test]
    fn test_equal_split_sums_to_price() {
        let item = LineItem::new("Thali", 100.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1", "p2", "p3"]));

        let shares = item_shares(&item);
        for share in shares.values() {
            assert!((share - 100.0 / 3.0).abs() < EPSILON);
        }
        assert!((shares.values().sum::<f64>() - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_unit_split_proportional() {
        let item = LineItem::new("Roti", 60.0, SplitMode::Unit)
            .with_quantity(3)
            .with_consumption(Consumption::units([("p1", 1), ("p2", 2)]));

        let shares = item_shares(&item);
        assert_eq!(shares[&pid("p1")], 20.0);
        assert_eq!(shares[&pid("p2")], 40.0);
    }

    #[test]
    fn test_unit_split_omits_zero_units() {
        let item = LineItem::new("Roti", 60.0, SplitMode::Unit)
            .with_quantity(3)
            .with_consumption(Consumption::units([("p1", 3), ("p2", 0)]));

        let shares = item_shares(&item);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[&pid("p1")], 60.0);
        assert!(!shares.contains_key(&pid("p2")));
    }

    #[test]
    fn test_invalid_item_has_no_shares() {
        let empty = LineItem::new("Nobody", 500.0, SplitMode::Equal);
        assert!(item_shares(&empty).is_empty());

        let over = LineItem::new("Too many", 60.0, SplitMode::Unit)
            .with_quantity(1)
            .with_consumption(Consumption::units([("p1", 2)]));
        assert!(item_shares(&over).is_empty());
    }

    #[test]
    fn test_direct_helpers_are_safe_standalone() {
        let zero_units = LineItem::new("Roti", 60.0, SplitMode::Unit)
            .with_consumption(Consumption::units([("p1", 0)]));
        assert!(unit_shares(&zero_units).is_empty());

        let nobody = LineItem::new("Paneer", 60.0, SplitMode::Equal);
        assert!(equal_shares(&nobody).is_empty());

        // Wrong helper for the mode
        assert!(unit_shares(&shared_item(10.0)).is_empty());
        assert!(equal_shares(&zero_units).is_empty());
    }

    #[test]
    fn test_negative_price_gives_credit() {
        let correction = LineItem::new("Overcharge", -30.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1", "p2"]));

        let shares = item_shares(&correction);
        assert_eq!(shares[&pid("p1")], -15.0);
    }

    #[test]
    fn test_discount_spread_evenly() {
        let totals = bill_totals(&two_person_bill(10.0, 0.0));
        assert_eq!(totals.get(&pid("p1")), Some(45.0));
        assert_eq!(totals.get(&pid("p2")), Some(45.0));
    }

    #[test]
    fn test_large_discount_goes_negative() {
        let totals = bill_totals(&two_person_bill(120.0, 0.0));
        assert_eq!(totals.get(&pid("p1")), Some(-10.0));
        assert_eq!(totals.get(&pid("p2")), Some(-10.0));
    }

    #[test]
    fn test_tax_spread_evenly() {
        let totals = bill_totals(&two_person_bill(0.0, 10.0));
        assert_eq!(totals.get(&pid("p1")), Some(55.0));
        assert_eq!(totals.get(&pid("p2")), Some(55.0));
    }

    #[test]
    fn test_tax_and_discount_combined() {
        let totals = bill_totals(&two_person_bill(20.0, 10.0));
        assert_eq!(totals.get(&pid("p1")), Some(45.0));
        assert_eq!(totals.get(&pid("p2")), Some(45.0));
    }

    #[test]
    fn test_adjustments_reach_participants_without_items() {
        let mut bill = two_person_bill(0.0, 30.0);
        bill.participants.push(Participant::with_id("p3", "Charlie"));

        let totals = bill_totals(&bill);
        assert_eq!(totals.get(&pid("p1")), Some(60.0));
        assert_eq!(totals.get(&pid("p3")), Some(10.0));
    }

    #[test]
    fn test_participant_without_items_appears_with_zero() {
        let mut bill = two_person_bill(0.0, 0.0);
        bill.participants.push(Participant::with_id("p3", "Charlie"));

        let totals = bill_totals(&bill);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals.get(&pid("p3")), Some(0.0));
    }

    #[test]
    fn test_unknown_participant_share_skipped() {
        let mut bill = two_person_bill(0.0, 0.0);
        bill.items.push(
            LineItem::new("Ghost", 40.0, SplitMode::Equal)
                .with_consumption(Consumption::equal(["p1", "ghost"])),
        );

        let totals = bill_totals(&bill);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get(&pid("p1")), Some(70.0));
        assert_eq!(totals.get(&pid("ghost")), None);
    }

    #[test]
    fn test_empty_bill() {
        let bill = BillState {
            discount: 10.0,
            tax: 5.0,
            ..BillState::default()
        };
        assert!(bill_totals(&bill).is_empty());
    }

    #[test]
    fn test_rounding_happens_once() {
        let bill = BillState {
            participants: vec![
                Participant::with_id("p1", "A"),
                Participant::with_id("p2", "B"),
                Participant::with_id("p3", "C"),
            ],
            items: (0..3)
                .map(|_| {
                    LineItem::new("Third", 100.0, SplitMode::Equal)
                        .with_consumption(Consumption::equal(["p1", "p2", "p3"]))
                })
                .collect(),
            ..BillState::default()
        };

        let totals = bill_totals(&bill);
        assert_eq!(totals.get(&pid("p1")), Some(100.0));
        assert_eq!(totals.sum(), 300.0);
    }

    #[test]
    fn test_bill_totals_idempotent() {
        let bill = two_person_bill(7.0, 3.0);
        assert_eq!(bill_totals(&bill), bill_totals(&bill));
    }

    #[test]
    fn test_breakdown_matches_totals() {
        let mut bill = two_person_bill(20.0, 10.0);
        bill.items.push(
            LineItem::new("Coke", 60.0, SplitMode::Unit)
                .with_consumption(Consumption::units([("p1", 1)])),
        );

        let lines = participant_breakdown(&bill, &pid("p1"));
        let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Item", "Coke", TAX_LINE_LABEL, DISCOUNT_LINE_LABEL]);

        let sum: f64 = lines.iter().map(|l| l.amount).sum();
        let totals = bill_totals(&bill);
        assert_eq!(round_to_cents(sum), totals.get(&pid("p1")).unwrap());
    }

    #[test]
    fn test_breakdown_skips_unconsumed_and_keeps_credits() {
        let mut bill = two_person_bill(0.0, 0.0);
        bill.items.push(
            LineItem::new("Coke", 60.0, SplitMode::Unit)
                .with_consumption(Consumption::units([("p1", 1)])),
        );
        bill.items.push(
            LineItem::new("Refund", -10.0, SplitMode::Equal)
                .with_consumption(Consumption::equal(["p2"])),
        );

        let lines = participant_breakdown(&bill, &pid("p2"));
        assert_eq!(
            lines,
            vec![
                BreakdownLine {
                    label: "Item".to_string(),
                    amount: 50.0
                },
                BreakdownLine {
                    label: "Refund".to_string(),
                    amount: -10.0
                },
            ]
        );
    }

    #[test]
    fn test_breakdown_unknown_participant_is_empty() {
        let bill = two_person_bill(10.0, 10.0);
        assert!(participant_breakdown(&bill, &pid("nobody")).is_empty());
    }

    #[test]
    fn test_summary_reports_invalid_items() {
        let mut bill = two_person_bill(0.0, 0.0);
        let blank = LineItem::new("", 0.0, SplitMode::Equal);
        let blank_id = blank.id.clone();
        bill.items.push(blank);

        let summary = summarize(&bill);
        assert!(!summary.is_valid);
        assert_eq!(
            summary.invalid_items,
            vec![(blank_id, ItemIssue::NoParticipantsSelected)]
        );
        assert_eq!(summary.totals.get(&pid("p1")), Some(50.0));
        assert_eq!(summary.grand_total, 100.0);
    }
}
