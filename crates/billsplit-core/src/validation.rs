//! # Validation Module
//!
//! Two kinds of checks live here:
//!
//! 1. **Item consistency** - does an item's consumption record add up for
//!    its split mode? Answered with a `bool`, never an error: half-edited
//!    items are a normal state while a bill is being filled in.
//! 2. **Input validation** - is a name, price or adjustment acceptable at
//!    all? Answered with `ValidationResult`, used before a mutation runs.
//!
//! ## Item Consistency Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      When Is an Item Valid?                             │
//! │                                                                         │
//! │  EQUAL                                                                  │
//! │  └── at least one participant selected                                  │
//! │                                                                         │
//! │  UNIT   (capacity = quantity, or 1 when unset)                          │
//! │  ├── total units = 0          → invalid (nobody assigned)               │
//! │  ├── total units > capacity   → invalid (more than the receipt shows)   │
//! │  └── 1 ≤ total ≤ capacity     → valid                                   │
//! │                                                                         │
//! │  Invalid items are skipped by the allocator and contribute 0.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{BillState, Consumption, ItemId, LineItem};
use crate::{MAX_ITEM_QUANTITY, MAX_PARTICIPANTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Item Consistency
// =============================================================================

/// Why an item does not currently contribute to the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum ItemIssue {
    /// EQUAL item with nobody selected.
    NoParticipantsSelected,
    /// UNIT item with no units assigned.
    NoUnitsAssigned,
    /// UNIT item with more units assigned than the receipt quantity.
    UnitsExceedQuantity { assigned: u64, quantity: u32 },
}

/// Sum of unit counts on a UNIT record.
pub(crate) fn total_units(consumption: &Consumption) -> u64 {
    match consumption {
        Consumption::Equal(_) => 0,
        Consumption::Unit(units) => units.values().map(|&n| u64::from(n)).sum(),
    }
}

/// Explains why an item is invalid, or `None` if it is valid.
///
/// ## Example
/// ```rust
/// use billsplit_core::{Consumption, LineItem, SplitMode};
/// use billsplit_core::validation::{item_issue, ItemIssue};
///
/// let roti = LineItem::new("Roti", 60.0, SplitMode::Unit)
///     .with_quantity(3)
///     .with_consumption(Consumption::units([("p1", 2), ("p2", 2)]));
///
/// assert_eq!(
///     item_issue(&roti),
///     Some(ItemIssue::UnitsExceedQuantity { assigned: 4, quantity: 3 })
/// );
/// ```
pub fn item_issue(item: &LineItem) -> Option<ItemIssue> {
    match &item.consumption {
        Consumption::Equal(selected) => {
            if selected.is_empty() {
                Some(ItemIssue::NoParticipantsSelected)
            } else {
                None
            }
        }
        Consumption::Unit(_) => {
            let assigned = total_units(&item.consumption);
            let quantity = item.capacity();
            if assigned == 0 {
                Some(ItemIssue::NoUnitsAssigned)
            } else if assigned > u64::from(quantity) {
                Some(ItemIssue::UnitsExceedQuantity { assigned, quantity })
            } else {
                None
            }
        }
    }
}

/// Returns true if the item's consumption record is consistent with its
/// split mode.
#[inline]
pub fn is_item_valid(item: &LineItem) -> bool {
    item_issue(item).is_none()
}

/// Returns true if every item in the bill is valid.
///
/// This gates no computation. The host surfaces it as a warning.
pub fn is_bill_valid(bill: &BillState) -> bool {
    bill.items.iter().all(is_item_valid)
}

/// Lists the invalid items of a bill, in bill order.
pub fn invalid_items(bill: &BillState) -> Vec<(ItemId, ItemIssue)> {
    bill.items
        .iter()
        .filter_map(|item| item_issue(item).map(|issue| (item.id.clone(), issue)))
        .collect()
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a participant name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
///
/// ## Example
/// ```rust
/// use billsplit_core::validation::validate_participant_name;
///
/// assert!(validate_participant_name("Alice").is_ok());
/// assert!(validate_participant_name("   ").is_err());
/// ```
pub fn validate_participant_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "participant name".to_string(),
        });
    }

    if name.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "participant name".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a line item name.
///
/// Empty names are allowed: a freshly added row has no name yet.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "item name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line price.
///
/// ## Rules
/// - Must be finite
/// - Zero and negative prices are allowed (blank rows, correction entries)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::MustBeFinite {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a bill-wide adjustment (tax or discount).
///
/// ## Rules
/// - Must be finite
/// - Must be >= 0 (a discount is entered as a positive amount)
///
/// ## Example
/// ```rust
/// use billsplit_core::validation::validate_adjustment;
///
/// assert!(validate_adjustment("tax", 12.5).is_ok());
/// assert!(validate_adjustment("discount", 0.0).is_ok());
/// assert!(validate_adjustment("discount", -5.0).is_err());
/// ```
pub fn validate_adjustment(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::MustBeFinite {
            field: field.to_string(),
        });
    }

    if amount < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a receipt quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more participant fits on the bill.
pub fn validate_participant_count(current: usize) -> ValidationResult<()> {
    if current >= MAX_PARTICIPANTS {
        return Err(ValidationError::OutOfRange {
            field: "participants".to_string(),
            min: 0,
            max: MAX_PARTICIPANTS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
