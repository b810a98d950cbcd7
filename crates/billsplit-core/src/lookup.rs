//! # Lookup
//!
//! Finding participants and items by id or by display name.
//!
//! Names are matched case-insensitively after trimming, and the first match
//! in bill order wins. Two participants called "Sam" are therefore
//! indistinguishable by name; callers that need precision use ids.

use crate::types::{BillState, ItemId, LineItem, Participant, ParticipantId};

/// Normalized form of a name for comparison.
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Returns true if two display names refer to the same person or dish.
pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

pub fn participant_by_id<'a>(bill: &'a BillState, id: &ParticipantId) -> Option<&'a Participant> {
    bill.participants.iter().find(|p| &p.id == id)
}

/// First participant whose name matches, ignoring case.
pub fn participant_by_name<'a>(bill: &'a BillState, name: &str) -> Option<&'a Participant> {
    let key = name_key(name);
    bill.participants.iter().find(|p| name_key(&p.name) == key)
}

pub fn item_by_id<'a>(bill: &'a BillState, id: &ItemId) -> Option<&'a LineItem> {
    bill.items.iter().find(|i| &i.id == id)
}

/// First item whose name matches, ignoring case.
pub fn item_by_name<'a>(bill: &'a BillState, name: &str) -> Option<&'a LineItem> {
    let key = name_key(name);
    bill.items.iter().find(|i| name_key(&i.name) == key)
}

/// Resolves a free-form reference to a participant: exact id first, then name.
///
/// ## Example
/// ```rust
/// use billsplit_core::{BillState, Participant};
/// use billsplit_core::lookup::resolve_participant;
///
/// let bill = BillState {
///     participants: vec![Participant::with_id("p1", "Alice")],
///     ..BillState::default()
/// };
///
/// assert_eq!(resolve_participant(&bill, "p1").map(|p| p.name.as_str()), Some("Alice"));
/// assert_eq!(resolve_participant(&bill, "ALICE").map(|p| p.id.as_str()), Some("p1"));
/// assert!(resolve_participant(&bill, "Bob").is_none());
/// ```
pub fn resolve_participant<'a>(bill: &'a BillState, reference: &str) -> Option<&'a Participant> {
    participant_by_id(bill, &ParticipantId::new(reference))
        .or_else(|| participant_by_name(bill, reference))
}

/// Resolves a free-form reference to an item: exact id first, then name.
pub fn resolve_item<'a>(bill: &'a BillState, reference: &str) -> Option<&'a LineItem> {
    item_by_id(bill, &ItemId::new(reference)).or_else(|| item_by_name(bill, reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SplitMode;

    fn bill() -> BillState {
        BillState {
            participants: vec![
                Participant::with_id("p1", "Alice"),
                Participant::with_id("p2", "Sam"),
                Participant::with_id("p3", "sam"),
            ],
            items: vec![
                LineItem::new("Jeera Rice", 180.0, SplitMode::Equal).with_id("1"),
                LineItem::new("Coke", 60.0, SplitMode::Unit).with_id("2"),
            ],
            ..BillState::default()
        }
    }

    #[test]
    fn test_participant_by_name_ignores_case_and_whitespace() {
        let bill = bill();
        let found = participant_by_name(&bill, "  alice ").unwrap();
        assert_eq!(found.id.as_str(), "p1");
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let bill = bill();
        assert_eq!(participant_by_name(&bill, "SAM").unwrap().id.as_str(), "p2");
    }

    #[test]
    fn test_resolve_prefers_id() {
        let mut bill = bill();
        // A participant literally named "p2" loses to the id match.
        bill.participants.insert(0, Participant::with_id("p9", "p2"));
        assert_eq!(resolve_participant(&bill, "p2").unwrap().name, "Sam");
    }

    #[test]
    fn test_resolve_item() {
        let bill = bill();
        assert_eq!(resolve_item(&bill, "2").unwrap().name, "Coke");
        assert_eq!(resolve_item(&bill, "jeera rice").unwrap().id.as_str(), "1");
        assert!(resolve_item(&bill, "Naan").is_none());
    }

    #[test]
    fn test_same_name() {
        assert!(same_name("Alice", " alice"));
        assert!(!same_name("Alice", "Alicia"));
    }
}
