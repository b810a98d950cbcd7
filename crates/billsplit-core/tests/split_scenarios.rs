//! End-to-end split scenarios through the public API.

use billsplit_core::{
    bill_totals, is_item_valid, item_shares, participant_breakdown, summarize, BillState,
    Consumption, ItemDetails, LineItem, Participant, ParticipantId, SplitMode,
};
use serde_json::json;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pid(id: &str) -> ParticipantId {
    ParticipantId::new(id)
}

fn two_diners() -> BillState {
    BillState {
        participants: vec![
            Participant::with_id("p1", "Alice"),
            Participant::with_id("p2", "Bob"),
        ],
        items: vec![LineItem::new("Thali", 100.0, SplitMode::Equal)
            .with_consumption(Consumption::equal(["p1", "p2"]))],
        ..BillState::default()
    }
}

#[test]
fn equal_shares_sum_to_price() {
    for n in 1..=7usize {
        let ids: Vec<String> = (0..n).map(|i| format!("p{}", i)).collect();
        let item = LineItem::new("Dish", 123.45, SplitMode::Equal)
            .with_consumption(Consumption::equal(ids.iter().map(String::as_str)));

        let shares = item_shares(&item);
        assert_eq!(shares.len(), n);
        for share in shares.values() {
            assert!(approx_eq(*share, 123.45 / n as f64));
        }
        assert!(approx_eq(shares.values().sum(), 123.45));
    }
}

#[test]
fn unit_shares_are_proportional_and_sum_to_price() {
    let item = LineItem::new("Momos", 100.0, SplitMode::Unit)
        .with_quantity(7)
        .with_consumption(Consumption::units([("p1", 3), ("p2", 1), ("p3", 3)]));

    let shares = item_shares(&item);
    assert!(approx_eq(shares[&pid("p1")], 3.0 * 100.0 / 7.0));
    assert!(approx_eq(shares[&pid("p2")], 100.0 / 7.0));
    assert!(approx_eq(shares.values().sum(), 100.0));
}

#[test]
fn invalid_consumption_is_rejected_or_flagged() {
    // EQUAL with all flags false decodes to an empty selection.
    let all_false: LineItem = serde_json::from_value(json!({
        "id": "i1", "price": 50, "splitMode": "EQUAL",
        "consumption": { "p1": false, "p2": false }
    }))
    .unwrap();
    assert!(!is_item_valid(&all_false));

    let over: LineItem = serde_json::from_value(json!({
        "id": "i2", "price": 50, "quantity": 2, "splitMode": "UNIT",
        "consumption": { "p1": 2, "p2": 1 }
    }))
    .unwrap();
    assert!(!is_item_valid(&over));

    // Negative and fractional counts never reach the validator.
    for bad in [json!(-1), json!(0.5)] {
        let raw = json!({
            "id": "i3", "price": 50, "splitMode": "UNIT",
            "consumption": { "p1": bad }
        });
        assert!(serde_json::from_value::<LineItem>(raw).is_err());
    }
}

#[test]
fn removed_participant_never_reappears() {
    let bill = two_diners();
    let bill = bill.without_participant(&pid("p2")).unwrap();

    for item in &bill.items {
        assert!(!item.consumption.contains(&pid("p2")));
    }
    let totals = bill_totals(&bill);
    assert_eq!(totals.get(&pid("p2")), None);
    assert_eq!(totals.get(&pid("p1")), Some(100.0));
}

#[test]
fn new_participant_joins_equal_items_only() {
    let mut bill = two_diners();
    bill.items.push(
        LineItem::new("Coke", 60.0, SplitMode::Unit)
            .with_consumption(Consumption::units([("p1", 1)])),
    );

    let (bill, carol) = bill.with_participant("Carol").unwrap();

    assert!(bill.items[0].consumption.contains(&carol));
    assert_eq!(bill.items[1].consumption, Consumption::units([("p1", 1)]));
}

#[test]
fn switching_mode_always_resets() {
    let bill = two_diners();
    let id = bill.items[0].id.clone();

    let bill = bill.with_split_mode(&id, SplitMode::Unit).unwrap();
    assert!(bill.items[0].consumption.is_empty());

    let bill = bill.with_units(&id, &pid("p1"), 1).unwrap();
    let bill = bill.with_split_mode(&id, SplitMode::Equal).unwrap();
    assert_eq!(bill.items[0].consumption, Consumption::empty(SplitMode::Equal));
}

#[test]
fn discount_and_tax_scenarios() {
    let cases = [
        (10.0, 0.0, 45.0),
        (120.0, 0.0, -10.0),
        (20.0, 10.0, 45.0),
    ];

    for (discount, tax, expected) in cases {
        let bill = two_diners()
            .with_discount(discount)
            .unwrap()
            .with_tax(tax)
            .unwrap();
        let totals = bill_totals(&bill);
        assert_eq!(totals.get(&pid("p1")), Some(expected), "discount={discount} tax={tax}");
        assert_eq!(totals.get(&pid("p2")), Some(expected), "discount={discount} tax={tax}");
    }
}

#[test]
fn mixed_items() {
    let bill = BillState {
        participants: vec![
            Participant::with_id("p1", "Alice"),
            Participant::with_id("p2", "Bob"),
        ],
        items: vec![
            LineItem::new("Biryani", 300.0, SplitMode::Equal)
                .with_consumption(Consumption::equal(["p1", "p2"])),
            LineItem::new("Roti", 100.0, SplitMode::Unit)
                .with_quantity(5)
                .with_consumption(Consumption::units([("p1", 4), ("p2", 1)])),
        ],
        ..BillState::default()
    };

    let totals = bill_totals(&bill);
    assert_eq!(totals.get(&pid("p1")), Some(230.0));
    assert_eq!(totals.get(&pid("p2")), Some(170.0));
}

#[test]
fn invalid_item_contributes_nothing() {
    let (bill, blank) = two_diners().with_new_item();
    let bill = bill
        .with_item_details(
            &blank,
            ItemDetails {
                price: Some(500.0),
                ..ItemDetails::default()
            },
        )
        .unwrap();
    let bill = bill.with_selection(&blank, &pid("p1"), false).unwrap();
    let bill = bill.with_selection(&blank, &pid("p2"), false).unwrap();

    let summary = summarize(&bill);
    assert!(!summary.is_valid);
    assert_eq!(summary.totals.get(&pid("p1")), Some(50.0));
    assert_eq!(summary.totals.get(&pid("p2")), Some(50.0));
    assert!(participant_breakdown(&bill, &pid("p1"))
        .iter()
        .all(|line| !line.label.is_empty()));
}

#[test]
fn totals_are_idempotent() {
    let bill = two_diners().with_tax(7.0).unwrap();
    let first = bill_totals(&bill);
    let second = bill_totals(&bill);
    assert_eq!(first, second);
}

#[test]
fn bill_survives_json_round_trip() {
    let bill = billsplit_core::import::demo_bill();
    let text = serde_json::to_string(&bill).unwrap();
    let back: BillState = serde_json::from_str(&text).unwrap();

    assert_eq!(back, bill);
    assert_eq!(bill_totals(&back), bill_totals(&bill));
}
