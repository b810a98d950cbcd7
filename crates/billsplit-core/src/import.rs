//! # Import Module
//!
//! Reading bills that were extracted somewhere else: pasted from an
//! external AI, returned by an OCR service, or loaded from the demo data.
//!
//! ## Import Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bill Import                                    │
//! │                                                                         │
//! │  ┌──────────────┐    ┌──────────────────┐    ┌──────────────────────┐  │
//! │  │ BillSource   │───►│  parse_bill_json │───►│  ParsedBill          │  │
//! │  │ (pasted text,│    │  strip ``` fence │    │  items: [ProtoItem]  │  │
//! │  │  AI, demo)   │    │  check `items`   │    │  tax?, discount?     │  │
//! │  └──────────────┘    │  check each item │    └──────────┬───────────┘  │
//! │                      └──────────────────┘               │              │
//! │                                                         ▼              │
//! │                           BillState::with_imported_items()             │
//! │                           (ids generated, EQUAL items shared by all)   │
//! │                                                                         │
//! │  ALL OR NOTHING: one bad item rejects the whole payload.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The AI vision service itself is not part of this crate. It implements
//! [`BillSource`] wherever the network lives.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ts_rs::TS;

use crate::error::{ImportError, ImportResult, ValidationError};
use crate::types::{BillState, Consumption, LineItem, Participant, SplitMode};
use crate::validation::{validate_adjustment, validate_item_name, validate_quantity};
use crate::DEFAULT_ITEM_QUANTITY;

/// Prompt users paste into an external AI together with a photo of the bill.
///
/// The response it asks for is exactly what [`parse_bill_json`] accepts.
pub const BILL_ANALYSIS_PROMPT: &str = r#"You are a receipt reader. Read the attached restaurant bill and reply with JSON only, no commentary.

Use exactly this shape:
{
  "billName": "<restaurant name, if printed>",
  "items": [
    { "name": "<item as printed>", "price": <line total as a number>, "quantity": <units on the line>, "splitMode": "EQUAL" | "UNIT" }
  ],
  "tax": <sum of all taxes and service charges, or 0>,
  "discount": <total discount as a positive number, or 0>
}

Rules:
- "price" is the total for the line, not the unit price.
- Use "UNIT" for countable things people order individually (breads, drinks, desserts).
- Use "EQUAL" for dishes the table shares.
- Do not list taxes, service charges or discounts as items.
- Numbers must be plain JSON numbers without currency symbols."#;

// =============================================================================
// Parsed Shapes
// =============================================================================

/// One line of an imported bill, before ids and consumption exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProtoItem {
    #[serde(default)]
    pub name: String,
    pub price: f64,
    #[serde(default)]
    #[ts(optional)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub split_mode: SplitMode,
}

/// An imported bill.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ParsedBill {
    pub items: Vec<ProtoItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub bill_name: Option<String>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Removes a surrounding Markdown code fence, if any.
///
/// AI chat replies often come as ```` ```json ... ``` ````.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Info string ("json"), which may share the line with the body.
    let body = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim_start();
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses an imported bill.
///
/// ## Errors
/// - `MalformedJson` if the text is not JSON
/// - `MissingItems` if there is no `items` array
/// - `InvalidItem` naming the first item that cannot be read
/// - `InvalidField` for a negative or non-numeric tax / discount
///
/// ## Example
/// ```rust
/// use billsplit_core::import::parse_bill_json;
/// use billsplit_core::SplitMode;
///
/// let reply = "```json\n{\"items\": [{\"name\": \"Lassi\", \"price\": 90, \"splitMode\": \"UNIT\"}]}\n```";
/// let parsed = parse_bill_json(reply).unwrap();
///
/// assert_eq!(parsed.items[0].name, "Lassi");
/// assert_eq!(parsed.items[0].split_mode, SplitMode::Unit);
/// ```
pub fn parse_bill_json(text: &str) -> ImportResult<ParsedBill> {
    let body = strip_code_fence(text);
    let value: Value =
        serde_json::from_str(body).map_err(|e| ImportError::MalformedJson(e.to_string()))?;

    let raw_items = value
        .get("items")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingItems)?;

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_item(index, raw))
        .collect::<ImportResult<Vec<_>>>()?;

    let tax = adjustment(&value, "tax")?;
    let discount = adjustment(&value, "discount")?;
    let bill_name = value
        .get("billName")
        .and_then(Value::as_str)
        .map(str::to_string);

    debug!(items = items.len(), "Parsed imported bill");

    Ok(ParsedBill {
        items,
        tax,
        discount,
        bill_name,
    })
}

fn parse_item(index: usize, raw: &Value) -> ImportResult<ProtoItem> {
    let invalid = |reason: String| ImportError::InvalidItem { index, reason };

    let item: ProtoItem = serde_json::from_value(raw.clone()).map_err(|e| invalid(e.to_string()))?;

    validate_item_name(&item.name).map_err(|e| invalid(e.to_string()))?;
    if let Some(quantity) = item.quantity {
        validate_quantity(quantity).map_err(|e| invalid(e.to_string()))?;
    }

    Ok(item)
}

/// Reads an optional bill-level amount. `null` counts as absent.
fn adjustment(value: &Value, field: &str) -> ImportResult<Option<f64>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => {
            let amount = raw.as_f64().ok_or_else(|| {
                ImportError::InvalidField(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: "must be a number".to_string(),
                })
            })?;
            validate_adjustment(field, amount)?;
            Ok(Some(amount))
        }
    }
}

/// Turns imported lines into bill items.
///
/// EQUAL lines start shared by every given participant. UNIT lines start
/// with nobody assigned.
pub fn into_line_items(protos: Vec<ProtoItem>, participants: &[Participant]) -> Vec<LineItem> {
    protos
        .into_iter()
        .map(|proto| {
            let consumption = match proto.split_mode {
                SplitMode::Equal => Consumption::equal(participants.iter().map(|p| p.id.clone())),
                SplitMode::Unit => Consumption::empty(SplitMode::Unit),
            };
            LineItem::new(proto.name, proto.price, proto.split_mode)
                .with_quantity(proto.quantity.unwrap_or(DEFAULT_ITEM_QUANTITY))
                .with_consumption(consumption)
        })
        .collect()
}

// =============================================================================
// Sources
// =============================================================================

/// Anything that can produce an imported bill.
pub trait BillSource {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn fetch(&self) -> ImportResult<ParsedBill>;
}

/// Text pasted by the user, usually an AI chat reply.
#[derive(Debug, Clone)]
pub struct PastedJson(pub String);

impl BillSource for PastedJson {
    fn name(&self) -> &'static str {
        "pasted-json"
    }

    fn fetch(&self) -> ImportResult<ParsedBill> {
        parse_bill_json(&self.0)
    }
}

/// The lines of the demo bill, as an import.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoBill;

impl BillSource for DemoBill {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn fetch(&self) -> ImportResult<ParsedBill> {
        let demo = demo_bill();
        Ok(ParsedBill {
            items: demo
                .items
                .into_iter()
                .map(|item| ProtoItem {
                    split_mode: item.split_mode(),
                    name: item.name,
                    price: item.price,
                    quantity: Some(item.quantity),
                })
                .collect(),
            tax: Some(demo.tax),
            discount: Some(demo.discount),
            bill_name: demo.bill_name,
        })
    }
}

/// A complete sample bill: four diners at a Punjabi restaurant.
///
/// The roti line has nobody assigned yet, so the demo also shows how an
/// incomplete item is reported.
pub fn demo_bill() -> BillState {
    BillState {
        participants: vec![
            Participant::with_id("p1", "Alice"),
            Participant::with_id("p2", "Bob"),
            Participant::with_id("p3", "Charlie"),
            Participant::with_id("p4", "David"),
        ],
        items: vec![
            LineItem::new("Butter Roti (x3)", 120.0, SplitMode::Unit)
                .with_id("1")
                .with_quantity(3),
            LineItem::new("Paneer Butter Masala", 280.0, SplitMode::Equal)
                .with_id("2")
                .with_consumption(Consumption::equal(["p1", "p2", "p3"])),
            LineItem::new("Jeera Rice", 180.0, SplitMode::Equal)
                .with_id("3")
                .with_consumption(Consumption::equal(["p1", "p2", "p3"])),
            LineItem::new("Coke", 60.0, SplitMode::Unit)
                .with_id("4")
                .with_consumption(Consumption::units([("p1", 1)])),
            LineItem::new("Lime Soda", 80.0, SplitMode::Unit)
                .with_id("5")
                .with_consumption(Consumption::units([("p3", 1)])),
        ],
        discount: 50.0,
        tax: 60.0,
        bill_name: Some("Punjabi Aahar".to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
