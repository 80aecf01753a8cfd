//! Reading and writing the persisted cart value.
//!
//! Writes are strict: a JSON array of camelCase line objects. Reads accept
//! whatever older pages or other tabs may have left behind: numbers stored
//! as strings, the legacy `img`/`oldprice` field names, rows that are not
//! objects or lack an ID, and duplicate IDs (merged into the first row).

use serde::Deserialize;
use serde_json::Value;
use tech_shop_core::{Price, ProductId};

use super::line::{CartLineItem, FALLBACK_NAME};
use crate::error::Result;

/// Loosely typed row as found in storage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLine {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    price: Value,
    #[serde(default, alias = "oldprice")]
    old_price: Value,
    #[serde(default, alias = "img")]
    image_ref: Value,
    #[serde(default)]
    qty: Value,
}

/// Decode a stored cart.
///
/// A missing value or JSON `null` is an empty cart. Unusable rows are
/// skipped.
///
/// # Errors
///
/// Returns [`StorefrontError::StorageDecode`](crate::error::StorefrontError::StorageDecode)
/// if the value is not a JSON array (or `null`).
pub fn decode(raw: Option<&str>, placeholder: &str) -> Result<Vec<CartLineItem>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let rows: Option<Vec<Value>> = serde_json::from_str(raw)?;

    let mut items: Vec<CartLineItem> = Vec::new();
    for (index, row) in rows.unwrap_or_default().into_iter().enumerate() {
        let Some(line) = decode_line(row, placeholder) else {
            tracing::debug!(index, "Skipping unreadable cart row");
            continue;
        };
        match items.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => existing.qty = existing.qty.saturating_add(line.qty),
            None => items.push(line),
        }
    }
    Ok(items)
}

/// Encode a cart for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[CartLineItem]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

fn decode_line(row: Value, placeholder: &str) -> Option<CartLineItem> {
    let stored: StoredLine = serde_json::from_value(row).ok()?;

    let id = as_text(&stored.id)?;
    let qty = as_qty(&stored.qty)?;

    Some(CartLineItem {
        id: ProductId::new(id),
        name: as_text(&stored.name).unwrap_or_else(|| FALLBACK_NAME.to_string()),
        price: as_price(&stored.price).unwrap_or(Price::ZERO),
        old_price: as_price(&stored.old_price).unwrap_or(Price::ZERO),
        image_ref: as_text(&stored.image_ref).unwrap_or_else(|| placeholder.to_string()),
        qty,
    })
}

/// Non-blank string or number, as text.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_price(value: &Value) -> Option<Price> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(Price::from_rupees)
            .or_else(|| n.as_f64().and_then(Price::from_f64)),
        Value::String(s) => Price::parse(s).ok(),
        _ => None,
    }
}

/// Positive whole quantity. Whole-valued floats such as `2.0` count.
fn as_qty(value: &Value) -> Option<u32> {
    let qty = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }?;
    u32::try_from(qty).ok().filter(|q| *q >= 1)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn whole(qty: f64) -> Option<u64> {
    (qty.is_finite() && qty.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&qty))
        .then(|| qty as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StorefrontError;

    const PLACEHOLDER: &str = "./placeholder.png";

    #[test]
    fn test_absent_is_empty() {
        assert!(decode(None, PLACEHOLDER).unwrap().is_empty());
        assert!(decode(Some("null"), PLACEHOLDER).unwrap().is_empty());
        assert!(decode(Some("[]"), PLACEHOLDER).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_is_decode_error() {
        for raw in ["{not json", "{\"id\":1}", "42", ""] {
            assert!(
                matches!(
                    decode(Some(raw), PLACEHOLDER),
                    Err(StorefrontError::StorageDecode(_))
                ),
                "expected decode error for {raw:?}"
            );
        }
    }

    #[test]
    fn test_decodes_canonical_rows() {
        let raw = r#"[{"id":"1","name":"Laptop","price":50000,"oldPrice":55000,"imageRef":"l.png","qty":2}]"#;
        let items = decode(Some(raw), PLACEHOLDER).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ProductId::new("1"));
        assert_eq!(items[0].price, Price::from_rupees(50_000));
        assert_eq!(items[0].old_price, Price::from_rupees(55_000));
        assert_eq!(items[0].image_ref, "l.png");
        assert_eq!(items[0].qty, 2);
    }

    #[test]
    fn test_decodes_legacy_rows() {
        let raw = r#"[{"id":12345,"name":"Case","price":"499","oldprice":"699","img":"c.png","qty":"3"}]"#;
        let items = decode(Some(raw), PLACEHOLDER).unwrap();
        assert_eq!(items[0].id, ProductId::new("12345"));
        assert_eq!(items[0].price, Price::from_rupees(499));
        assert_eq!(items[0].old_price, Price::from_rupees(699));
        assert_eq!(items[0].image_ref, "c.png");
        assert_eq!(items[0].qty, 3);
    }

    #[test]
    fn test_skips_unusable_rows() {
        let raw = r#"[
            "garbage",
            {"name":"No id","qty":1},
            {"id":"z","qty":0},
            {"id":"neg","qty":-2},
            {"id":"ok","qty":1}
        ]"#;
        let items = decode(Some(raw), PLACEHOLDER).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ProductId::new("ok"));
        assert_eq!(items[0].name, FALLBACK_NAME);
        assert_eq!(items[0].image_ref, PLACEHOLDER);
        assert_eq!(items[0].price, Price::ZERO);
    }

    #[test]
    fn test_whole_float_quantities() {
        let raw = r#"[
            {"id":"a","qty":2.0},
            {"id":"b","qty":"3.0"},
            {"id":"c","qty":1.5},
            {"id":"d","qty":0.0}
        ]"#;
        let items = decode(Some(raw), PLACEHOLDER).unwrap();
        let qtys: Vec<_> = items.iter().map(|i| (i.id.as_str(), i.qty)).collect();
        assert_eq!(qtys, [("a", 2), ("b", 3)]);
    }

    #[test]
    fn test_merges_duplicate_ids() {
        let raw = r#"[{"id":"a","qty":1},{"id":"b","qty":1},{"id":"a","qty":2}]"#;
        let items = decode(Some(raw), PLACEHOLDER).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ProductId::new("a"));
        assert_eq!(items[0].qty, 3);
    }

    #[test]
    fn test_encode_then_decode_preserves_order() {
        let raw = r#"[{"id":"b","qty":1,"price":5},{"id":"a","qty":4,"price":7.5}]"#;
        let items = decode(Some(raw), PLACEHOLDER).unwrap();
        let again = decode(Some(&encode(&items).unwrap()), PLACEHOLDER).unwrap();
        assert_eq!(items, again);
    }
}
