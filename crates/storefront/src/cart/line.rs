//! Cart line items, add-to-cart input and derived totals.

use std::fmt;

use serde::{Deserialize, Serialize};
use tech_shop_core::{Price, ProductId};

use crate::catalog::{CatalogEntry, RawAttributes};
use crate::sort::SortKeys;

/// Name used when an add-to-cart button carries none.
pub const FALLBACK_NAME: &str = "Product";

/// One row of the persisted cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price at the time the item was added.
    pub price: Price,
    /// Pre-discount unit price.
    pub old_price: Price,
    pub image_ref: String,
    /// Always at least 1.
    pub qty: u32,
}

impl CartLineItem {
    /// Unit price used for the subtotal. A missing reference price means
    /// the item is not discounted.
    #[must_use]
    pub fn reference_price(&self) -> Price {
        if self.old_price.is_zero() {
            self.price
        } else {
            self.old_price
        }
    }

    /// `price × qty`
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.qty
    }

    /// `reference price × qty`
    #[must_use]
    pub fn line_subtotal(&self) -> Price {
        self.reference_price() * self.qty
    }
}

impl SortKeys for CartLineItem {
    fn price_key(&self) -> Price {
        self.price
    }
}

/// What an add-to-cart action supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub old_price: Price,
    /// `None` uses the store's placeholder image.
    pub image_ref: Option<String>,
}

impl CartItemInput {
    /// Build a line item for a first add.
    pub(crate) fn into_line(self, placeholder: &str) -> CartLineItem {
        CartLineItem {
            id: self.id,
            name: self.name,
            price: self.price,
            old_price: self.old_price,
            image_ref: self.image_ref.unwrap_or_else(|| placeholder.to_string()),
            qty: 1,
        }
    }
}

impl From<&CatalogEntry> for CartItemInput {
    fn from(entry: &CatalogEntry) -> Self {
        let old_price = if entry.old_price.is_zero() {
            entry.price
        } else {
            entry.old_price
        };
        Self {
            id: ProductId::new(entry.link_id()),
            name: entry.name.clone(),
            price: entry.price,
            old_price,
            image_ref: Some(entry.image_ref.clone()),
        }
    }
}

impl From<&RawAttributes> for CartItemInput {
    /// Fill gaps the way the add-to-cart button does.
    ///
    /// The ID falls back to a hash of the name, then to the current time in
    /// milliseconds; the reference price falls back to the price.
    fn from(raw: &RawAttributes) -> Self {
        let text = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let price_of = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| Price::parse(s).ok())
                .filter(|p| !p.is_zero())
        };

        let name = text(&raw.name);
        let id = text(&raw.id).map_or_else(
            || {
                name.as_deref().map_or_else(
                    || ProductId::new(chrono::Utc::now().timestamp_millis().to_string()),
                    ProductId::from_name_hash,
                )
            },
            ProductId::from,
        );
        let price = price_of(&raw.price).unwrap_or(Price::ZERO);

        Self {
            id,
            name: name.unwrap_or_else(|| FALLBACK_NAME.to_string()),
            price,
            old_price: price_of(&raw.old_price).unwrap_or(price),
            image_ref: text(&raw.image_ref),
        }
    }
}

/// Addresses a cart line by position or product ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LineRef {
    Index(usize),
    Id(ProductId),
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "index {i}"),
            Self::Id(id) => write!(f, "id {:?}", id.as_str()),
        }
    }
}

impl From<usize> for LineRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<ProductId> for LineRef {
    fn from(id: ProductId) -> Self {
        Self::Id(id)
    }
}

impl From<&ProductId> for LineRef {
    fn from(id: &ProductId) -> Self {
        Self::Id(id.clone())
    }
}

impl From<&str> for LineRef {
    fn from(id: &str) -> Self {
        Self::Id(ProductId::new(id))
    }
}

/// Derived cart figures shown in the order summary and header badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    /// Σ reference price × qty
    pub subtotal: Price,
    /// Σ price × qty
    pub total: Price,
    /// `subtotal − total`, never negative.
    pub discount: Price,
    /// Σ qty
    pub count: u32,
}

impl Totals {
    /// Compute totals over a list of lines.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Self {
        let subtotal: Price = items.iter().map(CartLineItem::line_subtotal).sum();
        let total: Price = items.iter().map(CartLineItem::line_total).sum();
        let count = items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.qty));

        Self {
            subtotal,
            total,
            discount: subtotal.saturating_sub(total),
            count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: u64, old_price: u64, qty: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(id),
            name: id.to_string(),
            price: Price::from_rupees(price),
            old_price: Price::from_rupees(old_price),
            image_ref: String::new(),
            qty,
        }
    }

    #[test]
    fn test_totals_example() {
        let items = [line("a", 100, 150, 2), line("b", 50, 50, 1)];
        let totals = Totals::from_items(&items);
        assert_eq!(totals.subtotal, Price::from_rupees(350));
        assert_eq!(totals.total, Price::from_rupees(250));
        assert_eq!(totals.discount, Price::from_rupees(100));
        assert_eq!(totals.count, 3);
    }

    #[test]
    fn test_totals_missing_reference_price() {
        let totals = Totals::from_items(&[line("a", 80, 0, 3)]);
        assert_eq!(totals.subtotal, Price::from_rupees(240));
        assert_eq!(totals.discount, Price::ZERO);
    }

    #[test]
    fn test_discount_never_negative() {
        // Reference price below the current price (a mark-up).
        let totals = Totals::from_items(&[line("a", 120, 100, 1)]);
        assert_eq!(totals.discount, Price::ZERO);
    }

    #[test]
    fn test_empty_totals() {
        assert_eq!(Totals::from_items(&[]), Totals::default());
    }

    #[test]
    fn test_input_from_attributes_defaults() {
        let raw = RawAttributes {
            name: Some("Phone Case".to_string()),
            price: Some("499".to_string()),
            ..Default::default()
        };
        let input = CartItemInput::from(&raw);
        assert_eq!(input.id, ProductId::from_name_hash("Phone Case"));
        assert_eq!(input.price, Price::from_rupees(499));
        assert_eq!(input.old_price, Price::from_rupees(499));
        assert_eq!(input.image_ref, None);
    }

    #[test]
    fn test_input_from_anonymous_attributes() {
        let input = CartItemInput::from(&RawAttributes::default());
        assert_eq!(input.name, FALLBACK_NAME);
        assert!(input.id.numeric_value().is_some());
        assert_eq!(input.price, Price::ZERO);
    }

    #[test]
    fn test_input_from_catalog_entry() {
        let entry = crate::catalog::normalize(&RawAttributes {
            name: Some("Laptop".to_string()),
            price: Some("50000".to_string()),
            ..Default::default()
        })
        .unwrap();
        let input = CartItemInput::from(&entry);
        // No ID on the card: the name identifies the product.
        assert_eq!(input.id, ProductId::new("Laptop"));
        assert_eq!(input.old_price, input.price);
        assert_eq!(input.image_ref.as_deref(), Some("./placeholder.png"));
    }

    #[test]
    fn test_line_ref_display() {
        assert_eq!(LineRef::from(2).to_string(), "index 2");
        assert_eq!(LineRef::from("sku-1").to_string(), "id \"sku-1\"");
    }

    #[test]
    fn test_line_serializes_camel_case() {
        let json = serde_json::to_value(line("7", 10, 12, 1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "7",
                "name": "7",
                "price": 10,
                "oldPrice": 12,
                "imageRef": "",
                "qty": 1
            })
        );
    }
}
