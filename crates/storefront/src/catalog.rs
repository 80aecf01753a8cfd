//! Product catalog built from page attributes.
//!
//! The presentation layer reads `data-*` attributes off every product card
//! and hands them over as [`RawAttributes`]. This module turns those loose
//! string records into [`CatalogEntry`] values: trimmed, defaulted, and
//! deduplicated so each product appears once. Catalogs are rebuilt on every
//! pass and never persisted.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tech_shop_core::{CategorySlug, Price, ProductId};
use tracing::instrument;

use crate::config::DEFAULT_PLACEHOLDER_IMAGE;
use crate::error::{self, StorefrontError};
use crate::sort::SortKeys;

/// Category value that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Page that renders a single product.
const PRODUCT_PAGE: &str = "product_details.html";

/// Price as rendered inside a card (`₹ 1,299`).
static DISPLAY_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹\s*([\d,]+)").expect("Invalid regex"));

/// Attribute record for one product, exactly as found on the page.
///
/// Every field is optional and unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    #[serde(alias = "oldprice")]
    pub old_price: Option<String>,
    #[serde(alias = "img", alias = "image")]
    pub image_ref: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Explicit recency rank (`data-newest`).
    pub newest: Option<String>,
    /// Price text rendered in the card, used when `price` is missing.
    pub price_text: Option<String>,
}

/// A normalized product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: Option<ProductId>,
    /// Trimmed, never empty.
    pub name: String,
    pub price: Price,
    /// Zero when the page shows no reference price.
    pub old_price: Price,
    pub image_ref: String,
    pub description: String,
    pub category: Option<CategorySlug>,
    /// Price shown in the card text, which the sort control reads first.
    pub display_price: Option<Price>,
    /// Explicit recency rank. A present but non-numeric rank is zero.
    pub newest: Option<Decimal>,
}

impl CatalogEntry {
    /// Key used to collapse duplicate cards: the ID if present, else the name,
    /// trimmed and lowercased.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.id
            .as_ref()
            .map_or(self.name.as_str(), ProductId::as_str)
            .trim()
            .to_lowercase()
    }

    /// Identifier used in product links: the ID if present, else the name.
    #[must_use]
    pub fn link_id(&self) -> &str {
        self.id.as_ref().map_or(self.name.as_str(), ProductId::as_str)
    }

    /// Whether the product has a reference price above its current price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.old_price > self.price
    }
}

impl SortKeys for CatalogEntry {
    /// The price the shopper sees on the card, else the `price` attribute.
    fn price_key(&self) -> Price {
        self.display_price.unwrap_or(self.price)
    }

    /// The explicit `newest` rank, else a numeric ID, else 0.
    fn recency_key(&self) -> Decimal {
        self.newest
            .or_else(|| {
                self.id
                    .as_ref()
                    .and_then(ProductId::numeric_value)
                    .map(Decimal::from)
            })
            .unwrap_or(Decimal::ZERO)
    }
}

/// Link to the product detail page for an entry.
#[must_use]
pub fn product_href(entry: &CatalogEntry) -> String {
    format!(
        "{PRODUCT_PAGE}?id={}",
        urlencoding::encode(entry.link_id())
    )
}

// =============================================================================
// Normalization
// =============================================================================

/// Trim a field and drop it if nothing is left.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse an attribute price, treating anything unusable as absent.
fn parse_price(value: Option<&String>) -> Option<Price> {
    let raw = non_blank(value)?;
    match Price::parse(raw) {
        Ok(price) => Some(price),
        Err(tech_shop_core::PriceError::Negative) => Some(Price::ZERO),
        Err(_) => None,
    }
}

/// Extract the amount from rendered price text such as `"Now ₹1,299 only"`.
#[must_use]
pub fn parse_display_price(text: &str) -> Option<Price> {
    let digits = DISPLAY_PRICE_RE.captures(text)?.get(1)?.as_str();
    Price::parse(digits).ok()
}

/// Normalize one attribute record.
///
/// # Errors
///
/// Returns [`StorefrontError::Validation`] if the record has no non-blank name.
pub fn normalize(raw: &RawAttributes) -> Result<CatalogEntry, StorefrontError> {
    normalize_with_placeholder(raw, DEFAULT_PLACEHOLDER_IMAGE)
}

/// Normalize one attribute record with a custom placeholder image.
///
/// # Errors
///
/// Returns [`StorefrontError::Validation`] if the record has no non-blank name.
pub fn normalize_with_placeholder(
    raw: &RawAttributes,
    placeholder: &str,
) -> Result<CatalogEntry, StorefrontError> {
    let name = non_blank(raw.name.as_ref()).ok_or_else(|| {
        StorefrontError::Validation(format!(
            "product record {:?} has no name",
            raw.id.as_deref().unwrap_or_default()
        ))
    })?;

    let display_price = raw.price_text.as_deref().and_then(parse_display_price);
    let price = parse_price(raw.price.as_ref())
        .or(display_price)
        .unwrap_or(Price::ZERO);

    Ok(CatalogEntry {
        id: non_blank(raw.id.as_ref()).map(ProductId::from),
        name: name.to_string(),
        price,
        old_price: parse_price(raw.old_price.as_ref()).unwrap_or(Price::ZERO),
        image_ref: non_blank(raw.image_ref.as_ref())
            .unwrap_or(placeholder)
            .to_string(),
        description: non_blank(raw.description.as_ref())
            .unwrap_or_default()
            .to_string(),
        category: non_blank(raw.category.as_ref()).map(CategorySlug::normalized),
        display_price,
        newest: non_blank(raw.newest.as_ref())
            .map(|rank| Decimal::from_str(rank).unwrap_or(Decimal::ZERO)),
    })
}

/// Normalize and deduplicate a page's worth of records.
///
/// Records without a name are dropped first; of the rest, the first record
/// for each [dedup key](CatalogEntry::dedup_key) wins and survivors keep
/// their page order.
#[instrument(skip_all, fields(records = raw.len()))]
pub fn scan(raw: &[RawAttributes]) -> Vec<CatalogEntry> {
    scan_with_placeholder(raw, DEFAULT_PLACEHOLDER_IMAGE)
}

/// [`scan`] with a custom placeholder image.
pub fn scan_with_placeholder(raw: &[RawAttributes], placeholder: &str) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    let entries: Vec<CatalogEntry> = raw
        .iter()
        .filter_map(|record| {
            normalize_with_placeholder(record, placeholder)
                .inspect_err(error::report)
                .ok()
        })
        .filter(|entry| seen.insert(entry.dedup_key()))
        .collect();

    tracing::debug!(entries = entries.len(), "Catalog scanned");
    entries
}

/// Entries shown under a category filter button.
///
/// `"all"` (any case) shows everything; otherwise only entries in the
/// matching category are kept, in order.
#[must_use]
pub fn filter_by_category<'a>(entries: &'a [CatalogEntry], category: &str) -> Vec<&'a CatalogEntry> {
    let wanted = CategorySlug::normalized(category);
    if wanted.as_str() == ALL_CATEGORIES {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| entry.category.as_ref() == Some(&wanted))
        .collect()
}
