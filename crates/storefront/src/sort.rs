//! Stable reordering of product and cart lists.
//!
//! Every sort here is stable: items with equal keys keep their relative
//! order, so "price: low to high" over two ₹5 products never swaps them.
//! Items are only moved, never modified.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tech_shop_core::Price;

/// Direction of a keyed sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Value of the sort control on product grids and the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Leave the rendered order alone.
    #[default]
    Default,
    /// Highest recency key first.
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    /// The control value for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized sort control value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode: {0}")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(Self::Default),
            "newest" => Ok(Self::Newest),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// Keys the named sort modes read from an item.
pub trait SortKeys {
    /// Unit price used by the price modes.
    fn price_key(&self) -> Price;

    /// Larger means newer. Items without a notion of recency return 0.
    fn recency_key(&self) -> Decimal {
        Decimal::ZERO
    }
}

impl<T: SortKeys + ?Sized> SortKeys for &T {
    fn price_key(&self) -> Price {
        (**self).price_key()
    }

    fn recency_key(&self) -> Decimal {
        (**self).recency_key()
    }
}

/// Stable in-place sort by a caller-supplied key.
pub fn sort_in_place<T, K, F>(items: &mut [T], order: SortOrder, mut key_of: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    items.sort_by(|a, b| order.apply(key_of(a).cmp(&key_of(b))));
}

/// Stable sort by a caller-supplied key, returning the reordered list.
#[must_use]
pub fn sort<T, K, F>(mut items: Vec<T>, order: SortOrder, key_of: F) -> Vec<T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    sort_in_place(&mut items, order, key_of);
    items
}

/// Reorder items according to a sort control value.
pub fn apply<T: SortKeys>(items: &mut [T], mode: SortMode) {
    match mode {
        SortMode::Default => {}
        SortMode::Newest => sort_in_place(items, SortOrder::Desc, T::recency_key),
        SortMode::PriceAsc => sort_in_place(items, SortOrder::Asc, T::price_key),
        SortMode::PriceDesc => sort_in_place(items, SortOrder::Desc, T::price_key),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        label: &'static str,
        price: u64,
        newest: i64,
    }

    impl SortKeys for Item {
        fn price_key(&self) -> Price {
            Price::from_rupees(self.price)
        }

        fn recency_key(&self) -> Decimal {
            Decimal::from(self.newest)
        }
    }

    fn item(label: &'static str, price: u64, newest: i64) -> Item {
        Item {
            label,
            price,
            newest,
        }
    }

    fn labels(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.label).collect()
    }

    #[test]
    fn test_asc_is_stable() {
        let items = vec![item("a", 5, 0), item("b", 5, 0), item("c", 1, 0)];
        let sorted = sort(items, SortOrder::Asc, |i| i.price);
        assert_eq!(labels(&sorted), ["c", "a", "b"]);
    }

    #[test]
    fn test_desc_is_stable() {
        let items = vec![item("a", 1, 0), item("b", 5, 0), item("c", 5, 0)];
        let sorted = sort(items, SortOrder::Desc, |i| i.price);
        assert_eq!(labels(&sorted), ["b", "c", "a"]);
    }

    #[test]
    fn test_items_not_modified() {
        let items = vec![item("a", 3, 1), item("b", 2, 2)];
        let sorted = sort(items.clone(), SortOrder::Asc, |i| i.price);
        assert_eq!(sorted, vec![items[1].clone(), items[0].clone()]);
    }

    #[test]
    fn test_apply_modes() {
        let base = vec![item("old", 300, 1), item("new", 100, 9), item("mid", 200, 5)];

        let mut items = base.clone();
        apply(&mut items, SortMode::Default);
        assert_eq!(labels(&items), ["old", "new", "mid"]);

        let mut items = base.clone();
        apply(&mut items, SortMode::Newest);
        assert_eq!(labels(&items), ["new", "mid", "old"]);

        let mut items = base.clone();
        apply(&mut items, SortMode::PriceAsc);
        assert_eq!(labels(&items), ["new", "mid", "old"]);

        let mut items = base;
        apply(&mut items, SortMode::PriceDesc);
        assert_eq!(labels(&items), ["old", "mid", "new"]);
    }

    #[test]
    fn test_newest_ties_keep_order() {
        let mut items = vec![item("a", 1, 0), item("b", 2, 0), item("c", 3, 4)];
        apply(&mut items, SortMode::Newest);
        assert_eq!(labels(&items), ["c", "a", "b"]);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("price-asc".parse::<SortMode>().unwrap(), SortMode::PriceAsc);
        assert_eq!(" newest ".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert!("cheapest".parse::<SortMode>().is_err());
        assert_eq!(SortMode::PriceDesc.to_string(), "price-desc");
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&SortMode::PriceDesc).unwrap();
        assert_eq!(json, "\"price-desc\"");
        let mode: SortMode = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(mode, SortMode::Newest);
    }
}
