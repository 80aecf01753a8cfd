//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing identifiers from different entity types. Shop pages
//! carry identifiers as free-form strings (`data-id="42"`, `data-id="pixel-8"`),
//! so the wrappers are string-backed.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use tech_shop_core::define_id;
/// define_id!(SkuId);
/// define_id!(BundleId);
///
/// let sku = SkuId::new("sku-1");
/// let bundle = BundleId::new("sku-1");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = bundle;
/// assert_eq!(sku.as_str(), bundle.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategorySlug);

impl ProductId {
    /// Derive an ID from a product name.
    ///
    /// Buttons rendered without a `data-id` are identified by a 31-bit rolling
    /// hash of their name (`h = h * 31 + unit` over UTF-16 code units, wrapped
    /// to `i32`, absolute value). The same name always maps to the same ID, so
    /// repeated adds still merge into one cart line.
    #[must_use]
    pub fn from_name_hash(name: &str) -> Self {
        let hash = name.encode_utf16().fold(0_i32, |h, unit| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
        });
        Self(i64::from(hash).abs().to_string())
    }

    /// The ID interpreted as a number, if it is one.
    ///
    /// Product grids use numeric IDs as an implicit "newest first" ordering.
    #[must_use]
    pub fn numeric_value(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl CategorySlug {
    /// Normalize a category label (`" Phones "` → `"phones"`).
    #[must_use]
    pub fn normalized(label: &str) -> Self {
        Self(label.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_hash_is_stable() {
        let a = ProductId::from_name_hash("Phone Case");
        let b = ProductId::from_name_hash("Phone Case");
        assert_eq!(a, b);
        assert_ne!(a, ProductId::from_name_hash("phone case"));
    }

    #[test]
    fn test_name_hash_known_values() {
        assert_eq!(ProductId::from_name_hash("").as_str(), "0");
        // 'a' = 97
        assert_eq!(ProductId::from_name_hash("a").as_str(), "97");
        // 97 * 31 + 98
        assert_eq!(ProductId::from_name_hash("ab").as_str(), "3105");
    }

    #[test]
    fn test_name_hash_is_non_negative() {
        let id = ProductId::from_name_hash("a fairly long product name that overflows i32");
        assert!(!id.as_str().starts_with('-'));
        assert!(id.numeric_value().is_some());
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(ProductId::new("42").numeric_value(), Some(42));
        assert_eq!(ProductId::new(" 7 ").numeric_value(), Some(7));
        assert_eq!(ProductId::new("pixel-8").numeric_value(), None);
    }

    #[test]
    fn test_category_normalized() {
        assert_eq!(CategorySlug::normalized("  Phones ").as_str(), "phones");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = ProductId::new("sku-9");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"sku-9\"");
        let back: ProductId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
