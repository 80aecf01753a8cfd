//! Integration tests for the Tech-Shop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tech-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_sessions` - persistence and cross-session behavior of the cart
//! - `storefront_flow` - catalog, search, sorting and checkout totals together
//!
//! This library only holds fixtures shared by the test files.

use tech_shop_storefront::catalog::RawAttributes;

/// One product card as the page would report it.
#[must_use]
pub fn card(id: &str, name: &str, price: &str, old_price: &str, category: &str) -> RawAttributes {
    RawAttributes {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        price: Some(price.to_string()),
        old_price: Some(old_price.to_string()),
        category: Some(category.to_string()),
        ..Default::default()
    }
}

/// Product cards from a home page, including a duplicate featured card and a
/// broken card without a name.
#[must_use]
pub fn home_page() -> Vec<RawAttributes> {
    vec![
        card("101", "iPhone 15", "79999", "84999", "phones"),
        card("102", "Phone Case", "499", "799", "accessories"),
        card("103", "Laptop Pro 14", "129999", "139999", "computers"),
        card("104", "USB-C Cable", "299", "299", "accessories"),
        card("105", "Wireless Headphones", "4999", "6999", "audio"),
        card("102", "Phone Case", "499", "799", "accessories"),
        RawAttributes {
            id: Some("999".to_string()),
            name: Some("   ".to_string()),
            ..Default::default()
        },
    ]
}
