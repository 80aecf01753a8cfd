//! Tech-Shop storefront core.
//!
//! The state behind the shop's pages: a persisted shopping cart, a product
//! catalog scanned from page attributes, search-box suggestions and the sort
//! control. Rendering is left to the caller; this crate only computes what
//! to show.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = StorefrontConfig::from_env()?;
//! let _telemetry = telemetry::init(&config);
//!
//! let mut shop = Storefront::new(config, MemoryStorage::new());
//! shop.index(&records);
//! let suggestions = shop.suggest("phone");
//! let totals = shop.add_product("42");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod search;
pub mod sort;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use state::Storefront;
