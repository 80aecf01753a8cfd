//! Tech-Shop Core - Shared types library.
//!
//! This crate provides common types used across the Tech-Shop components:
//! - `storefront` - Cart, catalog, search and sort engine for the shop pages
//! - `integration-tests` - Cross-crate behaviour tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
