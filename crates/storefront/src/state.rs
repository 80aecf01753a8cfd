//! Per-session storefront state.

use tracing::instrument;

use crate::cart::{CartItemInput, CartStore, Totals};
use crate::catalog::{self, CatalogEntry, RawAttributes};
use crate::config::StorefrontConfig;
use crate::search::{Ranker, Suggestions};
use crate::sort::{self, SortMode};
use crate::storage::{FileStorage, Storage};

/// Everything one shopper session works with: configuration, the product
/// catalog scanned from the current page, the suggestion ranker and the cart.
///
/// The catalog is rebuilt by [`Storefront::index`] whenever the page changes;
/// the cart is read once from storage when the session starts.
#[derive(Debug)]
pub struct Storefront<S: Storage> {
    config: StorefrontConfig,
    ranker: Ranker,
    catalog: Vec<CatalogEntry>,
    cart: CartStore<S>,
}

impl<S: Storage> Storefront<S> {
    /// Start a session over `storage`.
    pub fn new(config: StorefrontConfig, storage: S) -> Self {
        let cart = CartStore::open_with_config(storage, &config);
        Self {
            ranker: Ranker::new(config.search),
            catalog: Vec::new(),
            cart,
            config,
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// The current catalog, in page order.
    #[must_use]
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// Replace the catalog with the products found on a page. Returns the
    /// number of entries kept.
    #[instrument(skip_all, fields(records = raw.len()))]
    pub fn index(&mut self, raw: &[RawAttributes]) -> usize {
        self.catalog = catalog::scan_with_placeholder(raw, &self.config.placeholder_image);
        tracing::info!(entries = self.catalog.len(), "Indexed catalog");
        self.catalog.len()
    }

    /// Suggestions for the search box.
    #[must_use]
    pub fn suggest(&self, query: &str) -> Suggestions<'_> {
        self.ranker.rank(query, &self.catalog)
    }

    /// A category page: entries in `category`, reordered by `mode`.
    #[must_use]
    pub fn browse(&self, category: &str, mode: SortMode) -> Vec<&CatalogEntry> {
        let mut entries = catalog::filter_by_category(&self.catalog, category);
        sort::apply(&mut entries, mode);
        entries
    }

    /// Look up a catalog entry by the identifier used in its product link.
    #[must_use]
    pub fn product(&self, link_id: &str) -> Option<&CatalogEntry> {
        self.catalog.iter().find(|entry| entry.link_id() == link_id)
    }

    /// Add a catalog product to the cart by its link identifier.
    ///
    /// Returns `None` if no such product is in the catalog.
    pub fn add_product(&mut self, link_id: &str) -> Option<Totals> {
        let entry = self.catalog.iter().find(|entry| entry.link_id() == link_id)?;
        Some(self.cart.add_item(entry))
    }

    /// Add whatever an add-to-cart button carries.
    pub fn add_to_cart(&mut self, raw: &RawAttributes) -> Totals {
        self.cart.add_item(CartItemInput::from(raw))
    }
}

impl Storefront<FileStorage> {
    /// Start a session persisting to the configured storage directory.
    #[must_use]
    pub fn with_file_storage(config: StorefrontConfig) -> Self {
        let storage = FileStorage::new(config.storage_dir.clone());
        Self::new(config, storage)
    }
}
