//! Session-scoped shopping cart.
//!
//! A [`CartStore`] reads the persisted cart once when it is opened and from
//! then on owns the authoritative list for its session. Every mutation writes
//! the whole list back under the cart key and tells registered observers the
//! new item count (the header badge).
//!
//! Sessions do not see each other's writes. Two stores opened over the same
//! storage each keep what they read at open time, and whichever persists last
//! wins. Call [`CartStore::reload`] to resynchronize explicitly.

mod codec;
mod line;

use std::fmt;

use tracing::instrument;
use uuid::Uuid;

use crate::config::{DEFAULT_PLACEHOLDER_IMAGE, StorefrontConfig};
use crate::error::{self, StorefrontError};
use crate::sort::{self, SortMode};
use crate::storage::Storage;

pub use codec::{decode, encode};
pub use line::{CartItemInput, CartLineItem, FALLBACK_NAME, LineRef, Totals};

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type CountObserver = Box<dyn FnMut(u32)>;

/// The cart for one shopper session.
pub struct CartStore<S: Storage> {
    storage: S,
    key: String,
    placeholder: String,
    session_id: Uuid,
    items: Vec<CartLineItem>,
    observers: Vec<(SubscriptionId, CountObserver)>,
    next_subscription: u64,
    last_error: Option<StorefrontError>,
}

impl<S: Storage> CartStore<S> {
    /// Open the cart stored under `key`.
    ///
    /// Unreadable or malformed data opens an empty cart; the failure is
    /// reported and kept in [`CartStore::last_error`].
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        Self::open_inner(storage, key.into(), DEFAULT_PLACEHOLDER_IMAGE.to_string())
    }

    /// Open the cart using the configured key and placeholder image.
    pub fn open_with_config(storage: S, config: &StorefrontConfig) -> Self {
        Self::open_inner(
            storage,
            config.cart_key.clone(),
            config.placeholder_image.clone(),
        )
    }

    fn open_inner(storage: S, key: String, placeholder: String) -> Self {
        let mut store = Self {
            storage,
            key,
            placeholder,
            session_id: Uuid::new_v4(),
            items: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
            last_error: None,
        };
        store.reload();
        tracing::debug!(
            session_id = %store.session_id,
            key = %store.key,
            lines = store.items.len(),
            "Opened cart session"
        );
        store
    }

    /// Replace the in-memory cart with what is currently persisted.
    ///
    /// Observers are not notified.
    #[instrument(skip(self), fields(session_id = %self.session_id, key = %self.key))]
    pub fn reload(&mut self) {
        let loaded = self
            .storage
            .read(&self.key)
            .map_err(StorefrontError::from)
            .and_then(|raw| decode(raw.as_deref(), &self.placeholder));

        match loaded {
            Ok(items) => self.items = items,
            Err(err) => {
                self.items.clear();
                self.record(err);
            }
        }
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Storage key this session persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Most recent recovered failure, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&StorefrontError> {
        self.last_error.as_ref()
    }

    /// Register a callback invoked with the item count after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(u32) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Add one unit of a product, creating the line on first add.
    #[instrument(skip_all, fields(session_id = %self.session_id))]
    pub fn add_item(&mut self, input: impl Into<CartItemInput>) -> Totals {
        let input = input.into();
        error::add_breadcrumb(
            "cart",
            "Added item",
            Some(&[("product_id", input.id.as_str())][..]),
        );

        if let Some(line) = self.items.iter_mut().find(|line| line.id == input.id) {
            line.qty = line.qty.saturating_add(1);
            tracing::debug!(product_id = %line.id, qty = line.qty, "Incremented cart line");
        } else {
            tracing::debug!(product_id = %input.id, "Appended cart line");
            self.items.push(input.into_line(&self.placeholder));
        }

        self.commit()
    }

    /// Change a line's quantity by `delta`. A result of zero or less removes
    /// the line.
    #[instrument(skip(self, line), fields(session_id = %self.session_id))]
    pub fn adjust_qty(&mut self, line: impl Into<LineRef>, delta: i64) -> Totals {
        let line = line.into();
        let Some(index) = self.position(&line) else {
            return self.miss(&line);
        };

        let qty = i64::from(self.items[index].qty).saturating_add(delta);
        if qty <= 0 {
            let removed = self.items.remove(index);
            tracing::debug!(product_id = %removed.id, "Quantity reached zero, removed line");
        } else {
            self.items[index].qty = u32::try_from(qty).unwrap_or(u32::MAX);
        }

        self.commit()
    }

    /// Delete a line regardless of its quantity.
    #[instrument(skip(self, line), fields(session_id = %self.session_id))]
    pub fn remove_item(&mut self, line: impl Into<LineRef>) -> Totals {
        let line = line.into();
        let Some(index) = self.position(&line) else {
            return self.miss(&line);
        };

        let removed = self.items.remove(index);
        error::add_breadcrumb(
            "cart",
            "Removed item",
            Some(&[("product_id", removed.id.as_str())][..]),
        );
        self.commit()
    }

    /// Reorder the lines by price and persist the new order.
    ///
    /// Modes without a price direction keep the current order but still
    /// persist it.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn sort_by(&mut self, mode: SortMode) {
        sort::apply(&mut self.items, mode);
        self.commit();
    }

    /// Empty the cart and delete its persisted value.
    ///
    /// Observers are notified with a count of zero. A failed delete keeps the
    /// cart empty in memory.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn clear(&mut self) -> Totals {
        self.items.clear();
        error::add_breadcrumb("cart", "Cleared cart", None);

        if let Err(err) = self.storage.remove(&self.key) {
            self.record(err.into());
        }
        self.notify()
    }

    /// Totals over the current lines.
    #[must_use]
    pub fn compute_totals(&self) -> Totals {
        Totals::from_items(&self.items)
    }

    fn position(&self, line: &LineRef) -> Option<usize> {
        match line {
            LineRef::Index(i) => (*i < self.items.len()).then_some(*i),
            LineRef::Id(id) => self.items.iter().position(|item| &item.id == id),
        }
    }

    fn miss(&mut self, line: &LineRef) -> Totals {
        self.record(StorefrontError::LookupMiss(line.to_string()));
        self.compute_totals()
    }

    /// Persist, then notify observers. A failed write keeps the in-memory cart.
    fn commit(&mut self) -> Totals {
        let written = encode(&self.items)
            .and_then(|raw| Ok(self.storage.write(&self.key, &raw)?));
        if let Err(err) = written {
            self.record(err);
        }
        self.notify()
    }

    fn notify(&mut self) -> Totals {
        let totals = self.compute_totals();
        for (_, observer) in &mut self.observers {
            observer(totals.count);
        }
        totals
    }

    fn record(&mut self, err: StorefrontError) {
        error::report(&err);
        self.last_error = Some(err);
    }
}

impl<S: Storage> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("session_id", &self.session_id)
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
