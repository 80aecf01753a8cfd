//! Unified error handling with Sentry integration.
//!
//! None of these errors ever reach the presentation layer: every storefront
//! operation recovers locally (empty cart, dropped record, no-op). They exist
//! so failures can be logged, captured to Sentry and inspected in tests.

use thiserror::Error;

use crate::storage::StorageError;

/// Storefront error taxonomy.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The persisted cart could not be decoded. Recovered as an empty cart.
    #[error("Storage decode error: {0}")]
    StorageDecode(#[from] serde_json::Error),

    /// The storage backend failed to read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A raw product record has no usable name. The record is dropped.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A cart operation targeted a line that does not exist. Treated as a no-op.
    #[error("No cart line matches {0}")]
    LookupMiss(String),
}

impl StorefrontError {
    /// Whether this error indicates broken persistence rather than bad input.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageDecode(_) | Self::Storage(_))
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Record a recovered error for diagnostics.
///
/// Storage failures are captured to Sentry and logged at WARN; input problems
/// are only logged at DEBUG since they are expected on real pages.
pub fn report(err: &StorefrontError) {
    if err.is_storage_failure() {
        let event_id = sentry::capture_error(err);
        tracing::warn!(
            error = %err,
            sentry_event_id = %event_id,
            "Recovered storefront error"
        );
    } else {
        tracing::debug!(error = %err, "Ignored storefront input");
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")][..]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
