//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::store::{Catalog, CatalogError, CustomerDirectory, DirectoryError};

/// Error loading the stores named by the configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("customers: {0}")]
    Customers(#[from] DirectoryError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog and customer
/// directory are loaded once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    customers: CustomerDirectory,
}

impl AppState {
    /// Create a new application state from already loaded stores.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, customers: CustomerDirectory) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                customers,
            }),
        }
    }

    /// Load the catalog and customers named by `config`.
    ///
    /// Falls back to the built-in data for any path that is not set.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured file cannot be read or parsed.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };
        let customers = match &config.customers_path {
            Some(path) => CustomerDirectory::load(path)?,
            None => CustomerDirectory::builtin()?,
        };

        tracing::info!(
            melons = catalog.len(),
            customers = customers.len(),
            "Loaded storefront data"
        );

        Ok(Self::new(config, catalog, customers))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the melon catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the customer directory.
    #[must_use]
    pub fn customers(&self) -> &CustomerDirectory {
        &self.inner.customers
    }
}
