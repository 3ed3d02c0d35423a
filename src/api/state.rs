//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::cache::ReadThroughCache;
use crate::config::{Collections, Config};
use crate::identity::IdentityProvider;
use crate::models::CatalogKind;
use crate::services::{CatalogService, OrderService, UserService};
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// Services are cheap to clone; each holds `Arc` handles to the store,
/// the identity provider and the catalog cache built at startup.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub cache: Arc<ReadThroughCache>,
    pub fruits: CatalogService,
    pub variants: CatalogService,
    pub orders: OrderService,
    pub users: UserService,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Creates a new AppState with a fresh wall-clock cache.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        collections: &Collections,
    ) -> Self {
        Self::with_cache(store, identity, Arc::new(ReadThroughCache::new()), collections)
    }

    /// Creates a new AppState around an existing cache.
    pub fn with_cache(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        cache: Arc<ReadThroughCache>,
        collections: &Collections,
    ) -> Self {
        Self {
            fruits: CatalogService::new(
                CatalogKind::Fruit,
                collections.fruits.as_str(),
                Arc::clone(&store),
                Arc::clone(&cache),
            ),
            variants: CatalogService::new(
                CatalogKind::Variant,
                collections.variants.as_str(),
                Arc::clone(&store),
                Arc::clone(&cache),
            ),
            orders: OrderService::new(
                collections.orders.as_str(),
                collections.fruits.as_str(),
                collections.variants.as_str(),
                Arc::clone(&store),
            ),
            users: UserService::new(collections.users.as_str(), store, Arc::clone(&identity)),
            identity,
            cache,
            allowed_origins: Vec::new(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Picks the collections for the configured mode and carries over the
    /// CORS origins.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let collections = Collections::for_mode(config.production);
        Self {
            allowed_origins: config.allowed_origins.clone(),
            ..Self::new(store, identity, &collections)
        }
    }
}
