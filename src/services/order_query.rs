//! Order Query Engine
//!
//! Turns a [`QueryFilter`] into a conjunctive store query and orders the
//! result by creation time in process.

use std::sync::Arc;

use tracing::debug;

use crate::models::{Order, QueryFilter, SortOption};
use crate::store::{DocumentStore, StoreResult};

#[derive(Clone)]
pub struct OrderQueryEngine {
    collection: String,
    store: Arc<dyn DocumentStore>,
}

impl OrderQueryEngine {
    pub fn new(collection: impl Into<String>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: collection.into(),
            store,
        }
    }

    /// Lists the orders matching every predicate present in `filter`.
    ///
    /// Without a sort option the store's order is kept as is.
    pub async fn list(&self, filter: &QueryFilter) -> StoreResult<Vec<Order>> {
        let predicates = filter.predicates();
        let docs = self.store.query(&self.collection, &predicates).await?;

        let mut orders = docs
            .iter()
            .map(Order::from_document)
            .collect::<StoreResult<Vec<_>>>()?;

        if let Some(sort) = filter.sort {
            sort_orders(&mut orders, sort);
        }

        debug!(
            predicates = predicates.len(),
            sort = ?filter.sort,
            orders = orders.len(),
            "orders listed"
        );
        Ok(orders)
    }
}

/// Stable sort by creation time. Orders with equal timestamps keep their
/// relative order; a missing timestamp counts as epoch 0.
pub fn sort_orders(orders: &mut [Order], sort: SortOption) {
    match sort {
        SortOption::Newest => orders.sort_by(|a, b| b.created_at_ms().cmp(&a.created_at_ms())),
        SortOption::Oldest => orders.sort_by_key(Order::created_at_ms),
    }
}
