//! Order Service
//!
//! Order creation with ordered validation, plus lookup, listing, status
//! updates and deletion.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::OrderQueryEngine;
use crate::models::order::fields;
use crate::models::{timestamp, Order, OrderStatus, OrderType, QueryFilter};
use crate::store::{DocumentStore, Fields, StoreResult};

// == Rejection ==
/// Why an order was not created. Checks run in declaration order and the
/// first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    FruitIdRequired,
    VariantIdRequired,
    InvalidType,
    FruitNotFound,
    VariantNotFound,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::FruitIdRequired => "fruitId required",
            Rejection::VariantIdRequired => "variantId required",
            Rejection::InvalidType => "invalid type",
            Rejection::FruitNotFound => "Fruit not found",
            Rejection::VariantNotFound => "Variant not found",
        }
    }

    /// True when the input was well formed but referenced a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Rejection::FruitNotFound | Rejection::VariantNotFound)
    }
}

// == Create Outcome ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOrderOutcome {
    Created { order_id: String },
    Rejected(Rejection),
}

impl CreateOrderOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CreateOrderOutcome::Created { .. })
    }

    pub fn message(&self) -> &'static str {
        match self {
            CreateOrderOutcome::Created { .. } => "Order created successfully",
            CreateOrderOutcome::Rejected(rejection) => rejection.message(),
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            CreateOrderOutcome::Created { order_id } => Some(order_id),
            CreateOrderOutcome::Rejected(_) => None,
        }
    }
}

// == Order Service ==
#[derive(Clone)]
pub struct OrderService {
    collection: String,
    fruits_collection: String,
    variants_collection: String,
    store: Arc<dyn DocumentStore>,
    query: OrderQueryEngine,
}

impl OrderService {
    pub fn new(
        collection: impl Into<String>,
        fruits_collection: impl Into<String>,
        variants_collection: impl Into<String>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let collection = collection.into();
        Self {
            query: OrderQueryEngine::new(collection.clone(), Arc::clone(&store)),
            collection,
            fruits_collection: fruits_collection.into(),
            variants_collection: variants_collection.into(),
            store,
        }
    }

    // == Create ==
    /// Validates and inserts a new order.
    ///
    /// Input checks run before any store access. The fruit and variant
    /// existence checks and the insert are separate round-trips; nothing
    /// guards against a reference disappearing in between.
    pub async fn create(
        &self,
        order_type: &str,
        fruit_id: &str,
        variant_id: &str,
        user_id: Option<&str>,
    ) -> StoreResult<CreateOrderOutcome> {
        let fruit_id = fruit_id.trim();
        if fruit_id.is_empty() {
            return Ok(CreateOrderOutcome::Rejected(Rejection::FruitIdRequired));
        }
        let variant_id = variant_id.trim();
        if variant_id.is_empty() {
            return Ok(CreateOrderOutcome::Rejected(Rejection::VariantIdRequired));
        }
        let Ok(order_type) = order_type.parse::<OrderType>() else {
            return Ok(CreateOrderOutcome::Rejected(Rejection::InvalidType));
        };

        if self
            .store
            .get_document(&self.fruits_collection, fruit_id)
            .await?
            .is_none()
        {
            debug!(fruit_id, "order rejected, fruit not found");
            return Ok(CreateOrderOutcome::Rejected(Rejection::FruitNotFound));
        }
        if self
            .store
            .get_document(&self.variants_collection, variant_id)
            .await?
            .is_none()
        {
            debug!(variant_id, "order rejected, variant not found");
            return Ok(CreateOrderOutcome::Rejected(Rejection::VariantNotFound));
        }

        let now = timestamp::now_value();
        let mut doc = Fields::new();
        doc.insert(fields::TYPE.into(), Value::from(order_type.as_str()));
        doc.insert(fields::FRUIT_ID.into(), Value::from(fruit_id));
        doc.insert(fields::VARIANT_ID.into(), Value::from(variant_id));
        if let Some(user_id) = user_id {
            doc.insert(fields::USER_ID.into(), Value::from(user_id));
        }
        doc.insert(fields::CREATED_AT.into(), now.clone());
        doc.insert(fields::UPDATED_AT.into(), now);

        let order_id = self.store.insert_document(&self.collection, doc).await?;
        info!(order_id = order_id.as_str(), %order_type, fruit_id, variant_id, "order created");
        Ok(CreateOrderOutcome::Created { order_id })
    }

    // == List ==
    pub async fn list(&self, filter: &QueryFilter) -> StoreResult<Vec<Order>> {
        self.query.list(filter).await
    }

    // == Get ==
    pub async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        self.store
            .get_document(&self.collection, id)
            .await?
            .map(|doc| Order::from_document(&doc))
            .transpose()
    }

    // == Update Status ==
    /// Sets the status of an existing order. `Ok(None)` if it does not exist.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> StoreResult<Option<Order>> {
        if self.get(id).await?.is_none() {
            return Ok(None);
        }

        let mut doc = Fields::new();
        doc.insert(fields::STATUS.into(), Value::from(status.as_str()));
        doc.insert(fields::UPDATED_AT.into(), timestamp::now_value());
        self.store.update_document(&self.collection, id, doc).await?;

        info!(order_id = id, status = status.as_str(), "order status updated");
        self.get(id).await
    }

    // == Delete ==
    /// Removes an order. Returns false if it did not exist.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let deleted = self.store.delete_document(&self.collection, id).await?;
        if deleted {
            info!(order_id = id, "order deleted");
        }
        Ok(deleted)
    }
}
