//! Orders and the filter used to list them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp;
use crate::store::{Document, Predicate, StoreResult};

/// Field names of an order document.
pub mod fields {
    pub const TYPE: &str = "type";
    pub const STATUS: &str = "status";
    pub const USER_ID: &str = "userId";
    pub const FRUIT_ID: &str = "fruitId";
    pub const VARIANT_ID: &str = "variantId";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

// == Order Type ==
/// Whether the order looks for stock or offers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Searching,
    Available,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Searching => "searching",
            OrderType::Available => "available",
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "searching" => Ok(OrderType::Searching),
            "available" => Ok(OrderType::Available),
            other => Err(format!("unknown order type '{}'", other)),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Order Status ==
/// Lifecycle state of an order. Orders without a stored status are pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

// == Sort Option ==
/// Ordering applied to order listings by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    /// Most recently created first
    Newest,
    /// Oldest first
    Oldest,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            other => Err(format!("unknown sort option '{}'", other)),
        }
    }
}

// == Order ==
/// An order as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub fruit_id: String,
    pub variant_id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderFields {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    fruit_id: String,
    #[serde(default)]
    variant_id: String,
    #[serde(rename = "type")]
    order_type: OrderType,
    #[serde(default)]
    status: Option<OrderStatus>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
}

impl Order {
    /// Builds an order from its stored document. Unreadable timestamps are
    /// kept as `None` rather than rejected.
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        let fields: OrderFields = doc.decode()?;
        Ok(Self {
            id: doc.id.clone(),
            user_id: fields.user_id,
            fruit_id: fields.fruit_id,
            variant_id: fields.variant_id,
            order_type: fields.order_type,
            status: fields.status.unwrap_or_default(),
            created_at: timestamp::parse(fields.created_at.as_ref()),
            updated_at: timestamp::parse(fields.updated_at.as_ref()),
        })
    }

    /// Creation time in unix milliseconds; missing timestamps count as epoch 0.
    pub fn created_at_ms(&self) -> i64 {
        self.created_at.map_or(0, |at| at.timestamp_millis())
    }

    /// Returns true if `uid` created this order.
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.user_id.as_deref() == Some(uid)
    }
}

// == Query Filter ==
/// Per-request order listing filter. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub order_type: Option<OrderType>,
    pub user_id: Option<String>,
    pub fruit_id: Option<String>,
    pub variant_id: Option<String>,
    pub sort: Option<SortOption>,
}

impl QueryFilter {
    /// Equality predicates for every field present, in a fixed order.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(4);
        if let Some(order_type) = self.order_type {
            predicates.push(Predicate::equals(fields::TYPE, order_type.as_str()));
        }
        if let Some(user_id) = &self.user_id {
            predicates.push(Predicate::equals(fields::USER_ID, user_id.as_str()));
        }
        if let Some(fruit_id) = &self.fruit_id {
            predicates.push(Predicate::equals(fields::FRUIT_ID, fruit_id.as_str()));
        }
        if let Some(variant_id) = &self.variant_id {
            predicates.push(Predicate::equals(fields::VARIANT_ID, variant_id.as_str()));
        }
        predicates
    }
}
