//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming query strings and request bodies.
//! Fields are kept as plain strings so that validation messages come from
//! the gateway rather than from the JSON extractor.

use serde::Deserialize;

use super::order::{OrderStatus, OrderType, QueryFilter, SortOption};

/// Query string for `GET /fruits/search` and `GET /variants/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub id: Option<String>,
}

impl SearchQuery {
    /// Returns the identifier to look up, or an error message if it is missing.
    pub fn validate(&self) -> Result<&str, String> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err("Search query is required".to_string()),
        }
    }
}

/// Query string for `GET /orders`
///
/// `option` carries the sort order; `sortOption` is accepted as an alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
    #[serde(default, alias = "sortOption")]
    pub option: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub fruit_id: Option<String>,
    #[serde(default)]
    pub variant_id: Option<String>,
}

impl OrderListQuery {
    /// Validates the query and converts it into a listing filter.
    ///
    /// The listing endpoint requires `type`; empty parameters count as absent.
    pub fn to_filter(&self) -> Result<QueryFilter, String> {
        let order_type = non_empty(&self.order_type)
            .and_then(|raw| raw.parse::<OrderType>().ok())
            .ok_or_else(|| {
                "Type parameter is required and must be 'searching' or 'available'".to_string()
            })?;

        let sort = non_empty(&self.option)
            .map(|raw| {
                raw.parse::<SortOption>()
                    .map_err(|_| "Option must be 'newest' or 'oldest'".to_string())
            })
            .transpose()?;

        Ok(QueryFilter {
            order_type: Some(order_type),
            user_id: non_empty(&self.user_id).map(str::to_string),
            fruit_id: non_empty(&self.fruit_id).map(str::to_string),
            variant_id: non_empty(&self.variant_id).map(str::to_string),
            sort,
        })
    }
}

/// Request body for `POST /orders`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default, rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub fruit_id: String,
    #[serde(default)]
    pub variant_id: String,
}

/// Request body for `PATCH /orders/:id/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn validate(&self) -> Result<OrderStatus, String> {
        self.status.parse::<OrderStatus>().map_err(|_| {
            "Status must be one of 'pending', 'processing', 'completed', 'cancelled'".to_string()
        })
    }
}

/// Request body for `POST /auth/custom-token`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomTokenRequest {
    #[serde(default)]
    pub uid: Option<String>,
}

impl CustomTokenRequest {
    pub fn validate(&self) -> Result<&str, String> {
        match self.uid.as_deref().map(str::trim) {
            Some(uid) if !uid.is_empty() => Ok(uid),
            _ => Err("UID is required".to_string()),
        }
    }
}

/// Request body for `POST /auth/exchange`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeTokenRequest {
    #[serde(default)]
    pub custom_token: Option<String>,
}

impl ExchangeTokenRequest {
    pub fn validate(&self) -> Result<&str, String> {
        non_empty(&self.custom_token).ok_or_else(|| "Custom token is required".to_string())
    }
}

/// Request body for `POST /auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        match (non_empty(&self.email), non_empty(&self.password)) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err("Email and password are required".to_string()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
