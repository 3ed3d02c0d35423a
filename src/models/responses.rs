//! Response DTOs for the gateway API
//!
//! Every endpoint answers with the same JSON envelope:
//! `{ success, message, data?, error? }`.

use serde::Serialize;

use crate::cache::CacheStats;

/// JSON envelope shared by all endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with no payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    /// Failed response, optionally carrying the underlying error text.
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

/// Payload of `POST /orders`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
}

/// Payload of `POST /auth/verify`
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
}

/// Payload of `POST /auth/custom-token`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomToken {
    pub custom_token: String,
    pub expires_in: u64,
}

/// Payload of `POST /auth/exchange`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdToken {
    pub id_token: String,
    pub expires_in: u64,
}

/// Payload of a refused `POST /auth/login`: where to get a token instead.
#[derive(Debug, Clone, Serialize)]
pub struct SignInHint {
    pub endpoint: &'static str,
    pub method: &'static str,
    pub body: serde_json::Value,
}

/// Payload of `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    /// Number of reads answered from the cache
    pub hits: u64,
    /// Number of reads that fell through to the store
    pub misses: u64,
    /// Misses caused by an expired entry rather than an absent one
    pub stale_misses: u64,
    /// Entries currently held, valid or not
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub ttl_ms: u64,
}

impl CacheStatsResponse {
    pub fn new(stats: &CacheStats, ttl_ms: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses(),
            stale_misses: stats.stale_misses,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            ttl_ms,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn running() -> Self {
        Self {
            success: true,
            message: "API Gateway is running".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
