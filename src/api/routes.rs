//! API Routes
//!
//! Configures the Axum router with all gateway endpoints under `/api`.

use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::auth::{custom_token, exchange_token, login, verify_token};
use super::catalog::{list_fruits, list_variants, search_fruits, search_variants};
use super::health::{cache_stats_handler, health_handler, not_found_handler};
use super::orders::{create_order, delete_order, get_order, list_orders, update_order_status};
use super::users::{delete_user, get_me, get_user, list_users, set_admin, update_me};
use super::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/health` - Health check
/// - `GET /api/fruits`, `GET /api/fruits/search?id=` - Fruit catalog
/// - `GET /api/variants`, `GET /api/variants/search?id=` - Variant catalog
/// - `GET|POST /api/orders` - List and create orders
/// - `GET|DELETE /api/orders/:id`, `PATCH /api/orders/:id/status` - Single order
/// - `GET|PUT /api/users/me` - Caller's profile
/// - `GET /api/users`, `GET|DELETE /api/users/:id`, `POST /api/users/:id/admin` - Admin
/// - `POST /api/auth/login` - Refused password sign-in with a pointer to the exchange
/// - `POST /api/auth/verify`, `POST /api/auth/exchange` - Bearer tokens
/// - `POST /api/auth/custom-token` - Admin-issued custom tokens
/// - `GET /api/cache/stats` - Catalog cache statistics
///
/// # Middleware
/// - CORS: configured origins, or any origin when none are configured
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/fruits", get(list_fruits))
        .route("/fruits/search", get(search_fruits))
        .route("/variants", get(list_variants))
        .route("/variants/search", get(search_variants))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order).delete(delete_order))
        .route("/orders/:id/status", patch(update_order_status))
        .route("/users", get(list_users))
        .route("/users/me", get(get_me).put(update_me))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/users/:id/admin", post(set_admin))
        .route("/auth/login", post(login))
        .route("/auth/verify", post(verify_token))
        .route("/auth/custom-token", post(custom_token))
        .route("/auth/exchange", post(exchange_token))
        .route("/cache/stats", get(cache_stats_handler));

    Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = origin.as_str(), "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
