//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an in-memory
//! store and a JWT identity provider.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fruit_gateway::identity::{admin_claims, IdentityProvider, JwtIdentityProvider};
use fruit_gateway::store::{MemoryStore, Seed};
use fruit_gateway::{create_router, AppState, Collections};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    app: Router,
    store: Arc<MemoryStore>,
    identity: Arc<JwtIdentityProvider>,
}

fn seed() -> Seed {
    Seed::default()
        .document("dev_fruits", "1", json!({"name": "Mango", "imgs": "mango.png", "average": 4.5}))
        .document("dev_fruits", "2", json!({"name": "Durian", "imgs": "durian.png", "average": 3.8}))
        .document("dev_variants", "1", json!({"name": "Cat Chu", "imgs": "catchu.png", "average": 4.2}))
}

fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::with_seed(seed()));
    let identity = Arc::new(JwtIdentityProvider::new("test-secret", 3600));
    let state = AppState::new(store.clone(), identity.clone(), &Collections::for_mode(false));

    TestApp {
        app: create_router(state),
        store,
        identity,
    }
}

impl TestApp {
    /// Registers `uid` if needed and returns a bearer token for it.
    async fn token_for(&self, uid: &str) -> String {
        let _ = self.identity.create_user(Some(uid), None).await;
        self.identity.issue_token(uid).await.unwrap()
    }

    async fn admin_token(&self, uid: &str) -> String {
        let _ = self.identity.create_user(Some(uid), None).await;
        self.identity.set_custom_claims(uid, admin_claims()).await.unwrap();
        self.identity.issue_token(uid).await.unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    async fn create_order(&self, token: &str, order_type: &str) -> String {
        let (status, json) = self
            .send(
                Method::POST,
                "/api/orders",
                Some(token),
                Some(json!({"type": order_type, "fruitId": "1", "variantId": "1"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["orderId"].as_str().unwrap().to_string()
    }
}

// == Health and Fallback ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "API Gateway is running");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let (status, json) = app.get("/api/bananas", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
}

// == Catalog Endpoints ==

#[tokio::test]
async fn test_list_fruits() {
    let app = create_test_app();

    let (status, json) = app.get("/api/fruits", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Fruits retrieved successfully");
    let fruits = json["data"].as_array().unwrap();
    assert_eq!(fruits.len(), 2);
    assert_eq!(fruits[0]["id"], 1);
    assert_eq!(fruits[0]["name"], "Mango");
    assert_eq!(fruits[0]["imgs"], "mango.png");
}

#[tokio::test]
async fn test_list_variants_is_mounted() {
    let app = create_test_app();

    let (status, json) = app.get("/api/variants", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["name"], "Cat Chu");
}

#[tokio::test]
async fn test_fruit_listing_is_cached() {
    let app = create_test_app();

    app.get("/api/fruits", None).await;
    app.get("/api/fruits", None).await;
    assert_eq!(app.store.calls().get_all, 1);

    let (status, json) = app.get("/api/cache/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["hits"], 1);
    assert_eq!(json["data"]["misses"], 1);
    assert_eq!(json["data"]["stale_misses"], 0);
    assert_eq!(json["data"]["total_entries"], 1);
    assert_eq!(json["data"]["ttl_ms"], 60_000);
}

#[tokio::test]
async fn test_search_requires_id() {
    let app = create_test_app();

    let (status, json) = app.get("/api/fruits/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Search query is required");

    let (status, _) = app.get("/api/variants/search?id=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_found_and_missing() {
    let app = create_test_app();

    let (status, json) = app.get("/api/fruits/search?id=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["name"], "Durian");

    let (status, json) = app.get("/api/fruits/search?id=99", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!([]));

    app.get("/api/fruits/search?id=99", None).await;
    assert_eq!(app.store.calls().get, 3);
}

// == Authentication ==

#[tokio::test]
async fn test_missing_token() {
    let app = create_test_app();

    let (status, json) = app.get("/api/orders?type=available", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Unauthorized - No token provided");
}

#[tokio::test]
async fn test_invalid_token() {
    let app = create_test_app();

    let (status, json) = app.get("/api/users/me", Some("garbage")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Unauthorized - Invalid token");
}

#[tokio::test]
async fn test_verify_token() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let (status, json) = app.send(Method::POST, "/api/auth/verify", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Token is valid");
    assert_eq!(json["data"]["uid"], "u1");
    assert_eq!(json["data"]["role"], "user");
}

#[tokio::test]
async fn test_custom_token_requires_admin() {
    let app = create_test_app();

    let (status, json) = app
        .send(Method::POST, "/api/auth/custom-token", None, Some(json!({"uid": "boss"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Unauthorized - No token provided");

    let token = app.token_for("u1").await;
    let (status, _) = app
        .send(Method::POST, "/api/auth/custom-token", Some(&token), Some(json!({"uid": "boss"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_custom_token_is_not_a_bearer_token() {
    let app = create_test_app();
    let admin = app.admin_token("boss").await;

    let (status, json) = app
        .send(Method::POST, "/api/auth/custom-token", Some(&admin), Some(json!({"uid": "boss"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["expiresIn"], 3600);
    let custom = json["data"]["customToken"].as_str().unwrap().to_string();

    let (status, json) = app.get("/api/users", Some(&custom)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Unauthorized - Invalid token");

    let (status, _) = app.send(Method::POST, "/api/auth/verify", Some(&custom), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_custom_token_exchange() {
    let app = create_test_app();
    let admin = app.admin_token("boss").await;
    app.token_for("u7").await;

    let (_, json) = app
        .send(Method::POST, "/api/auth/custom-token", Some(&admin), Some(json!({"uid": "u7"})))
        .await;
    let custom = json["data"]["customToken"].as_str().unwrap().to_string();

    let (status, json) = app
        .send(Method::POST, "/api/auth/exchange", None, Some(json!({"customToken": custom})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Token exchanged successfully");
    assert_eq!(json["data"]["expiresIn"], 3600);

    let id_token = json["data"]["idToken"].as_str().unwrap().to_string();
    let (status, json) = app.send(Method::POST, "/api/auth/verify", Some(&id_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["uid"], "u7");
}

#[tokio::test]
async fn test_exchange_rejects_bad_tokens() {
    let app = create_test_app();
    let bearer = app.token_for("u1").await;

    for token in ["garbage", bearer.as_str()] {
        let (status, json) = app
            .send(Method::POST, "/api/auth/exchange", None, Some(json!({"customToken": token})))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
    }

    let (status, json) = app
        .send(Method::POST, "/api/auth/exchange", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Custom token is required");
}

#[tokio::test]
async fn test_custom_token_requires_uid() {
    let app = create_test_app();
    let admin = app.admin_token("boss").await;

    let (status, json) = app
        .send(Method::POST, "/api/auth/custom-token", Some(&admin), Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "UID is required");
}

#[tokio::test]
async fn test_login_points_to_exchange() {
    let app = create_test_app();

    let (status, json) = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email and password are required");

    let (status, json) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "a@b.c", "password": "hunter2"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["endpoint"], "/api/auth/exchange");
    assert_eq!(json["data"]["method"], "POST");
}

// == Order Endpoints ==

#[tokio::test]
async fn test_create_and_get_order() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let order_id = app.create_order(&token, "available").await;
    let (status, json) = app.get(&format!("/api/orders/{}", order_id), Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let order = &json["data"];
    assert_eq!(order["id"], order_id.as_str());
    assert_eq!(order["type"], "available");
    assert_eq!(order["fruitId"], "1");
    assert_eq!(order["variantId"], "1");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["userId"], "u1");
    assert!(order["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_order_validation() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let cases = [
        (json!({"type": "available", "variantId": "1"}), StatusCode::BAD_REQUEST, "fruitId required"),
        (json!({"type": "available", "fruitId": "1"}), StatusCode::BAD_REQUEST, "variantId required"),
        (json!({"type": "bartering", "fruitId": "1", "variantId": "1"}), StatusCode::BAD_REQUEST, "invalid type"),
        (json!({"type": "searching", "fruitId": "F-missing", "variantId": "1"}), StatusCode::NOT_FOUND, "Fruit not found"),
        (json!({"type": "searching", "fruitId": "1", "variantId": "V-missing"}), StatusCode::NOT_FOUND, "Variant not found"),
    ];

    for (body, expected_status, expected_message) in cases {
        let (status, json) = app.send(Method::POST, "/api/orders", Some(&token), Some(body)).await;
        assert_eq!(status, expected_status);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], expected_message);
    }

    assert_eq!(app.store.count("orders").await, 0);
}

#[tokio::test]
async fn test_create_order_invalid_json() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let bodies = [
        "not json".to_string(),
        json!({"type": "available", "fruitId": 1, "variantId": "1"}).to_string(),
    ];

    for body in bodies {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/orders")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid request body");
        assert!(json["error"].is_string());
    }

    assert_eq!(app.store.count("orders").await, 0);
}

#[tokio::test]
async fn test_list_orders_requires_type() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let (status, json) = app.get("/api/orders", Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Type parameter is required and must be 'searching' or 'available'"
    );
}

#[tokio::test]
async fn test_list_orders_filters() {
    let app = create_test_app();
    let lan = app.token_for("lan").await;
    let minh = app.token_for("minh").await;

    app.create_order(&lan, "available").await;
    app.create_order(&minh, "available").await;
    app.create_order(&minh, "searching").await;

    let (status, json) = app.get("/api/orders?type=available&option=newest", Some(&lan)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let (_, json) = app.get("/api/orders?type=available&userId=minh", Some(&lan)).await;
    let orders = json["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["userId"], "minh");

    let (status, _) = app.get("/api/orders?type=available&option=latest", Some(&lan)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_access_is_limited_to_owner_and_admin() {
    let app = create_test_app();
    let owner = app.token_for("owner").await;
    let stranger = app.token_for("stranger").await;
    let admin = app.admin_token("boss").await;

    let order_id = app.create_order(&owner, "searching").await;
    let uri = format!("/api/orders/{}", order_id);

    let (status, _) = app.get(&uri, Some(&stranger)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_order_status() {
    let app = create_test_app();
    let token = app.token_for("u1").await;
    let order_id = app.create_order(&token, "available").await;
    let uri = format!("/api/orders/{}/status", order_id);

    let (status, json) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"status": "completed"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "completed");

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({"status": "shipped"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::PATCH,
            "/api/orders/missing/status",
            Some(&token),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_order() {
    let app = create_test_app();
    let token = app.token_for("u1").await;
    let order_id = app.create_order(&token, "available").await;
    let uri = format!("/api/orders/{}", order_id);

    let (status, json) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Order deleted successfully");

    let (status, json) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Order not found");
}

// == User Endpoints ==

#[tokio::test]
async fn test_profile_lifecycle() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let (status, json) = app.get("/api/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "User not found");

    let (status, json) = app
        .send(
            Method::PUT,
            "/api/users/me",
            Some(&token),
            Some(json!({"displayName": "Lan", "role": "admin"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "User updated successfully");
    assert_eq!(json["data"]["uid"], "u1");
    assert_eq!(json["data"]["displayName"], "Lan");
    assert!(json["data"].get("role").is_none());

    let (status, json) = app.get("/api/users/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["displayName"], "Lan");
}

#[tokio::test]
async fn test_admin_routes_reject_regular_users() {
    let app = create_test_app();
    let token = app.token_for("u1").await;

    let (status, json) = app.get("/api/users", Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Forbidden - Admin access required");
}

#[tokio::test]
async fn test_admin_manages_users() {
    let app = create_test_app();
    let admin = app.admin_token("boss").await;
    let user = app.token_for("u1").await;
    app.send(Method::PUT, "/api/users/me", Some(&user), Some(json!({"displayName": "Lan"})))
        .await;

    let (status, json) = app.get("/api/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, json) = app.get("/api/users/u1", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["displayName"], "Lan");

    let (status, _) = app.send(Method::DELETE, "/api/users/u1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/users/u1", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_grant_admin_takes_effect_immediately() {
    let app = create_test_app();
    let admin = app.admin_token("boss").await;
    let user = app.token_for("u1").await;

    let (status, _) = app.get("/api/users", Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app.send(Method::POST, "/api/users/u1/admin", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "User set as admin successfully");

    // The token was issued before the grant; the claim is looked up per request
    let (status, _) = app.get("/api/users", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
}
