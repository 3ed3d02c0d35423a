//! Order Handlers
//!
//! Listing and creation for any authenticated caller; reading, status
//! changes and deletion for the order's creator or an admin.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::extract::{is_admin, AuthUser, JsonBody};
use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::{
    ApiResponse, CreateOrderRequest, CreatedOrder, Order, OrderListQuery, UpdateStatusRequest,
};
use crate::services::CreateOrderOutcome;

/// Handler for GET /orders
pub async fn list_orders(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let filter = query.to_filter().map_err(ApiError::Validation)?;
    let orders = state
        .orders
        .list(&filter)
        .await
        .map_err(ApiError::store("Failed to retrieve orders"))?;

    Ok(Json(ApiResponse::ok("Orders retrieved successfully", orders)))
}

/// Handler for POST /orders
///
/// Returns 201 with the new order id. Malformed input is a 400; a fruit or
/// variant that does not exist is a 404.
pub async fn create_order(
    user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedOrder>>)> {
    let outcome = state
        .orders
        .create(&req.order_type, &req.fruit_id, &req.variant_id, Some(&user.uid))
        .await
        .map_err(ApiError::store("Failed to create order"))?;

    match outcome {
        CreateOrderOutcome::Created { order_id } => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::ok(
                "Order created successfully",
                CreatedOrder { order_id },
            )),
        )),
        CreateOrderOutcome::Rejected(rejection) if rejection.is_not_found() => {
            Err(ApiError::NotFound(rejection.message().to_string()))
        }
        CreateOrderOutcome::Rejected(rejection) => {
            Err(ApiError::Validation(rejection.message().to_string()))
        }
    }
}

/// Handler for GET /orders/:id
pub async fn get_order(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Order>>> {
    let order = load_accessible(&state, &user, &id).await?;
    Ok(Json(ApiResponse::ok("Order retrieved successfully", order)))
}

/// Handler for PATCH /orders/:id/status
pub async fn update_order_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    let status = req.validate().map_err(ApiError::Validation)?;
    load_accessible(&state, &user, &id).await?;

    let order = state
        .orders
        .update_status(&id, status)
        .await
        .map_err(ApiError::store("Failed to update order"))?
        .ok_or_else(order_not_found)?;

    Ok(Json(ApiResponse::ok("Order updated successfully", order)))
}

/// Handler for DELETE /orders/:id
pub async fn delete_order(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>> {
    load_accessible(&state, &user, &id).await?;

    let deleted = state
        .orders
        .delete(&id)
        .await
        .map_err(ApiError::store("Failed to delete order"))?;
    if !deleted {
        return Err(order_not_found());
    }

    Ok(Json(ApiResponse::done("Order deleted successfully")))
}

/// Loads an order the caller may act on: its creator or an admin.
async fn load_accessible(state: &AppState, user: &AuthUser, id: &str) -> Result<Order> {
    let order = state
        .orders
        .get(id)
        .await
        .map_err(ApiError::store("Failed to retrieve order"))?
        .ok_or_else(order_not_found)?;

    if order.is_owned_by(&user.uid) || is_admin(state, &user.uid).await? {
        Ok(order)
    } else {
        Err(ApiError::Forbidden(
            "Forbidden - You do not have access to this order".to_string(),
        ))
    }
}

fn order_not_found() -> ApiError {
    ApiError::NotFound("Order not found".to_string())
}
