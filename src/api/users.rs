//! User Handlers
//!
//! Callers manage their own profile; admins list, inspect, delete and
//! promote any user.

use axum::{
    extract::{Path, State},
    Json,
};

use super::extract::{AdminUser, AuthUser, JsonBody};
use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::{ApiResponse, User, UserProfile};

/// Handler for GET /users/me
pub async fn get_me(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<User>>> {
    fetch_user(&state, &user.uid).await
}

/// Handler for PUT /users/me
///
/// Creates the caller's profile on first use. A `role` in the body is ignored.
pub async fn update_me(
    user: AuthUser,
    State(state): State<AppState>,
    JsonBody(profile): JsonBody<UserProfile>,
) -> Result<Json<ApiResponse<User>>> {
    let updated = state
        .users
        .upsert(&user.uid, &profile)
        .await
        .map_err(|err| err.context("Failed to update user"))?;

    Ok(Json(ApiResponse::ok("User updated successfully", updated)))
}

/// Handler for GET /users
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = state
        .users
        .list()
        .await
        .map_err(|err| err.context("Failed to retrieve users"))?;

    Ok(Json(ApiResponse::ok("Users retrieved successfully", users)))
}

/// Handler for GET /users/:id
pub async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ApiResponse<User>>> {
    fetch_user(&state, &uid).await
}

/// Handler for DELETE /users/:id
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ApiResponse>> {
    state
        .users
        .delete(&uid)
        .await
        .map_err(|err| err.context("Failed to delete user"))?;

    tracing::info!(uid = uid.as_str(), by = admin.uid.as_str(), "user removed by admin");
    Ok(Json(ApiResponse::done("User deleted successfully")))
}

/// Handler for POST /users/:id/admin
pub async fn set_admin(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ApiResponse>> {
    state
        .users
        .grant_admin(&uid)
        .await
        .map_err(|err| err.context("Failed to set user as admin"))?;

    Ok(Json(ApiResponse::done("User set as admin successfully")))
}

async fn fetch_user(state: &AppState, uid: &str) -> Result<Json<ApiResponse<User>>> {
    let user = state
        .users
        .get(uid)
        .await
        .map_err(|err| err.context("Failed to retrieve user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok("User retrieved successfully", user)))
}
