//! Auth Handlers
//!
//! Token inspection, custom-token issuance and exchange. Custom tokens are
//! minted by admins and are not bearer credentials until exchanged.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::info;

use super::extract::{AdminUser, AuthUser, JsonBody};
use super::AppState;
use crate::error::{ApiError, Result};
use crate::models::{
    ApiResponse, CustomToken, CustomTokenRequest, ExchangeTokenRequest, IdToken, LoginRequest,
    SignInHint, TokenInfo,
};

/// Handler for POST /auth/login
///
/// Password sign-in is not offered; the response points at the
/// custom-token exchange instead.
pub async fn login(
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignInHint>>)> {
    req.validate().map_err(ApiError::Validation)?;

    let hint = SignInHint {
        endpoint: "/api/auth/exchange",
        method: "POST",
        body: json!({"customToken": "<token issued by POST /api/auth/custom-token>"}),
    };
    Ok((
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            message: "Password sign-in is not supported, exchange a custom token instead"
                .to_string(),
            data: Some(hint),
            error: None,
        }),
    ))
}

/// Handler for POST /auth/verify
///
/// Echoes what the bearer token says about its subject.
pub async fn verify_token(user: AuthUser) -> Json<ApiResponse<TokenInfo>> {
    Json(ApiResponse::ok(
        "Token is valid",
        TokenInfo {
            uid: user.uid,
            email: user.email,
            role: user.role,
        },
    ))
}

/// Handler for POST /auth/custom-token
///
/// Admin only. The token carries the identity's claims at exchange time.
pub async fn custom_token(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CustomTokenRequest>,
) -> Result<Json<ApiResponse<CustomToken>>> {
    let uid = req.validate().map_err(ApiError::Validation)?;

    let token = state
        .identity
        .issue_custom_token(uid)
        .await
        .map_err(|err| ApiError::from(err).context("Failed to create custom token"))?;

    info!(uid, by = admin.uid.as_str(), "custom token issued");
    Ok(Json(ApiResponse::ok(
        "Custom token created successfully",
        CustomToken {
            custom_token: token,
            expires_in: state.identity.token_ttl_secs(),
        },
    )))
}

/// Handler for POST /auth/exchange
///
/// Trades a custom token for a bearer token.
pub async fn exchange_token(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ExchangeTokenRequest>,
) -> Result<Json<ApiResponse<IdToken>>> {
    let custom_token = req.validate().map_err(ApiError::Validation)?;

    let id_token = state
        .identity
        .exchange_custom_token(custom_token)
        .await
        .map_err(|err| ApiError::from(err).context("Failed to exchange custom token"))?;

    Ok(Json(ApiResponse::ok(
        "Token exchanged successfully",
        IdToken {
            id_token,
            expires_in: state.identity.token_ttl_secs(),
        },
    )))
}
