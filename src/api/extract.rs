//! Request extractors.
//!
//! `AuthUser` requires a valid `Authorization: Bearer <token>` header.
//! `AdminUser` additionally requires the admin claim, looked up from the
//! identity provider on every request so that revocations apply at once.
//! `JsonBody` reports undecodable bodies in the standard error envelope.

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{header, request::Parts};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::AppState;
use crate::error::{ApiError, Result};
use crate::identity::{self, IdentityError};

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub role: String,
}

/// An authenticated caller holding the admin claim.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser(pub AuthUser);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Returns true if `uid` currently holds the admin claim. Unknown
/// identities are not admins.
pub async fn is_admin(state: &AppState, uid: &str) -> Result<bool> {
    match state.identity.custom_claims(uid).await {
        Ok(claims) => Ok(identity::is_admin(&claims)),
        Err(IdentityError::UserNotFound(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Unauthorized - No token provided".to_string())
        })?;

        let verified = state.identity.verify_token(token).await.map_err(|err| {
            warn!(error = %err, "rejected bearer token");
            ApiError::Unauthorized("Unauthorized - Invalid token".to_string())
        })?;

        Ok(AuthUser {
            role: verified.role().to_string(),
            uid: verified.subject_id,
            email: verified.email,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(state, &user.uid).await? {
            warn!(uid = user.uid.as_str(), "admin access denied");
            return Err(ApiError::Forbidden(
                "Forbidden - Admin access required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

/// JSON request body. Rejections become a 400 `InvalidBody` error.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!(status = %rejection.status(), "rejected request body");
                Err(ApiError::InvalidBody(rejection.body_text()))
            }
        }
    }
}
