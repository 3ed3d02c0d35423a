//! Identity Provider Module
//!
//! Bearer-token verification and identity management consumed by the
//! authentication layer. The gateway only sees the [`IdentityProvider`]
//! trait; [`JwtIdentityProvider`] is the bundled implementation.

mod jwt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

pub use jwt::JwtIdentityProvider;

/// Custom claims attached to an identity, e.g. `{"admin": true}`.
pub type Claims = Map<String, Value>;

// == Identity Error ==
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentityError {
    /// The token failed signature, format or expiry checks
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// No identity is registered under this uid
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// An identity with this uid already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Identity provider error: {0}")]
    Internal(String),
}

pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

// == Verified Token ==
/// What a successfully verified bearer token says about its subject.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub subject_id: String,
    pub email: Option<String>,
    pub custom_claims: Claims,
}

impl VerifiedToken {
    /// The subject's `role` claim, `user` when absent.
    pub fn role(&self) -> &str {
        self.custom_claims
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or("user")
    }
}

// == Identity Provider ==
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a bearer token and returns its subject.
    async fn verify_token(&self, token: &str) -> IdentityResult<VerifiedToken>;

    /// Registers a new identity and returns its uid. A uid is generated when
    /// none is given.
    async fn create_user(&self, uid: Option<&str>, email: Option<&str>) -> IdentityResult<String>;

    /// Removes an identity.
    async fn delete_user(&self, uid: &str) -> IdentityResult<()>;

    /// Replaces the custom claims of an identity.
    async fn set_custom_claims(&self, uid: &str, claims: Claims) -> IdentityResult<()>;

    /// Current custom claims of an identity.
    async fn custom_claims(&self, uid: &str) -> IdentityResult<Claims>;

    /// Issues a bearer token for `uid` carrying its current custom claims.
    async fn issue_token(&self, uid: &str) -> IdentityResult<String>;

    /// Issues a single-purpose token for `uid` that is only good for
    /// [`exchange_custom_token`](Self::exchange_custom_token); it is
    /// refused as a bearer token.
    async fn issue_custom_token(&self, uid: &str) -> IdentityResult<String>;

    /// Trades a custom token for a bearer token for the same subject.
    async fn exchange_custom_token(&self, custom_token: &str) -> IdentityResult<String>;

    /// Lifetime in seconds of the tokens this provider issues.
    fn token_ttl_secs(&self) -> u64;
}

/// Returns true if the custom claims grant admin access.
pub fn is_admin(claims: &Claims) -> bool {
    claims.get("admin").and_then(Value::as_bool).unwrap_or(false)
}

/// Claims granting admin access.
pub fn admin_claims() -> Claims {
    let mut claims = Claims::new();
    claims.insert("admin".into(), Value::Bool(true));
    claims
}

/// Ensures each uid exists and carries the admin claim.
pub async fn bootstrap_admins(
    identity: &dyn IdentityProvider,
    uids: &[String],
) -> IdentityResult<()> {
    for uid in uids {
        match identity.create_user(Some(uid), None).await {
            Ok(_) | Err(IdentityError::UserExists(_)) => {}
            Err(err) => return Err(err),
        }
        let mut claims = identity.custom_claims(uid).await?;
        claims.extend(admin_claims());
        identity.set_custom_claims(uid, claims).await?;
        info!(uid = uid.as_str(), "granted admin claim");
    }
    Ok(())
}
