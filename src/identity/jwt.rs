//! HS256 bearer tokens with an in-process identity registry.

use std::collections::HashMap;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Claims, IdentityError, IdentityProvider, IdentityResult, VerifiedToken};

/// What a token may be used for. Only `Id` tokens are accepted as bearer
/// credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenUse {
    Id,
    Custom,
}

/// Registered claim names; custom claims may not shadow them.
const RESERVED_CLAIMS: [&str; 5] = ["sub", "email", "iat", "exp", "token_use"];

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    iat: u64,
    exp: u64,
    token_use: TokenUse,
    #[serde(flatten)]
    custom: Claims,
}

#[derive(Debug, Clone, Default)]
struct IdentityRecord {
    email: Option<String>,
    custom_claims: Claims,
}

/// Identity provider that signs and verifies HS256 tokens with a shared secret.
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: u64,
    users: RwLock<HashMap<String, IdentityRecord>>,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, token_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
            users: RwLock::new(HashMap::new()),
        }
    }

    async fn sign(&self, uid: &str, token_use: TokenUse) -> IdentityResult<String> {
        let record = self.users.read().await.get(uid).cloned().unwrap_or_default();
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);

        let mut custom = record.custom_claims;
        for name in RESERVED_CLAIMS {
            custom.remove(name);
        }

        let claims = TokenClaims {
            sub: uid.to_string(),
            email: record.email,
            iat: now,
            exp: now + self.token_ttl_secs,
            token_use,
            custom,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| IdentityError::Internal(err.to_string()))
    }

    fn open(&self, token: &str, expected: TokenUse) -> IdentityResult<TokenClaims> {
        let claims = decode::<TokenClaims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|err| IdentityError::InvalidToken(err.to_string()))?
        .claims;

        if claims.token_use != expected {
            return Err(IdentityError::InvalidToken(format!(
                "expected {:?} token, got {:?}",
                expected, claims.token_use
            )));
        }
        Ok(claims)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> IdentityResult<VerifiedToken> {
        let claims = self.open(token, TokenUse::Id)?;
        Ok(VerifiedToken {
            subject_id: claims.sub,
            email: claims.email,
            custom_claims: claims.custom,
        })
    }

    async fn create_user(&self, uid: Option<&str>, email: Option<&str>) -> IdentityResult<String> {
        let uid = uid
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let mut users = self.users.write().await;
        if users.contains_key(&uid) {
            return Err(IdentityError::UserExists(uid));
        }
        users.insert(
            uid.clone(),
            IdentityRecord {
                email: email.map(str::to_string),
                custom_claims: Claims::new(),
            },
        );
        debug!(uid = uid.as_str(), "identity created");
        Ok(uid)
    }

    async fn delete_user(&self, uid: &str) -> IdentityResult<()> {
        self.users
            .write()
            .await
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| IdentityError::UserNotFound(uid.to_string()))
    }

    async fn set_custom_claims(&self, uid: &str, claims: Claims) -> IdentityResult<()> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(uid)
            .ok_or_else(|| IdentityError::UserNotFound(uid.to_string()))?;
        record.custom_claims = claims;
        Ok(())
    }

    async fn custom_claims(&self, uid: &str) -> IdentityResult<Claims> {
        self.users
            .read()
            .await
            .get(uid)
            .map(|record| record.custom_claims.clone())
            .ok_or_else(|| IdentityError::UserNotFound(uid.to_string()))
    }

    async fn issue_token(&self, uid: &str) -> IdentityResult<String> {
        self.sign(uid, TokenUse::Id).await
    }

    async fn issue_custom_token(&self, uid: &str) -> IdentityResult<String> {
        self.sign(uid, TokenUse::Custom).await
    }

    async fn exchange_custom_token(&self, custom_token: &str) -> IdentityResult<String> {
        let claims = self.open(custom_token, TokenUse::Custom)?;
        debug!(uid = claims.sub.as_str(), "custom token exchanged");
        self.sign(&claims.sub, TokenUse::Id).await
    }

    fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }
}
