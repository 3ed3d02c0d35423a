//! User Service
//!
//! Profile documents in the store, kept alongside identities held by the
//! identity provider.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ApiError, Result};
use crate::identity::{admin_claims, IdentityError, IdentityProvider};
use crate::models::{timestamp, User, UserProfile};
use crate::store::{DocumentStore, StoreError};

#[derive(Clone)]
pub struct UserService {
    collection: String,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(
        collection: impl Into<String>,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            collection: collection.into(),
            store,
            identity,
        }
    }

    pub async fn get(&self, uid: &str) -> Result<Option<User>> {
        let user = self
            .store
            .get_document(&self.collection, uid)
            .await?
            .map(|doc| User::from_document(&doc))
            .transpose()?;
        Ok(user)
    }

    /// Updates the profile if it exists, creates it otherwise.
    pub async fn upsert(&self, uid: &str, profile: &UserProfile) -> Result<User> {
        let mut fields = profile.to_fields();
        let now = timestamp::now_value();

        if self.store.get_document(&self.collection, uid).await?.is_some() {
            fields.insert("updatedAt".into(), now);
            self.store
                .update_document(&self.collection, uid, fields)
                .await?;
        } else {
            fields.insert("uid".into(), uid.into());
            fields.insert("createdAt".into(), now.clone());
            fields.insert("updatedAt".into(), now);
            self.store.set_document(&self.collection, uid, fields).await?;
            info!(uid, "user profile created");
        }

        self.get(uid).await?.ok_or_else(|| {
            ApiError::from(StoreError::NotFound {
                collection: self.collection.clone(),
                id: uid.to_string(),
            })
        })
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = self
            .store
            .get_all_documents(&self.collection)
            .await?
            .iter()
            .map(User::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Removes the identity and the profile.
    ///
    /// Either may be missing on its own; the call fails with `NotFound` only
    /// when neither existed.
    pub async fn delete(&self, uid: &str) -> Result<()> {
        let had_identity = match self.identity.delete_user(uid).await {
            Ok(()) => true,
            Err(IdentityError::UserNotFound(_)) => {
                warn!(uid, "no identity registered for deleted user");
                false
            }
            Err(err) => return Err(err.into()),
        };
        let had_profile = self.store.delete_document(&self.collection, uid).await?;

        if !had_identity && !had_profile {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        info!(uid, "user deleted");
        Ok(())
    }

    /// Adds the admin claim to an identity, keeping its other claims.
    pub async fn grant_admin(&self, uid: &str) -> Result<()> {
        let mut claims = self.identity.custom_claims(uid).await?;
        claims.extend(admin_claims());
        self.identity.set_custom_claims(uid, claims).await?;
        info!(uid, "admin claim granted");
        Ok(())
    }
}
