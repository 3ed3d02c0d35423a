//! User profiles stored alongside identities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp;
use crate::store::{Document, Fields, StoreResult};

/// A user profile as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserFields {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    photo_url: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
}

impl User {
    /// Builds a profile from its stored document; the uid is the document key.
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        let fields: UserFields = doc.decode()?;
        Ok(Self {
            uid: doc.id.clone(),
            email: fields.email,
            display_name: fields.display_name,
            photo_url: fields.photo_url,
            role: fields.role,
            created_at: timestamp::parse(fields.created_at.as_ref()),
            updated_at: timestamp::parse(fields.updated_at.as_ref()),
        })
    }
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl UserProfile {
    /// Stored form of the fields that were provided.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        if let Some(email) = &self.email {
            fields.insert("email".into(), Value::String(email.clone()));
        }
        if let Some(name) = &self.display_name {
            fields.insert("displayName".into(), Value::String(name.clone()));
        }
        if let Some(url) = &self.photo_url {
            fields.insert("photoURL".into(), Value::String(url.clone()));
        }
        fields
    }
}
