//! Catalog items: fruits and their variants share one shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::{Document, StoreResult};

// == Catalog Kind ==
/// Which catalog a collection of items belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Fruit,
    Variant,
}

impl CatalogKind {
    /// Singular name, used as the cache key prefix.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogKind::Fruit => "fruit",
            CatalogKind::Variant => "variant",
        }
    }

    /// Plural name, used in listing keys and response messages.
    pub fn plural(&self) -> &'static str {
        match self {
            CatalogKind::Fruit => "fruits",
            CatalogKind::Variant => "variants",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Item ==
/// A fruit or variant as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub imgs: String,
    pub average: f64,
}

#[derive(Deserialize)]
struct ItemFields {
    #[serde(default)]
    name: String,
    #[serde(default)]
    imgs: String,
    #[serde(default)]
    average: f64,
}

impl Item {
    /// Builds an item from its stored document. The numeric `id` comes from
    /// the document key, not from the fields.
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        let fields: ItemFields = doc.decode()?;
        let id = doc
            .id
            .trim()
            .parse::<i64>()
            .map_err(|_| doc.decode_error("document key is not numeric"))?;

        Ok(Self {
            id,
            name: fields.name,
            imgs: fields.imgs,
            average: fields.average,
        })
    }
}
