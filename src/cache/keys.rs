//! Cache key scheme.
//!
//! - `all_<kind>s` holds a full catalog listing, e.g. `all_fruits`
//! - `<kind>_<id>` holds a single-item lookup, e.g. `fruit_12`

use crate::models::CatalogKind;

/// Key of the full listing for `kind`.
pub fn all_items(kind: CatalogKind) -> String {
    format!("all_{}", kind.plural())
}

/// Key of the lookup of `query_id` in `kind`.
pub fn single_item(kind: CatalogKind, query_id: &str) -> String {
    format!("{}_{}", kind.name(), query_id)
}
