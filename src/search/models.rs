//! Catalog API payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One catalog listing, kept exactly as the API returned it.
///
/// Listings have no stable shape, so nothing is validated here; the
/// accessors only read what happens to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(pub Value);

impl Item {
    /// Listing identifier, whatever its JSON type
    pub fn id(&self) -> Option<&Value> {
        self.field("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.field("url").and_then(Value::as_str)
    }

    /// Any field of the listing
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Response body of the catalog and similar-items endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub items: Option<Vec<Item>>,
}

impl ItemsPage {
    pub fn into_items(self) -> Vec<Item> {
        self.items.unwrap_or_default()
    }
}
