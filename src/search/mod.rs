//! Search orchestration module
//!
//! Translates marketplace URLs, attaches a session cookie, and retries once
//! with a fresh session when the API rejects the cookie.

mod executor;
mod models;

pub use executor::{VintedClient, CATALOG_ITEMS_PATH};
pub use models::*;
