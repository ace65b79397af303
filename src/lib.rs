//! Vinted-RS: a session-managed client for the Vinted catalog search API
//!
//! The API only answers requests carrying a session cookie for the regional
//! site being queried. This crate fetches and caches those cookies, refreshes
//! them when they are rejected, and translates browser catalog URLs into the
//! API's query syntax.

pub mod config;
pub mod error;
pub mod network;
pub mod query;
pub mod search;
pub mod session;

pub use config::Settings;
pub use error::{Error, Result};
pub use query::{translate, ParsedQuery, TranslateOptions};
pub use search::{Item, VintedClient};
pub use session::{SessionCredential, SessionStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
