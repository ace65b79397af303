//! Session management module
//!
//! Caches one session cookie per region domain and fetches new ones when the
//! cache has nothing usable.

mod acquirer;
mod store;

pub use acquirer::{CookieAcquirer, SESSION_DEFAULTS_PATH};
pub use store::{Freshness, SessionCredential, SessionStore};
