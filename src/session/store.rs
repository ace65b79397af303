//! In-memory session cookie cache keyed by region domain

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use moka::future::Cache;
use std::time::Duration;

/// Most regions the marketplace has ever had; the cache never gets near it
const MAX_DOMAINS: u64 = 256;

/// Upper bound on the eviction TTL handed to the cache, which rejects
/// values beyond a few centuries
const MAX_EVICTION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Cookie header value that authenticates catalog requests for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    /// Value sent as the `cookie` request header
    pub cookie: String,
    /// When the cookie was obtained
    pub observed_at: DateTime<Utc>,
}

impl SessionCredential {
    pub fn new(cookie: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            cookie: cookie.into(),
            observed_at,
        }
    }

    /// Credential observed now
    pub fn now(cookie: impl Into<String>) -> Self {
        Self::new(cookie, Utc::now())
    }

    /// Credential built from a bare session token value
    pub fn from_token(cookie_name: &str, token: &str) -> Self {
        Self::now(format!("{}={}", cookie_name, token))
    }

    fn age(&self, now: DateTime<Utc>) -> ChronoDuration {
        now.signed_duration_since(self.observed_at)
    }
}

/// Decides how long a stored credential may be reused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Usable until explicitly invalidated
    UntilInvalidated,
    /// Usable for a fixed window after it was observed
    Ttl(Duration),
}

impl Freshness {
    /// TTL policy from an optional number of seconds
    pub fn from_secs(ttl: Option<u64>) -> Self {
        match ttl {
            Some(secs) => Self::Ttl(Duration::from_secs(secs)),
            None => Self::UntilInvalidated,
        }
    }

    pub fn is_fresh(&self, credential: &SessionCredential, now: DateTime<Utc>) -> bool {
        match self {
            Self::UntilInvalidated => true,
            Self::Ttl(ttl) => match ChronoDuration::from_std(*ttl) {
                Ok(ttl) => credential.age(now) < ttl,
                Err(_) => true,
            },
        }
    }
}

impl Default for Freshness {
    fn default() -> Self {
        Self::Ttl(Duration::from_secs(60))
    }
}

/// One credential per region domain, last write wins.
///
/// Clones share the same underlying table.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, SessionCredential>,
    freshness: Freshness,
}

impl SessionStore {
    /// Create a store with the given freshness policy
    pub fn new(freshness: Freshness) -> Self {
        let mut builder = Cache::builder().max_capacity(MAX_DOMAINS);
        if let Freshness::Ttl(ttl) = freshness {
            builder = builder.time_to_live(ttl.min(MAX_EVICTION_TTL));
        }

        Self {
            cache: builder.build(),
            freshness,
        }
    }

    /// Fresh credential for a domain; stale entries are dropped
    pub async fn get(&self, domain: &str) -> Option<SessionCredential> {
        let credential = self.cache.get(domain).await?;
        if self.freshness.is_fresh(&credential, Utc::now()) {
            Some(credential)
        } else {
            self.cache.invalidate(domain).await;
            None
        }
    }

    /// Store a credential, replacing any previous one for the domain
    pub async fn put(&self, domain: &str, credential: SessionCredential) {
        self.cache.insert(domain.to_string(), credential).await;
    }

    /// Forget the credential for a domain
    pub async fn invalidate(&self, domain: &str) {
        self.cache.invalidate(domain).await;
    }

    /// Forget every credential
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Freshness::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let store = SessionStore::default();
        assert!(store.get("fr").await.is_none());

        store.put("fr", SessionCredential::now("a=1")).await;
        assert_eq!(store.get("fr").await.unwrap().cookie, "a=1");
        assert!(store.get("be").await.is_none());

        store.put("fr", SessionCredential::now("a=2")).await;
        assert_eq!(store.get("fr").await.unwrap().cookie, "a=2");

        store.invalidate("fr").await;
        assert!(store.get("fr").await.is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let store = SessionStore::new(Freshness::Ttl(Duration::from_secs(60)));
        let old = SessionCredential::new("a=1", Utc::now() - ChronoDuration::seconds(61));
        store.put("fr", old).await;

        assert!(store.get("fr").await.is_none());
    }

    #[tokio::test]
    async fn test_until_invalidated() {
        let store = SessionStore::new(Freshness::from_secs(None));
        let old = SessionCredential::new("a=1", Utc::now() - ChronoDuration::days(30));
        store.put("fr", old).await;

        assert!(store.get("fr").await.is_some());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::default();
        let other = store.clone();
        other.put("de", SessionCredential::now("a=1")).await;

        assert!(store.get("de").await.is_some());
        store.clear();
        assert!(other.get("de").await.is_none());
    }

    #[tokio::test]
    async fn test_huge_ttl_is_accepted() {
        let store = SessionStore::new(Freshness::from_secs(Some(99_999_999_999)));
        let old = SessionCredential::new("a=1", Utc::now() - ChronoDuration::days(3650));
        store.put("fr", old).await;

        assert!(store.get("fr").await.is_some());
    }

    #[test]
    fn test_freshness_window() {
        let policy = Freshness::from_secs(Some(60));
        let now = Utc::now();
        let fresh = SessionCredential::new("a=1", now - ChronoDuration::seconds(59));
        let stale = SessionCredential::new("a=1", now - ChronoDuration::seconds(60));

        assert!(policy.is_fresh(&fresh, now));
        assert!(!policy.is_fresh(&stale, now));
    }

    #[test]
    fn test_from_token() {
        let credential = SessionCredential::from_token("_vinted_fr_session", "abc");
        assert_eq!(credential.cookie, "_vinted_fr_session=abc");
    }
}
