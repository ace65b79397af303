//! Search execution with session refresh

use super::models::{Item, ItemsPage};
use crate::config::{Settings, VintedSettings};
use crate::error::{Error, Result};
use crate::network::{accept_json, HttpClient, HttpRequest, HttpRequester, RandomUserAgent, UserAgentProvider};
use crate::query::{translate, TranslateOptions};
use crate::session::{CookieAcquirer, Freshness, SessionCredential, SessionStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Catalog search endpoint
pub const CATALOG_ITEMS_PATH: &str = "/api/v2/catalog/items";

/// Times a rejected session is refreshed before giving up
const MAX_AUTH_RETRIES: usize = 1;

/// Client for the catalog API.
///
/// Owns the session store, so credentials are reused across calls made
/// through the same client (and its clones).
#[derive(Clone)]
pub struct VintedClient {
    requester: Arc<dyn HttpRequester>,
    user_agents: Arc<dyn UserAgentProvider>,
    store: SessionStore,
    acquirer: CookieAcquirer,
    settings: VintedSettings,
}

impl VintedClient {
    /// Create a client using reqwest and random user agents
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        Ok(Self::with_requester(
            Arc::new(client),
            Arc::new(RandomUserAgent),
            settings.vinted.clone(),
        ))
    }

    /// Create a client over custom transport and identity capabilities
    pub fn with_requester(
        requester: Arc<dyn HttpRequester>,
        user_agents: Arc<dyn UserAgentProvider>,
        settings: VintedSettings,
    ) -> Self {
        let store = SessionStore::new(Freshness::from_secs(settings.session_ttl));
        let acquirer = CookieAcquirer::new(
            requester.clone(),
            user_agents.clone(),
            store.clone(),
            settings.clone(),
        );

        Self {
            requester,
            user_agents,
            store,
            acquirer,
            settings,
        }
    }

    /// Session cookie cache used by this client
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Fetch and cache a fresh session cookie for a domain
    pub async fn fetch_credential(&self, domain: &str) -> Result<SessionCredential> {
        self.acquirer.acquire(domain).await
    }

    /// Search the catalog for a marketplace URL.
    ///
    /// URLs that are not regional marketplace URLs give an empty list.
    pub async fn search(&self, url: &str, options: &TranslateOptions) -> Result<Vec<Item>> {
        let Some((domain, querystring)) = translate(url, options).into_parts() else {
            info!("Invalid URL: {}", url);
            return Ok(Vec::new());
        };

        let api_url = format!(
            "{}{}?{}",
            self.settings.base_url_for(&domain),
            CATALOG_ITEMS_PATH,
            querystring
        );

        self.fetch_items(&domain, &api_url).await
    }

    /// Listings the marketplace considers similar to `item_id`
    pub async fn similar_items(&self, item_id: u64, domain: &str) -> Result<Vec<Item>> {
        let api_url = format!(
            "{}/api/v2/items/{}/plugins/items?name=similar_items",
            self.settings.base_url_for(domain),
            item_id
        );

        self.fetch_items(domain, &api_url).await
    }

    /// Cached cookie, else a pre-provisioned one, else a freshly fetched one
    async fn resolve_credential(&self, domain: &str) -> Result<SessionCredential> {
        if let Some(credential) = self.store.get(domain).await {
            return Ok(credential);
        }

        if let Some(token) = self.settings.preset_cookie(domain) {
            debug!("Using pre-provisioned cookie for {}", domain);
            return Ok(SessionCredential::from_token(
                &self.settings.session_cookie_name,
                token,
            ));
        }

        info!("No cached cookie for {}, fetching new one", domain);
        self.acquirer.acquire(domain).await
    }

    async fn fetch_items(&self, domain: &str, api_url: &str) -> Result<Vec<Item>> {
        let mut credential = self.resolve_credential(domain).await?;

        for attempt in 0..=MAX_AUTH_RETRIES {
            let request = HttpRequest::get(api_url)
                .header("user-agent", self.user_agents.next_user_agent())
                .header("accept", accept_json())
                .header("cookie", credential.cookie.as_str());

            let response = self
                .requester
                .execute(request)
                .await
                .map_err(Error::transport)?;
            debug!("{} -> {}", api_url, response.status);

            if response.is_success() {
                let page: ItemsPage = response
                    .json()
                    .map_err(|e| Error::MalformedResponse(e.to_string()))?;
                return Ok(page.into_items());
            }

            if !response.is_auth_failure() {
                return Err(Error::status(response.status));
            }

            self.store.invalidate(domain).await;
            if attempt == MAX_AUTH_RETRIES {
                break;
            }

            warn!(
                "Session cookie for {} rejected with {}, refreshing",
                domain, response.status
            );
            // Retry with exactly the cookie just fetched, whatever the cache keeps
            credential = self.acquirer.acquire(domain).await?;
        }

        Err(Error::Authentication {
            domain: domain.to_string(),
        })
    }
}
