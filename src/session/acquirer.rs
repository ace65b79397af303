//! Fetches fresh session cookies from the marketplace

use super::store::{SessionCredential, SessionStore};
use crate::config::VintedSettings;
use crate::error::{Error, Result};
use crate::network::{HttpRequest, HttpRequester, UserAgentProvider};
use cookie::Cookie;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Endpoint that hands out the session defaults and their cookies
pub const SESSION_DEFAULTS_PATH: &str = "/api/v2/configurations/session_defaults";

/// Obtains a session credential for a region domain and records it in the store
#[derive(Clone)]
pub struct CookieAcquirer {
    requester: Arc<dyn HttpRequester>,
    user_agents: Arc<dyn UserAgentProvider>,
    store: SessionStore,
    settings: VintedSettings,
}

impl CookieAcquirer {
    pub fn new(
        requester: Arc<dyn HttpRequester>,
        user_agents: Arc<dyn UserAgentProvider>,
        store: SessionStore,
        settings: VintedSettings,
    ) -> Self {
        Self {
            requester,
            user_agents,
            store,
            settings,
        }
    }

    /// Visit the landing page and the session defaults endpoint, combine
    /// every cookie they set, and store the result for `domain`.
    pub async fn acquire(&self, domain: &str) -> Result<SessionCredential> {
        let base = self.settings.base_url_for(domain);

        let mut set_cookies: Vec<String> = Vec::new();
        for url in [format!("{}/", base), format!("{}{}", base, SESSION_DEFAULTS_PATH)] {
            let request = HttpRequest::get(&url).header("user-agent", self.user_agents.next_user_agent());
            let response = self.requester.execute(request).await.map_err(|e| {
                Error::CredentialAcquisition(format!("request to {} failed: {}", url, e))
            })?;

            debug!("{} returned {} set-cookie headers", url, response.set_cookies().count());
            for value in response.set_cookies() {
                let value = value.trim();
                if !value.is_empty() && !set_cookies.iter().any(|c| c == value) {
                    set_cookies.push(value.to_string());
                }
            }
        }

        if set_cookies.is_empty() {
            return Err(Error::CredentialAcquisition(format!(
                "no cookies received for domain '{}'",
                domain
            )));
        }

        // One entry per cookie name; a later Set-Cookie replaces the earlier value
        let mut pairs: Vec<(String, String)> = Vec::new();
        for raw in &set_cookies {
            let parsed = match Cookie::parse(raw.as_str()) {
                Ok(c) => c,
                Err(e) => {
                    debug!("Skipping unparsable cookie '{}': {}", raw, e);
                    continue;
                }
            };

            let (name, value) = (parsed.name(), parsed.value());
            match pairs.iter_mut().find(|(n, _)| n == name) {
                Some(existing) => existing.1 = value.to_string(),
                None => pairs.push((name.to_string(), value.to_string())),
            }
        }

        if pairs.is_empty() {
            return Err(Error::CredentialAcquisition(format!(
                "no parsable cookies received for domain '{}'",
                domain
            )));
        }

        let cookie_name = &self.settings.session_cookie_name;
        if !pairs.iter().any(|(name, _)| name == cookie_name) {
            warn!("No {} cookie found in combined cookies for {}", cookie_name, domain);
        }

        let combined = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        let credential = SessionCredential::now(combined);
        self.store.put(domain, credential.clone()).await;
        info!("Fetched session cookie for {} ({} cookies)", domain, pairs.len());

        Ok(credential)
    }
}
