//! HTTP client for talking to the marketplace

use super::request::{HttpRequest, HttpRequester, HttpResponse};
use crate::config::OutgoingSettings;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info};

/// reqwest-backed [`HttpRequester`]
///
/// Cookies are never stored by the client itself; the session layer decides
/// which `cookie` header each request carries.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            info!("Using proxy {}", proxy_url);
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                info!("Using HTTP proxy {}", http);
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                info!("Using HTTPS proxy {}", https);
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self { client })
    }

    /// Parse response into HttpResponse
    async fn parse_response(response: Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.to_string(), v.to_string()))
            })
            .collect();

        let text = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            text,
        })
    }
}

#[async_trait]
impl HttpRequester for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut req_builder = self.client.get(&request.url);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder.send().await?;
        debug!("{} -> {}", request.url, response.status());

        Self::parse_response(response).await
    }
}
