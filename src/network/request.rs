//! Request and response types exchanged with an [`HttpRequester`]

use async_trait::async_trait;

/// Outgoing GET request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// URL to request, query string included
    pub url: String,
    /// Request headers, sent in order
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// First header value with the given name (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in received order; repeated names are kept
    pub headers: Vec<(String, String)>,
    /// Response body as text
    pub text: String,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            text: String::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// All values of a header (case-insensitive), in received order
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every `set-cookie` value
    pub fn set_cookies(&self) -> impl Iterator<Item = &str> {
        self.header_values("set-cookie")
    }

    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the session cookie was refused
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Transport capability used by the session and search layers
#[async_trait]
pub trait HttpRequester: Send + Sync {
    /// Send a request and return the raw response, whatever its status
    async fn execute(&self, request: HttpRequest) -> anyhow::Result<HttpResponse>;
}
