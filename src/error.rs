//! Error types for the Vinted client

use thiserror::Error;

/// Errors surfaced by credential acquisition and catalog requests.
///
/// An unrecognised input URL is not an error: translation reports it as an
/// invalid [`ParsedQuery`](crate::query::ParsedQuery) and searches return an
/// empty item list.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable session cookie could be obtained
    #[error("Credential acquisition failed: {0}")]
    CredentialAcquisition(String),

    /// The API rejected a freshly acquired credential
    #[error("Authentication failed for domain '{domain}' after refreshing the session")]
    Authentication { domain: String },

    /// Non-success status, or a transport failure when `status` is `None`
    #[error("Upstream HTTP error ({}): {message}", status_label(.status))]
    UpstreamHttp {
        status: Option<u16>,
        message: String,
    },

    /// Success status with a body that is not the expected JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    pub(crate) fn status(status: u16) -> Self {
        Self::UpstreamHttp {
            status: Some(status),
            message: format!("HTTP error: {}", status),
        }
    }

    pub(crate) fn transport(err: anyhow::Error) -> Self {
        Self::UpstreamHttp {
            status: None,
            message: err.to_string(),
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "no status".to_string(),
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
