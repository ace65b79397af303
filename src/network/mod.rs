//! HTTP networking module
//!
//! Transport and identity capabilities consumed by the session and search layers.

mod client;
mod request;
mod user_agent;

pub use client::HttpClient;
pub use request::{HttpRequest, HttpRequester, HttpResponse};
pub use user_agent::{accept_json, generate_user_agent, FixedUserAgent, RandomUserAgent, UserAgentProvider};
