//! **Web Tools**: `websearch` and `fetch_url`
//!
//! Gated behind the `web-tools` Cargo feature flag:
//!
//! ```toml
//! # infrastructure/Cargo.toml
//! [features]
//! web-tools = ["dep:reqwest", "dep:scraper"]
//!
//! # cli/Cargo.toml (enabled by default for end users)
//! [features]
//! default = ["web-tools"]
//! web-tools = ["toolrun-infrastructure/web-tools"]
//! ```
//!
//! Both handlers share one [`reqwest::Client`] built by [`http_client`] with
//! the configured timeout. They report a progress update before issuing
//! their request.

mod fetch;
mod search;

pub use fetch::{FETCH_URL, FetchUrl, fetch_url_definition, html_to_text};
pub use search::{WebSearch, web_search_definition};

use std::time::Duration;
use tracing::warn;

/// Build the HTTP client shared by web tools.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("toolrun/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to configure HTTP client ({}), using defaults", e);
            reqwest::Client::new()
        })
}
