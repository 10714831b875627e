// ── Runtime catalogue configuration ──
//
// Describes *where* the catalogue comes from and how to reach it.
// Never touches disk: the CLI/TUI resolve a `CatalogueConfig` through
// `shopview-config` and hand it in.

use std::time::Duration;

use url::Url;

/// Product source used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://fakestoreapi.com/products";

/// Configuration for loading one catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueConfig {
    /// Endpoint answering `GET` with a JSON array of products.
    pub endpoint: Url,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    /// Override for the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl CatalogueConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: None,
            user_agent: None,
        }
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"))
    }
}
