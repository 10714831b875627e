// Catalogue HTTP client
//
// Wraps `reqwest::Client` with the single request the catalogue needs:
// a plain GET against a fixed endpoint that answers with a JSON array.
// Status checks and body decoding happen here so callers only ever see
// decoded records or an `Error`.

use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, preview};
use crate::models::RawProduct;
use crate::transport::TransportConfig;

/// Raw HTTP client for a product catalogue endpoint.
///
/// Issues unauthenticated `GET` requests with no query parameters. The
/// endpoint is fixed at construction time.
pub struct ProductsClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ProductsClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, endpoint })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// The catalogue endpoint this client fetches from.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the full product list.
    ///
    /// Exactly one HTTP request per call; nothing is retried.
    pub async fn list_products(&self) -> Result<Vec<RawProduct>, Error> {
        self.get_json(self.endpoint.clone()).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a JSON body of type `T`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body_preview: preview(&body),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}
