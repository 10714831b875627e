// ── Product sources ──
//
// The seam between the catalogue loader and wherever products come from.
// `HttpSource` is the only production implementation; tests plug in their
// own to script outcomes and timing.

use std::future::Future;

use shopview_api::{ProductsClient, TransportConfig};
use tracing::debug;

use crate::config::CatalogueConfig;
use crate::convert::products_from_raw;
use crate::error::CoreError;
use crate::model::Product;

/// Something that can produce the full product list in one shot.
///
/// Implementations must not retry: the loader treats every `Err` as the
/// final word on this catalogue's lifetime.
pub trait ProductSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Product>, CoreError>> + Send;

    /// Human-readable label for log lines.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_owned()
    }
}

// ── HttpSource ───────────────────────────────────────────────────

/// Fetches products from a JSON endpoint over HTTP.
pub struct HttpSource {
    client: ProductsClient,
}

impl HttpSource {
    pub fn new(config: &CatalogueConfig) -> Result<Self, CoreError> {
        let mut transport = TransportConfig::default();
        if let Some(timeout) = config.timeout {
            transport = transport.with_timeout(timeout);
        }
        if let Some(ref agent) = config.user_agent {
            transport.user_agent.clone_from(agent);
        }

        let client = ProductsClient::new(config.endpoint.clone(), &transport)?;
        Ok(Self { client })
    }

    pub fn with_client(client: ProductsClient) -> Self {
        Self { client }
    }
}

impl ProductSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Product>, CoreError> {
        let raw = self.client.list_products().await?;
        debug!(records = raw.len(), "decoded catalogue payload");
        products_from_raw(raw)
    }

    fn describe(&self) -> String {
        self.client.endpoint().to_string()
    }
}
