// ── Core error types ──
//
// The catalogue exposes a single load failure kind. Transport errors,
// bad HTTP statuses and undecodable payloads all collapse into
// `LoadFailure`; the reason string only feeds the diagnostic log.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The initial catalogue fetch failed, for any reason.
    #[error("Failed to load products: {reason}")]
    LoadFailure { reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn load_failure(reason: impl Into<String>) -> Self {
        Self::LoadFailure {
            reason: reason.into(),
        }
    }

    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::LoadFailure { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shopview_api::Error> for CoreError {
    fn from(err: shopview_api::Error) -> Self {
        match err {
            shopview_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            other => CoreError::LoadFailure {
                reason: other.to_string(),
            },
        }
    }
}
