use thiserror::Error;

/// Top-level error type for the `shopview-api` crate.
///
/// Covers every way a catalogue request can go wrong: transport,
/// non-success HTTP status, and payload decoding. `shopview-core` collapses
/// all of these into a single load failure.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body_preview}")]
    Status { status: u16, body_preview: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this looks like a transient network condition.
    ///
    /// Only used for diagnostics; nothing in the workspace retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Truncate a response body to a short, char-boundary-safe preview.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
