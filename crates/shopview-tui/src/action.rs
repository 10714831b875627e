//! Actions flowing through the app loop.
//!
//! Key handlers and the data bridge produce actions; the app and the
//! catalogue screen consume them.

use shopview_core::CatalogueState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Toast shown in the bottom-right corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data ──
    /// The catalogue published a new `{products, loading, error}` snapshot.
    CatalogueUpdated(CatalogueState),

    // ── Search ──
    /// Focus the search box.
    OpenSearch,
    /// Leave the search box, keeping the query.
    CloseSearch,
    /// The query text changed.
    SearchInput(String),

    // ── Overlays ──
    ToggleHelp,
    Notify(Notification),
}
