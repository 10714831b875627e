//! Catalogue loading, state, and search projection between `shopview-api`
//! and the rendering surfaces (CLI / TUI).
//!
//! - **[`Catalogue`]**: handle owning the single fetch a catalogue ever
//!   performs. [`load()`](Catalogue::load) runs it in place,
//!   [`spawn_load()`](Catalogue::spawn_load) runs it on the runtime. The
//!   outcome is published through a `tokio::sync::watch` channel of
//!   [`LoadPhase`]; late responses after [`close()`](Catalogue::close) are
//!   dropped.
//!
//! - **[`CatalogueState`]**: read-only `{products, loading, error}` snapshot
//!   derived from the current phase.
//!
//! - **[`projector`]**: pure case-insensitive title filter.
//!
//! - **[`CatalogueView`]**: per-surface view model holding the search query
//!   and the projection; it decides which [`Presentation`] to draw.
//!
//! - **[`ProductSource`]**: seam between the loader and the product origin.
//!   [`HttpSource`] fetches from a JSON endpoint.

pub mod catalogue;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod projector;
pub mod source;
pub mod state;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalogue::{Catalogue, LoadOutcome};
pub use config::{CatalogueConfig, DEFAULT_ENDPOINT};
pub use error::CoreError;
pub use model::{Product, ProductId, Rating};
pub use projector::project;
pub use source::{HttpSource, ProductSource};
pub use state::{CatalogueState, LoadPhase, ProductList};
pub use view::{CatalogueView, Presentation, ViewSnapshot};
