// ── Catalogue view ──
//
// The state a rendering surface keeps between frames: the latest
// catalogue snapshot, the search query, and the projection of one through
// the other. Both inbound events recompute the projection on the spot.

use std::sync::Arc;

use crate::model::Product;
use crate::projector::project;
use crate::state::CatalogueState;

/// What a surface should draw, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation<'a> {
    Loading,
    Failed,
    /// Loaded fine, but nothing survives the current query.
    NoResults,
    Products(&'a [Arc<Product>]),
}

/// Everything a surface needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot<'a> {
    pub loading: bool,
    pub error: bool,
    pub products: &'a [Arc<Product>],
    pub query: &'a str,
    /// Size of the unfiltered catalogue.
    pub total: usize,
}

/// Per-surface view model. Not shared between surfaces.
#[derive(Debug, Clone, Default)]
pub struct CatalogueView {
    state: CatalogueState,
    query: String,
    projected: Vec<Arc<Product>>,
}

impl CatalogueView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known state and query.
    pub fn with_state(state: CatalogueState, query: impl Into<String>) -> Self {
        let mut view = Self {
            state,
            query: query.into(),
            projected: Vec::new(),
        };
        view.reproject();
        view
    }

    // ── Events ───────────────────────────────────────────────────

    pub fn on_state_changed(&mut self, state: CatalogueState) {
        self.state = state;
        self.reproject();
    }

    pub fn on_query_changed(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.reproject();
    }

    fn reproject(&mut self) {
        self.projected = project(self.state.products(), &self.query);
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &CatalogueState {
        &self.state
    }

    pub fn projected(&self) -> &[Arc<Product>] {
        &self.projected
    }

    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        ViewSnapshot {
            loading: self.state.is_loading(),
            error: self.state.has_error(),
            products: &self.projected,
            query: &self.query,
            total: self.state.products().len(),
        }
    }

    pub fn presentation(&self) -> Presentation<'_> {
        if self.state.is_loading() {
            Presentation::Loading
        } else if self.state.has_error() {
            Presentation::Failed
        } else if self.projected.is_empty() {
            Presentation::NoResults
        } else {
            Presentation::Products(&self.projected)
        }
    }
}
