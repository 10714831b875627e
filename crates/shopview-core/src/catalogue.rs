// ── Catalogue loader ──
//
// Owns the one fetch a catalogue ever performs and publishes its outcome
// through a watch channel. The fetch task holds only a weak reference to
// the catalogue, so a response that arrives after `close()` or after the
// last handle is dropped is discarded instead of applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::CatalogueConfig;
use crate::error::CoreError;
use crate::source::{HttpSource, ProductSource};
use crate::state::{CatalogueState, LoadPhase};

// ── LoadOutcome ──────────────────────────────────────────────────

/// What a call to [`Catalogue::load`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetch succeeded and `count` products were published.
    Loaded { count: usize },
    /// The fetch failed; the catalogue now reports an error.
    Failed,
    /// A load already ran (or is running) for this catalogue.
    AlreadyStarted,
    /// The catalogue was closed before the fetch resolved.
    Abandoned,
}

// ── Catalogue ────────────────────────────────────────────────────

/// Handle to a product catalogue.
///
/// Cheaply cloneable. Every clone observes the same state, and the whole
/// catalogue performs at most one fetch over its lifetime.
pub struct Catalogue<S: ProductSource = HttpSource> {
    inner: Arc<CatalogueInner<S>>,
}

struct CatalogueInner<S> {
    source: Arc<S>,
    phase: watch::Sender<LoadPhase>,
    started: AtomicBool,
    /// Cancelled on `close()` or when the last handle goes away.
    cancel: CancellationToken,
}

impl<S> Drop for CatalogueInner<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<S: ProductSource> Clone for Catalogue<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Catalogue<HttpSource> {
    /// Build a catalogue backed by the HTTP endpoint in `config`.
    pub fn from_config(config: &CatalogueConfig) -> Result<Self, CoreError> {
        Ok(Self::new(HttpSource::new(config)?))
    }
}

impl<S: ProductSource> Catalogue<S> {
    /// Create an idle catalogue. Nothing is fetched until [`load`](Self::load)
    /// or [`spawn_load`](Self::spawn_load).
    pub fn new(source: S) -> Self {
        let (phase, _) = watch::channel(LoadPhase::Idle);
        Self {
            inner: Arc::new(CatalogueInner {
                source: Arc::new(source),
                phase,
                started: AtomicBool::new(false),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Run the catalogue's single fetch to completion.
    ///
    /// The first call flips the phase to `Loading` as soon as it is polled
    /// and settles it to `Loaded` or `Failed`. Later calls return
    /// [`LoadOutcome::AlreadyStarted`] without touching the source.
    pub async fn load(&self) -> LoadOutcome {
        if let Err(outcome) = self.begin() {
            return outcome;
        }
        drive(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.inner.source),
            self.inner.cancel.clone(),
        )
        .await
    }

    /// Start the fetch on the tokio runtime and return immediately.
    ///
    /// The phase is already `Loading` when this returns. The spawned task
    /// does not keep the catalogue alive.
    pub fn spawn_load(&self) -> JoinHandle<LoadOutcome> {
        if let Err(outcome) = self.begin() {
            return tokio::spawn(async move { outcome });
        }
        tokio::spawn(drive(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.inner.source),
            self.inner.cancel.clone(),
        ))
    }

    /// Claim the single load slot and publish `Loading`.
    fn begin(&self) -> Result<(), LoadOutcome> {
        if self.inner.cancel.is_cancelled() {
            return Err(LoadOutcome::Abandoned);
        }
        if self.inner.started.swap(true, Ordering::AcqRel) {
            debug!("catalogue load already started, ignoring");
            return Err(LoadOutcome::AlreadyStarted);
        }
        self.inner.phase.send_replace(LoadPhase::Loading);
        info!(source = %self.inner.source.describe(), "loading catalogue");
        Ok(())
    }

    // ── Lifetime ─────────────────────────────────────────────────

    /// Stop accepting results. An in-flight fetch is abandoned and the
    /// current state is frozen as-is.
    pub fn close(&self) {
        if !self.inner.cancel.is_cancelled() {
            debug!("closing catalogue");
        }
        self.inner.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Token cancelled when this catalogue is closed or dropped.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.child_token()
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn phase(&self) -> LoadPhase {
        self.inner.phase.borrow().clone()
    }

    pub fn state(&self) -> CatalogueState {
        CatalogueState::from(&*self.inner.phase.borrow())
    }

    /// Subscribe to phase changes. The receiver sees the current phase
    /// immediately and every transition after it.
    pub fn subscribe(&self) -> watch::Receiver<LoadPhase> {
        self.inner.phase.subscribe()
    }
}

// ── Fetch task ───────────────────────────────────────────────────

async fn drive<S: ProductSource>(
    catalogue: Weak<CatalogueInner<S>>,
    source: Arc<S>,
    cancel: CancellationToken,
) -> LoadOutcome {
    let mut guard = SettleGuard {
        catalogue: catalogue.clone(),
        armed: true,
    };

    let fetched = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = source.fetch() => Some(result),
    };
    guard.armed = false;

    let Some(result) = fetched else {
        debug!("catalogue closed while loading, fetch abandoned");
        return LoadOutcome::Abandoned;
    };

    let Some(inner) = catalogue.upgrade() else {
        debug!("catalogue dropped, discarding late response");
        return LoadOutcome::Abandoned;
    };
    if inner.cancel.is_cancelled() {
        debug!("catalogue closed, discarding late response");
        return LoadOutcome::Abandoned;
    }

    match result {
        Ok(products) => {
            let count = products.len();
            inner
                .phase
                .send_replace(LoadPhase::Loaded(Arc::new(
                    products.into_iter().map(Arc::new).collect(),
                )));
            info!(count, "catalogue loaded");
            LoadOutcome::Loaded { count }
        }
        Err(e) => {
            warn!(error = %e, "failed to load products");
            inner.phase.send_replace(LoadPhase::Failed);
            LoadOutcome::Failed
        }
    }
}

/// Settles a load that never reached its own transition, e.g. because the
/// future was dropped mid-fetch or the source panicked. Leaves closed
/// catalogues alone.
struct SettleGuard<S> {
    catalogue: Weak<CatalogueInner<S>>,
    armed: bool,
}

impl<S> Drop for SettleGuard<S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Some(inner) = self.catalogue.upgrade() else {
            return;
        };
        if inner.cancel.is_cancelled() {
            return;
        }
        let settled = inner.phase.send_if_modified(|phase| {
            if matches!(phase, LoadPhase::Loading) {
                *phase = LoadPhase::Failed;
                true
            } else {
                false
            }
        });
        if settled {
            warn!("catalogue load interrupted before completion");
        }
    }
}
