//! Data bridge: connects the [`Catalogue`] watch channel to TUI actions.
//!
//! Runs as a background task. Starts the catalogue's single load, then
//! forwards every phase change as [`Action::CatalogueUpdated`] until the
//! load settles or the app shuts down.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use shopview_core::{Catalogue, CatalogueState, LoadPhase, ProductSource};

use crate::action::{Action, Notification};

/// Drive one catalogue load and stream its state into the action channel.
///
/// On cancellation the catalogue is closed, so a response that arrives
/// afterwards is discarded instead of published.
pub async fn spawn_data_bridge<S: ProductSource>(
    catalogue: Catalogue<S>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut phase_rx = catalogue.subscribe();
    let load = catalogue.spawn_load();

    // Initial snapshot so the screen shows the loading state immediately
    let initial = phase_rx.borrow_and_update().clone();
    if forward(&action_tx, &initial) {
        return;
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                debug!("data bridge cancelled, closing catalogue");
                catalogue.close();
                load.abort();
                return;
            }

            changed = phase_rx.changed() => {
                if changed.is_err() {
                    debug!("catalogue dropped, data bridge exiting");
                    return;
                }
                let current = phase_rx.borrow_and_update().clone();
                if forward(&action_tx, &current) {
                    break;
                }
            }
        }
    }

    if let Ok(outcome) = load.await {
        info!(?outcome, "catalogue load finished");
    }
}

/// Send the state for `phase` (plus a toast once it settles). Returns `true`
/// once there is nothing more to forward.
fn forward(action_tx: &mpsc::UnboundedSender<Action>, phase: &LoadPhase) -> bool {
    if action_tx
        .send(Action::CatalogueUpdated(CatalogueState::from(phase)))
        .is_err()
    {
        return true;
    }

    let toast = match phase {
        LoadPhase::Loaded(list) => Some(Notification::info(format!(
            "Loaded {} products",
            list.len()
        ))),
        LoadPhase::Failed => Some(Notification::error("Failed to load products.")),
        LoadPhase::Idle | LoadPhase::Loading => None,
    };
    if let Some(toast) = toast {
        let _ = action_tx.send(Action::Notify(toast));
    }

    phase.is_terminal()
}
