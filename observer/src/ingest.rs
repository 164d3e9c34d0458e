//! Ingest task: drains the observation tap and drives the session + panel.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use txlens::payload::TransferBatch;

use crate::state::SharedState;

/// Spawn the task bridging tap → session → panel notification.
///
/// Batches arrive in transport-delivery order, not request-issue order; the
/// session dedups, so re-delivery is harmless.
pub fn spawn_ingest(
    state: SharedState,
    mut rx: mpsc::UnboundedReceiver<TransferBatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(batch) = rx.recv().await {
            let batch_len = batch.len();
            let count = state.session.write().unwrap().ingest(batch);

            log::info!(
                "Intercepted {} transfer record(s), {} transactions known",
                batch_len,
                count
            );

            // TRANSACTIONS_READY: enable the panel's analyze action.
            state.panel.write().unwrap().on_transactions_ready(count);
        }
        log::debug!("Observation tap closed, ingest task exiting");
    })
}
