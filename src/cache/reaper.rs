//! Background reclamation of stale cache entries
//!
//! Runs a Tokio task that wakes on a fixed period and removes every stale entry
//! from the shared map. The task stops when signalled through its handle, or is
//! aborted when the handle is dropped without a shutdown.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use super::store::{sweep, EntryMap};

/// Handle for controlling a running reaper task
#[derive(Debug)]
pub(crate) struct Reaper {
    /// Channel used to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
    /// The running sweep task
    handle: JoinHandle<()>,
}

impl Reaper {
    /// Spawns the sweep task
    ///
    /// # Arguments
    /// * `entries` - Map shared with the owning cache
    /// * `max_age` - Age at which an entry is removed
    /// * `period` - Time between sweeps
    pub(crate) fn spawn(entries: Arc<Mutex<EntryMap>>, max_age: Duration, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (immediate)
            interval.tick().await;
            info!(?period, "cache reaper started");

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = sweep(&entries, max_age);
                        if removed > 0 {
                            debug!(removed, "swept stale cache entries");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            info!("cache reaper stopped");
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signals the task to stop and waits until it has exited
    pub(crate) async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        report_exit((&mut self.handle).await);
    }
}

/// Logs a reaper that ended by panicking; returns whether it did
fn report_exit(result: Result<(), JoinError>) -> bool {
    match result {
        Err(err) if err.is_panic() => {
            warn!(error = %err, "cache reaper panicked");
            true
        }
        _ => false,
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
