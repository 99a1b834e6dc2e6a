//! # Scheduled Refresh
//!
//! Explicit polling tasks with deterministic shutdown.
//!
//! ## Why Not Ambient Timers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Refresh Task Lifecycle                              │
//! │                                                                         │
//! │  spawn_refresh("orders", 5s, tick_fn)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────┐                       │
//! │  │  loop {                                      │                       │
//! │  │    select! {                                 │                       │
//! │  │      _ = interval.tick()    => tick_fn(),    │                       │
//! │  │      _ = shutdown_rx.recv() => break,        │  ◄── handle.shutdown │
//! │  │    }                                         │                       │
//! │  │  }                                           │                       │
//! │  └──────────────────────────────────────────────┘                       │
//! │                                                                         │
//! │  The platform polls (3-30s) instead of pushing. Every poll loop is     │
//! │  owned by a handle whose shutdown() is the cancellation semantic —     │
//! │  nothing keeps ticking after its scope ends.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle to a running refresh task.
///
/// Shutting down is cooperative: the loop finishes an in-flight tick
/// before exiting.
#[derive(Debug)]
pub struct RefreshHandle {
    name: &'static str,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stops the refresh loop and waits for it to exit.
    pub async fn shutdown(self) {
        debug!(task = self.name, "Shutting down refresh task");
        // Loop may already be gone; that's fine
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
        info!(task = self.name, "Refresh task stopped");
    }

    /// Whether the underlying task already exited on its own.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a refresh task that runs `tick` immediately and then once per
/// `period` until the handle is shut down.
///
/// ## Example
/// ```rust,ignore
/// let db = database.clone();
/// let handle = spawn_refresh("orders", Duration::from_secs(5), move || {
///     let db = db.clone();
///     async move {
///         if let Err(e) = reload_orders(&db).await {
///             tracing::warn!(error = %e, "Order refresh failed");
///         }
///     }
/// });
/// // ... later, when the screen unmounts:
/// handle.shutdown().await;
/// ```
pub fn spawn_refresh<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> RefreshHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        debug!(task = name, period_ms = period.as_millis() as u64, "Refresh task started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tick().await;
                }
                _ = shutdown_rx.recv() => {
                    debug!(task = name, "Refresh task received shutdown");
                    break;
                }
            }
        }
    });

    RefreshHandle {
        name,
        shutdown_tx,
        task,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
