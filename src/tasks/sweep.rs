//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from a store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::limiter::RateLimiter;

// == Sweep Trait ==
/// A store whose expired contents can be dropped in one pass.
pub trait Sweep: Send + Sync + 'static {
    /// Removes everything that has expired, returning how many items went.
    fn sweep(&mut self) -> usize;
}

impl<V: Send + Sync + 'static> Sweep for TtlCache<V> {
    fn sweep(&mut self) -> usize {
        self.purge_expired()
    }
}

impl Sweep for RateLimiter {
    fn sweep(&mut self) -> usize {
        self.purge_expired()
    }
}

// == Sweep Handle ==
/// Owner of a running sweep task.
///
/// The task is aborted by [`SweepHandle::stop`] or when the handle is dropped.
#[derive(Debug)]
pub struct SweepHandle {
    name: &'static str,
    task: Option<JoinHandle<()>>,
}

impl SweepHandle {
    /// Aborts the task. Returns false if it had already been stopped.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                info!("Sweep task '{}' stopped", self.name);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns a background task that sweeps `store` every `interval`.
///
/// The task runs in an infinite loop, sleeping for the interval between
/// runs and holding the write lock only for the duration of one sweep.
///
/// # Arguments
/// * `name` - Label used in log lines
/// * `store` - Shared store to sweep
/// * `interval` - Time between sweeps
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(TtlCache::<String>::new(1_800_000)));
/// let mut handle = spawn_sweep_task("cache", cache.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.stop();
/// ```
pub fn spawn_sweep_task<S: Sweep>(
    name: &'static str,
    store: Arc<RwLock<S>>,
    interval: Duration,
) -> SweepHandle {
    let task = tokio::spawn(async move {
        info!(
            "Starting '{}' sweep task with interval of {} ms",
            name,
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.sweep()
            };

            if removed > 0 {
                info!("'{}' sweep: removed {} expired entries", name, removed);
            } else {
                debug!("'{}' sweep: no expired entries found", name);
            }
        }
    });

    SweepHandle {
        name,
        task: Some(task),
    }
}
