//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired preview entries at the configured interval
//! - Limiter sweeps: drop stale client windows (optional)

mod sweep;

use std::time::Duration;

use tracing::info;

pub use sweep::{spawn_sweep_task, Sweep, SweepHandle};

use crate::api::AppState;
use crate::config::Config;

/// Every sweep task started for one server instance.
#[derive(Debug, Default)]
pub struct BackgroundTasks {
    sweeps: Vec<SweepHandle>,
}

impl BackgroundTasks {
    /// Starts the cache sweep and, unless disabled, one sweep per limiter.
    pub fn start(state: &AppState, config: &Config) -> Self {
        let mut sweeps = vec![spawn_sweep_task(
            "preview-cache",
            state.cache.clone(),
            Duration::from_secs(config.cleanup_interval.max(1)),
        )];

        if config.rate_limit_sweep_interval > 0 {
            let interval = Duration::from_secs(config.rate_limit_sweep_interval);
            sweeps.push(spawn_sweep_task(
                "rate-limiter",
                state.limiter.clone(),
                interval,
            ));
            sweeps.push(spawn_sweep_task(
                "health-rate-limiter",
                state.health_limiter.clone(),
                interval,
            ));
        }

        Self { sweeps }
    }

    /// Number of sweeps still owned by this set.
    pub fn len(&self) -> usize {
        self.sweeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }

    /// Stops every sweep and discards all cached entries.
    ///
    /// Safe to call more than once; later calls find nothing left to do.
    pub async fn shutdown(&mut self, state: &AppState) {
        for mut sweep in self.sweeps.drain(..) {
            sweep.stop();
        }

        let discarded = state.cache.write().await.clear();
        info!("Preview cache torn down, {} entries discarded", discarded);
    }
}
