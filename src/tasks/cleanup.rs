//! Expiry Sweep Task
//!
//! Drops expired cache entries and sessions on a fixed interval. Reads already
//! ignore expired data; the sweep only bounds memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::auth::SessionStore;
use crate::cache::CacheLayer;

/// Spawns the sweep. Abort the returned handle on shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<dyn CacheLayer>,
    sessions: Arc<SessionStore>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let entries = cache.purge_expired().await;
            let expired_sessions = sessions.purge_expired().await;

            if entries > 0 || expired_sessions > 0 {
                info!(
                    "Expiry sweep: removed {} cache entries and {} sessions",
                    entries, expired_sessions
                );
            } else {
                debug!("Expiry sweep: nothing expired");
            }
        }
    })
}
