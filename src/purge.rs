use std::time::Duration;

use tokio::sync::watch;

use crate::state::SharedState;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);
const LIMITER_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Spawn the background maintenance loop: deletes blacklist rows past
/// their expiry and drops stale rate-limiter entries. Without the purge
/// the blacklist grows without bound under sustained logout traffic.
pub fn spawn(state: SharedState, shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(state, shutdown))
}

async fn run(state: SharedState, mut shutdown: watch::Receiver<bool>) {
    tracing::debug!("Blacklist purge task started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        match state.store.purge_expired_tokens().await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("Purged {n} expired blacklist rows"),
            Err(e) => tracing::error!("Blacklist purge failed: {e}"),
        }

        state.login_limiter.cleanup(LIMITER_MAX_AGE);

        tokio::select! {
            _ = tokio::time::sleep(PURGE_INTERVAL) => {}
            _ = shutdown.changed() => {}
        }
    }

    tracing::debug!("Blacklist purge task stopped");
}
