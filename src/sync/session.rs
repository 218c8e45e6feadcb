//! Consumer-side synchronization: cheap commit probing with wholesale
//! snapshot replacement.

use std::time::Duration;

use tracing::{info, warn};

use super::fetch::SnapshotClient;
use super::types::AppData;

/// One dashboard client's view of the published state.
///
/// Created at session start and alive for the session's lifetime; holds
/// the last observed commit and the last successfully decoded snapshot.
/// `data` is only ever replaced as a whole, so readers never observe a
/// mixed-version snapshot.
pub struct SyncSession {
    client: SnapshotClient,
    last_commit: Option<i64>,
    data: Option<AppData>,
    stale: bool,
}

impl SyncSession {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: SnapshotClient::new(base_url),
            last_commit: None,
            data: None,
            stale: false,
        }
    }

    pub fn data(&self) -> Option<&AppData> {
        self.data.as_ref()
    }

    /// True when the last refresh attempt failed and the visible snapshot
    /// may be out of date.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// One poll: read the commit version, and only on a change pay for the
    /// full batch fetch. Returns whether a new snapshot was installed.
    ///
    /// A failed batch leaves the previous snapshot visible and marks the
    /// session stale; the next poll retries unconditionally because the
    /// stored commit is only advanced after a successful swap.
    pub async fn poll_once(&mut self) -> Result<bool, String> {
        let commit = match self.client.fetch_commit().await {
            Ok(commit) => commit,
            Err(e) => {
                self.stale = true;
                return Err(e);
            }
        };

        if self.last_commit == Some(commit) {
            return Ok(false);
        }

        match self.client.fetch_app_data(commit).await {
            Ok(data) => {
                self.data = Some(data);
                self.last_commit = Some(commit);
                self.stale = false;
                info!("Snapshot refreshed at commit {}", commit);
                Ok(true)
            }
            Err(e) => {
                self.stale = true;
                Err(e)
            }
        }
    }

    /// Poll once immediately, then on a fixed interval, forever. Failures
    /// are logged and retried on the next tick with no backoff.
    pub async fn run(mut self, poll_interval: Duration) {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once().await {
                warn!("Snapshot refresh failed, keeping previous data: {}", e);
            }
        }
    }
}
