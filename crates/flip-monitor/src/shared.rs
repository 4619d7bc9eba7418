use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{AlertRecord, FlipMonitor, FlipWarning, OddsFeed};

/// Monitor handle for concurrent tasks. The mutex makes odds refresh and
/// flip evaluation one critical section, so a flip is seen by one tick only.
pub type SharedMonitor = Arc<Mutex<FlipMonitor>>;

pub fn share(monitor: FlipMonitor) -> SharedMonitor {
    Arc::new(Mutex::new(monitor))
}

/// Tick under the lock and collect any early warnings raised along the way.
pub async fn tick_shared(
    monitor: &SharedMonitor,
    now: DateTime<Utc>,
    feed: &mut dyn OddsFeed,
) -> (Vec<AlertRecord>, Vec<FlipWarning>) {
    let mut guard = monitor.lock().await;
    let alerts = guard.tick(now, feed);
    let warnings = guard.drain_warnings();
    (alerts, warnings)
}
