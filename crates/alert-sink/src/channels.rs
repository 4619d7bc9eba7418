use std::sync::Arc;

use async_trait::async_trait;
use flip_monitor::AlertRecord;
use tokio::sync::Mutex;

use crate::{AlertChannel, AlertText, SinkError};

/// Writes alerts to the tracing log.
pub struct LogChannel;

#[async_trait]
impl AlertChannel for LogChannel {
    async fn send(&self, alert: &AlertRecord) -> Result<(), SinkError> {
        let record = serde_json::to_string(alert).unwrap_or_default();
        tracing::warn!(
            game_id = %alert.game_id,
            urgency = alert.urgency.label(),
            hot_signal = alert.hot_signal,
            record = %record,
            "{}",
            alert.summary()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Keeps every alert in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryChannel {
    records: Arc<Mutex<Vec<AlertRecord>>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<AlertRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl AlertChannel for MemoryChannel {
    async fn send(&self, alert: &AlertRecord) -> Result<(), SinkError> {
        self.records.lock().await.push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
