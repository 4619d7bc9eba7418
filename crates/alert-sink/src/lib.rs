mod channels;
mod templates;

pub use channels::{LogChannel, MemoryChannel};
pub use templates::{color_for, title_for, AlertText};

use std::sync::Arc;

use async_trait::async_trait;
use flip_monitor::AlertRecord;

/// Trait for alert delivery channels.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    async fn send(&self, alert: &AlertRecord) -> Result<(), SinkError>;
    fn name(&self) -> &str;
}

/// Errors from alert delivery.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Webhook error: {0}")]
    Webhook(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Which channels the dispatcher should build.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub webhook_url: Option<String>,
    pub log_alerts: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            log_alerts: true,
        }
    }
}

impl SinkConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("ALERT_WEBHOOK_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            log_alerts: std::env::var("ALERT_LOG")
                .map(|v| !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }
}

/// Fans every alert out to all configured channels. A failing channel is
/// logged and skipped; delivery never fails the caller.
#[derive(Clone, Default)]
pub struct AlertDispatcher {
    channels: Arc<Vec<Box<dyn AlertChannel>>>,
}

impl AlertDispatcher {
    pub fn new(config: &SinkConfig) -> Self {
        let mut channels: Vec<Box<dyn AlertChannel>> = Vec::new();

        if config.log_alerts {
            channels.push(Box::new(LogChannel));
        }

        if let Some(ref webhook_url) = config.webhook_url {
            match WebhookChannel::new(webhook_url) {
                Ok(channel) => {
                    tracing::info!("Webhook alerts enabled");
                    channels.push(Box::new(channel));
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize webhook channel: {}", e);
                }
            }
        }

        if channels.is_empty() {
            tracing::info!("No alert channels configured (set ALERT_WEBHOOK_URL or ALERT_LOG)");
        }

        Self {
            channels: Arc::new(channels),
        }
    }

    pub fn with_channels(channels: Vec<Box<dyn AlertChannel>>) -> Self {
        Self {
            channels: Arc::new(channels),
        }
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Send to every channel, awaiting completion. Returns how many
    /// channels accepted the alert.
    pub async fn dispatch(&self, alert: &AlertRecord) -> usize {
        let mut delivered = 0;
        for channel in self.channels.iter() {
            match channel.send(alert).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!("Sent alert via {}", channel.name());
                }
                Err(e) => {
                    tracing::warn!("Failed to send alert via {}: {}", channel.name(), e)
                }
            }
        }
        delivered
    }

    /// Fire-and-forget delivery on a spawned task.
    pub fn dispatch_detached(&self, alert: AlertRecord) -> tokio::task::JoinHandle<usize> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(&alert).await })
    }
}

/// Discord-style webhook channel.
pub struct WebhookChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(webhook_url: &str) -> Result<Self, SinkError> {
        let parsed = reqwest::Url::parse(webhook_url)
            .map_err(|e| SinkError::Config(format!("invalid webhook URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SinkError::Config(format!(
                "webhook URL must be http(s), got {}",
                parsed.scheme()
            )));
        }
        Ok(Self {
            webhook_url: webhook_url.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Request body posted for `alert`.
    pub fn payload(alert: &AlertRecord) -> serde_json::Value {
        serde_json::json!({
            "embeds": [{
                "title": alert.headline(),
                "description": alert.summary(),
                "color": color_for(alert.urgency),
                "timestamp": alert.raised_at.to_rfc3339(),
                "fields": [
                    { "name": "Urgency", "value": alert.urgency.label(), "inline": true },
                    {
                        "name": "Win probability",
                        "value": format!("{:.0}%", alert.model_win_probability * 100.0),
                        "inline": true
                    },
                    { "name": "Edge", "value": format!("{:+.1}%", alert.edge), "inline": true }
                ]
            }]
        })
    }
}

#[async_trait]
impl AlertChannel for WebhookChannel {
    async fn send(&self, alert: &AlertRecord) -> Result<(), SinkError> {
        self.client
            .post(&self.webhook_url)
            .json(&Self::payload(alert))
            .send()
            .await
            .map_err(|e| SinkError::Webhook(e.to_string()))?
            .error_for_status()
            .map_err(|e| SinkError::Webhook(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use betting_core::AmericanOdds;
    use chrono::{TimeZone, Utc};
    use flip_monitor::Urgency;

    struct FailingChannel;

    #[async_trait]
    impl AlertChannel for FailingChannel {
        async fn send(&self, _alert: &AlertRecord) -> Result<(), SinkError> {
            Err(SinkError::Webhook("503 Service Unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn alert(urgency: Urgency) -> AlertRecord {
        AlertRecord {
            game_id: "KCvsBUF".to_string(),
            team: "Chiefs".to_string(),
            opponent: "Bills".to_string(),
            sport: Some("NFL".to_string()),
            original_odds: AmericanOdds::new(-220).unwrap(),
            current_odds: AmericanOdds::new(230).unwrap(),
            edge: 47.7,
            model_win_probability: 0.78,
            urgency,
            hot_signal: true,
            raised_at: Utc.with_ymd_and_hms(2025, 10, 31, 1, 5, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_failing_channel_does_not_block_others() {
        let memory = MemoryChannel::new();
        let channels: Vec<Box<dyn AlertChannel>> =
            vec![Box::new(FailingChannel), Box::new(memory.clone())];
        let dispatcher = AlertDispatcher::with_channels(channels);

        let delivered = dispatcher.dispatch(&alert(Urgency::Critical)).await;

        assert_eq!(delivered, 1);
        let records = memory.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].game_id, "KCvsBUF");
    }

    #[tokio::test]
    async fn test_detached_dispatch() {
        let memory = MemoryChannel::new();
        let channels: Vec<Box<dyn AlertChannel>> = vec![Box::new(memory.clone())];
        let dispatcher = AlertDispatcher::with_channels(channels);

        let delivered = dispatcher
            .dispatch_detached(alert(Urgency::High))
            .await
            .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(memory.len().await, 1);
    }

    #[test]
    fn test_webhook_payload() {
        let payload = WebhookChannel::payload(&alert(Urgency::Critical));
        let embed = &payload["embeds"][0];

        assert_eq!(embed["title"], "CRITICAL SIGNAL: Chiefs flipped to +230 underdog");
        assert_eq!(embed["color"], 0xff0000);
        assert_eq!(embed["timestamp"], "2025-10-31T01:05:00+00:00");
        assert_eq!(embed["fields"][1]["value"], "78%");
        assert_eq!(embed["fields"][2]["value"], "+47.7%");
    }

    #[test]
    fn test_webhook_rejects_bad_urls() {
        assert!(matches!(
            WebhookChannel::new("not a url"),
            Err(SinkError::Config(_))
        ));
        assert!(matches!(
            WebhookChannel::new("ftp://example.com/hook"),
            Err(SinkError::Config(_))
        ));
        assert!(WebhookChannel::new("https://discord.com/api/webhooks/1/abc").is_ok());
    }

    #[test]
    fn test_dispatcher_from_config() {
        let dispatcher = AlertDispatcher::new(&SinkConfig {
            webhook_url: Some("https://discord.com/api/webhooks/1/abc".to_string()),
            log_alerts: true,
        });
        assert_eq!(dispatcher.channel_names(), vec!["log", "webhook"]);

        let dispatcher = AlertDispatcher::new(&SinkConfig {
            webhook_url: Some("::bad::".to_string()),
            log_alerts: false,
        });
        assert!(dispatcher.channel_names().is_empty());
    }
}
