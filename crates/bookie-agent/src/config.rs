use alert_sink::SinkConfig;
use anyhow::{bail, Context, Result};
use flip_monitor::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    // Scheduling
    pub odds_refresh_seconds: u64, // 3
    pub monitor_tick_seconds: u64, // 5

    // Bet sizing
    pub bankroll: f64, // $1000

    // Flip gate
    pub min_model_probability: f64, // 0.60

    // Simulation
    pub sim_seed: Option<u64>,

    // Notifications
    pub alert_webhook_url: Option<String>,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            odds_refresh_seconds: read("ODDS_REFRESH_SECONDS", "3")
                .parse()
                .context("ODDS_REFRESH_SECONDS must be a whole number of seconds")?,
            monitor_tick_seconds: read("MONITOR_TICK_SECONDS", "5")
                .parse()
                .context("MONITOR_TICK_SECONDS must be a whole number of seconds")?,
            bankroll: read("BANKROLL", "1000.0")
                .parse()
                .context("BANKROLL must be a number")?,
            min_model_probability: read("MIN_MODEL_PROB", "0.60")
                .parse()
                .context("MIN_MODEL_PROB must be a number")?,
            sim_seed: lookup("SIM_SEED")
                .filter(|s| !s.is_empty())
                .map(|s| s.parse())
                .transpose()
                .context("SIM_SEED must be an unsigned integer")?,
            alert_webhook_url: lookup("ALERT_WEBHOOK_URL").filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.odds_refresh_seconds == 0 || self.monitor_tick_seconds == 0 {
            bail!("ODDS_REFRESH_SECONDS and MONITOR_TICK_SECONDS must be at least 1");
        }
        if !self.bankroll.is_finite() || self.bankroll <= 0.0 {
            bail!("BANKROLL must be positive, got {}", self.bankroll);
        }
        if !(0.0..=1.0).contains(&self.min_model_probability) {
            bail!(
                "MIN_MODEL_PROB must be within [0, 1], got {}",
                self.min_model_probability
            );
        }
        Ok(())
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            min_model_probability: self.min_model_probability,
            ..Default::default()
        }
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            webhook_url: self.alert_webhook_url.clone(),
            ..SinkConfig::from_env()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AgentConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.odds_refresh_seconds, 3);
        assert_eq!(config.monitor_tick_seconds, 5);
        assert_eq!(config.bankroll, 1000.0);
        assert_eq!(config.min_model_probability, 0.60);
        assert!(config.sim_seed.is_none());
        assert!(config.alert_webhook_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BANKROLL", "250.5"),
            ("SIM_SEED", "42"),
            ("MIN_MODEL_PROB", "0.7"),
            ("ALERT_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
        ])
        .unwrap();
        assert_eq!(config.bankroll, 250.5);
        assert_eq!(config.sim_seed, Some(42));
        assert_eq!(config.monitor_config().min_model_probability, 0.7);
        assert!(config.alert_webhook_url.is_some());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_from(&[("BANKROLL", "-5")]).is_err());
        assert!(config_from(&[("BANKROLL", "lots")]).is_err());
        assert!(config_from(&[("MONITOR_TICK_SECONDS", "0")]).is_err());
        assert!(config_from(&[("MIN_MODEL_PROB", "1.5")]).is_err());
        assert!(config_from(&[("SIM_SEED", "-1")]).is_err());
    }
}
