use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Dashboard settings, layered defaults -> `dashboard.toml` -> `DASH_*`
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the bot backend, no trailing slash.
    pub backend_url: String,
    /// Overview refresh cadence.
    pub refresh_secs: u64,
    /// Automation status poll cadence.
    pub auto_status_poll_secs: u64,
    /// Market tab refresh cadence (runs only while the tab is active).
    pub market_refresh_secs: u64,
    /// Rolling mean-gain window, in completed cycles.
    pub avg_window: usize,
    /// Rolling success-rate window, in completed cycles.
    pub success_window: usize,
    /// Buckets in the client-side gains histogram.
    pub histogram_buckets: usize,
    /// Rows in the top/bottom trade rankings.
    pub ranking_size: usize,
    /// Days of the cycle history split shown on the charts tab; 0 means
    /// the whole history.
    pub history_window_days: usize,
    /// On-disk location of the preference store.
    pub preferences_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            refresh_secs: 180,
            auto_status_poll_secs: 10,
            market_refresh_secs: 300,
            avg_window: 10,
            success_window: 20,
            histogram_buckets: 8,
            ranking_size: 10,
            history_window_days: 14,
            preferences_path: ".dashboard-prefs".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads settings from `path` (missing file is fine) with `DASH_*`
    /// environment variables taking precedence.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = DashboardConfig::default();
        let cfg = Config::builder()
            .set_default("backend_url", defaults.backend_url)?
            .set_default("refresh_secs", defaults.refresh_secs)?
            .set_default("auto_status_poll_secs", defaults.auto_status_poll_secs)?
            .set_default("market_refresh_secs", defaults.market_refresh_secs)?
            .set_default("avg_window", defaults.avg_window as u64)?
            .set_default("success_window", defaults.success_window as u64)?
            .set_default("histogram_buckets", defaults.histogram_buckets as u64)?
            .set_default("ranking_size", defaults.ranking_size as u64)?
            .set_default("history_window_days", defaults.history_window_days as u64)?
            .set_default("preferences_path", defaults.preferences_path)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("DASH"))
            .build()?;
        cfg.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.backend_url.is_empty() {
            errors.push("backend_url must not be empty".to_string());
        }
        if self.refresh_secs == 0 {
            errors.push("refresh_secs must be > 0".to_string());
        }
        if self.auto_status_poll_secs == 0 {
            errors.push("auto_status_poll_secs must be > 0".to_string());
        }
        if self.market_refresh_secs == 0 {
            errors.push("market_refresh_secs must be > 0".to_string());
        }
        if self.avg_window == 0 {
            errors.push("avg_window must be > 0".to_string());
        }
        if self.success_window == 0 {
            errors.push("success_window must be > 0".to_string());
        }
        if self.histogram_buckets == 0 {
            errors.push("histogram_buckets must be > 0".to_string());
        }
        if self.ranking_size == 0 {
            errors.push("ranking_size must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_secs, 180);
        assert_eq!(config.avg_window, 10);
        assert_eq!(config.success_window, 20);
        assert_eq!(config.history_window_days, 14);
    }

    #[test]
    fn zero_windows_rejected() {
        let config = DashboardConfig {
            avg_window: 0,
            refresh_secs: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = DashboardConfig::load("/nonexistent/dashboard.toml").unwrap();
        assert_eq!(config.histogram_buckets, 8);
    }
}
