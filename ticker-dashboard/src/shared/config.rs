/// Dashboard configuration
///
/// Values come from environment variables with defaults, overridable through
/// the builder methods.
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SOURCE: &str = "http://127.0.0.1:8080/data.json";

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Payload location: an http(s) URL, a file:// URL or a local path
    pub source: String,
    /// Interval between polls
    pub poll_interval: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// UI redraw interval
    pub tick_rate: Duration,
    /// File receiving tracing output (the terminal belongs to the UI)
    pub log_file: PathBuf,
    /// Buffered poll outcomes before the poller waits on the UI
    pub channel_buffer_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            poll_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            tick_rate: Duration::from_millis(250),
            log_file: std::env::temp_dir().join("ticker-dashboard.log"),
            channel_buffer_size: 16,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration with a custom payload source
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Build from `DASHBOARD_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable numbers fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        Self {
            source: lookup("DASHBOARD_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.source),
            poll_interval: secs("DASHBOARD_POLL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            request_timeout: secs("DASHBOARD_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            tick_rate: secs("DASHBOARD_TICK_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_rate),
            log_file: lookup("DASHBOARD_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            channel_buffer_size: defaults.channel_buffer_size,
        }
    }

    /// Set poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set UI redraw interval
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Set log file path
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    /// Set outcome channel buffer size
    pub fn with_channel_buffer_size(mut self, size: usize) -> Self {
        self.channel_buffer_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.source, "http://127.0.0.1:8080/data.json");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.tick_rate, Duration::from_millis(250));
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::new("./public/data.json")
            .with_poll_interval(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(2))
            .with_tick_rate(Duration::from_millis(100))
            .with_log_file("/tmp/dash.log")
            .with_channel_buffer_size(0);

        assert_eq!(config.source, "./public/data.json");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.tick_rate, Duration::from_millis(100));
        assert_eq!(config.log_file, PathBuf::from("/tmp/dash.log"));
        assert_eq!(config.channel_buffer_size, 1);
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DASHBOARD_URL", "http://dash.local/data.json"),
            ("DASHBOARD_POLL_SECS", "12"),
            ("DASHBOARD_TICK_MS", "500"),
        ]
        .into_iter()
        .collect();

        let config = DashboardConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.source, "http://dash.local/data.json");
        assert_eq!(config.poll_interval, Duration::from_secs(12));
        assert_eq!(config.tick_rate, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let config = DashboardConfig::from_lookup(|key| match key {
            "DASHBOARD_POLL_SECS" => Some("soon".to_string()),
            "DASHBOARD_TIMEOUT_SECS" => Some("0".to_string()),
            "DASHBOARD_URL" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config, DashboardConfig::default());
    }
}
