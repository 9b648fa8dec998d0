//! Startup configuration.
//!
//! Loaded from an optional TOML file layered with `WATCHDOG_*` environment
//! variables:
//!
//! ```toml
//! refresh = "250ms"
//! staleness = "1s"
//!
//! [[monitors]]
//! name = "Navigation"
//!
//! [[monitors.tools]]
//! id = "StylusToReference"
//! label = "Stylus"
//! alert = true
//! ```
//!
//! The watchdog only reads this file; runtime edits are not written back.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::MonitorConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Tick interval, e.g. "250ms".
    pub refresh: Option<String>,
    /// Staleness threshold; follows `refresh` when unset.
    pub staleness: Option<String>,
    pub monitors: Vec<MonitorSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorSpec {
    pub name: String,
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolSpec {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_alert")]
    pub alert: bool,
}

fn default_alert() -> bool {
    true
}

impl WatchdogConfig {
    /// Load `path` (a missing file is fine) and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("WATCHDOG"))
            .build()
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(config.try_deserialize()?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Timing settings for every monitor, with CLI overrides applied on top.
    pub fn monitor_config(&self, refresh: Option<&str>, staleness: Option<&str>) -> Result<MonitorConfig> {
        let mut config = MonitorConfig::default();
        if let Some(refresh) = refresh.or(self.refresh.as_deref()) {
            config.refresh_interval = parse_duration(refresh).context("invalid refresh interval")?;
        }
        if let Some(staleness) = staleness.or(self.staleness.as_deref()) {
            config.staleness = Some(parse_duration(staleness).context("invalid staleness")?);
        }
        config.validate().context("invalid timing configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const SAMPLE: &str = r#"
        refresh = "500ms"

        [[monitors]]
        name = "Navigation"

        [[monitors.tools]]
        id = "StylusToReference"
        label = "Stylus"

        [[monitors.tools]]
        id = "NeedleToReference"
        alert = false

        [[monitors]]
        name = "Spare"
    "#;

    #[test]
    fn test_parse_monitors() {
        let config = WatchdogConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.monitors.len(), 2);

        let nav = &config.monitors[0];
        assert_eq!(nav.name, "Navigation");
        assert_eq!(nav.tools[0].label.as_deref(), Some("Stylus"));
        assert!(nav.tools[0].alert);
        assert!(nav.tools[1].label.is_none());
        assert!(!nav.tools[1].alert);
        assert!(config.monitors[1].tools.is_empty());
    }

    #[test]
    fn test_monitor_config_defaults_and_overrides() {
        let config = WatchdogConfig::from_toml(SAMPLE).unwrap();

        let from_file = config.monitor_config(None, None).unwrap();
        assert_eq!(from_file.refresh_interval, Duration::from_millis(500));
        assert_eq!(from_file.threshold(), Duration::from_millis(500));

        let overridden = config.monitor_config(Some("100ms"), Some("2s")).unwrap();
        assert_eq!(overridden.refresh_interval, Duration::from_millis(100));
        assert_eq!(overridden.threshold(), Duration::from_secs(2));

        let empty = WatchdogConfig::default().monitor_config(None, None).unwrap();
        assert_eq!(empty, MonitorConfig::default());
    }

    #[test]
    fn test_bad_duration_is_reported() {
        let config = WatchdogConfig::from_toml(r#"refresh = "soon""#).unwrap();
        assert!(config.monitor_config(None, None).is_err());
    }

    #[test]
    fn test_zero_staleness_is_refused() {
        let config = WatchdogConfig::default();
        assert!(config.monitor_config(None, Some("0ms")).is_err());
        assert!(config.monitor_config(Some("0s"), None).is_err());

        let from_file = WatchdogConfig::from_toml(r#"staleness = "0ms""#).unwrap();
        assert!(from_file.monitor_config(None, None).is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = WatchdogConfig::load(&dir.path().join("watchdog.toml")).unwrap();
        assert!(config.monitors.is_empty());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let config = WatchdogConfig::load(file.path()).unwrap();
        assert_eq!(config.monitors[0].tools.len(), 2);
    }
}
