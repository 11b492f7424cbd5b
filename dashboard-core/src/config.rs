use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// City shown on start-up and used when the search input is blank.
pub const DEFAULT_CITY: &str = "jijel";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openweathermap.org/data/2.5";

pub const DEFAULT_MQTT_TOPIC: &str = "weather-dashboard/forecast";

pub const DEFAULT_MQTT_CLIENT_ID: &str = "weather-dashboard";

const DEFAULT_MQTT_PORT: u16 = 1883;

/// Upstream forecast API settings, used by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// MQTT broker the backend relays published forecasts through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MqttConfig {
    /// `host`, `host:port` or `tcp://host:port`.
    pub broker: String,
    pub topic: Option<String>,
    pub client_id: Option<String>,
}

impl MqttConfig {
    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_MQTT_TOPIC)
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(DEFAULT_MQTT_CLIENT_ID)
    }

    /// Host and port of the broker; the port defaults to 1883.
    pub fn broker_addr(&self) -> Result<(String, u16)> {
        let addr = self.broker.trim();
        let addr = addr.strip_prefix("tcp://").unwrap_or(addr);
        if addr.is_empty() {
            return Err(anyhow!("MQTT broker address is empty"));
        }

        match addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .with_context(|| format!("Invalid MQTT broker port in '{}'", self.broker))?;
                Ok((host.to_string(), port))
            }
            None => Ok((addr.to_string(), DEFAULT_MQTT_PORT)),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// server_url = "http://localhost:8080"
/// default_city = "jijel"
///
/// [upstream]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the dashboard backend.
    pub server_url: Option<String>,

    pub default_city: Option<String>,

    /// Client request timeout; no timeout when absent.
    pub request_timeout_secs: Option<u64>,

    /// Listen address for `serve`.
    pub bind: Option<String>,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// When absent, published forecasts stay in-process.
    pub mqtt: Option<MqttConfig>,
}

impl Config {
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn default_city(&self) -> &str {
        match self.default_city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() => city,
            _ => DEFAULT_CITY,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn upstream_url(&self) -> &str {
        self.upstream.base_url.as_deref().unwrap_or(DEFAULT_UPSTREAM_URL)
    }

    /// API key for the upstream forecast API.
    pub fn upstream_api_key(&self) -> Result<&str> {
        self.upstream.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weather-dashboard configure`, pass --api-key, or set OPENWEATHER_API_KEY."
            )
        })
    }

    pub fn set_upstream_api_key(&mut self, api_key: String) {
        self.upstream.api_key = Some(api_key);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::default();
        assert_eq!(cfg.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(cfg.default_city(), "jijel");
        assert_eq!(cfg.bind(), DEFAULT_BIND);
        assert_eq!(cfg.upstream_url(), DEFAULT_UPSTREAM_URL);
        assert!(cfg.request_timeout().is_none());
    }

    #[test]
    fn blank_default_city_falls_back() {
        let cfg = Config {
            default_city: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.default_city(), "jijel");
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(cfg.request_timeout().is_none());

        let cfg = Config {
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_api_key_has_hint() {
        let cfg = Config::default();
        let err = cfg.upstream_api_key().unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("Hint"));
    }

    #[test]
    fn parses_toml() {
        let cfg: Config = toml::from_str(
            r#"
            server_url = "http://10.0.0.2:8080"
            default_city = "oran"

            [upstream]
            api_key = "KEY"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server_url(), "http://10.0.0.2:8080");
        assert_eq!(cfg.default_city(), "oran");
        assert_eq!(cfg.upstream_api_key().unwrap(), "KEY");
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("weather-dashboard-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut cfg = Config::default();
        cfg.set_upstream_api_key("KEY".into());
        cfg.default_city = Some("algiers".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_city(), "algiers");
        assert_eq!(loaded.upstream_api_key().unwrap(), "KEY");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_from_missing_file_is_default() {
        let path = std::env::temp_dir().join("weather-dashboard-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(cfg.server_url.is_none());
    }

    #[test]
    fn parses_mqtt_section() {
        let cfg: Config = toml::from_str(
            r#"
            [mqtt]
            broker = "tcp://broker.hivemq.com:1883"
            topic = "weather/jijel"
            "#,
        )
        .unwrap();

        let mqtt = cfg.mqtt.expect("mqtt section");
        assert_eq!(
            mqtt.broker_addr().unwrap(),
            ("broker.hivemq.com".to_string(), 1883)
        );
        assert_eq!(mqtt.topic(), "weather/jijel");
        assert_eq!(mqtt.client_id(), DEFAULT_MQTT_CLIENT_ID);
    }

    #[test]
    fn mqtt_broker_without_port_uses_default() {
        let mqtt = MqttConfig {
            broker: "localhost".into(),
            ..Default::default()
        };
        assert_eq!(mqtt.broker_addr().unwrap(), ("localhost".to_string(), 1883));
        assert_eq!(mqtt.topic(), DEFAULT_MQTT_TOPIC);
    }

    #[test]
    fn mqtt_broker_with_bad_port_is_rejected() {
        let mqtt = MqttConfig {
            broker: "localhost:mqtt".into(),
            ..Default::default()
        };
        assert!(mqtt.broker_addr().is_err());

        let empty = MqttConfig::default();
        assert!(empty.broker_addr().is_err());
    }

    #[test]
    fn mqtt_is_off_by_default() {
        assert!(Config::default().mqtt.is_none());
    }
}
