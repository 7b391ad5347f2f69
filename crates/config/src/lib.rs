use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "relaydesk.toml",
    "config/relaydesk.toml",
    "crates/config/relaydesk.toml",
    "../relaydesk.toml",
    "../config/relaydesk.toml",
    "../crates/config/relaydesk.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub broker: BrokerConfig,
    pub directory: DirectoryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            broker: BrokerConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Tunables for the message broker itself.
///
/// ```
/// use relaydesk_config::BrokerConfig;
///
/// let broker = BrokerConfig::default();
/// assert_eq!(broker.auto_reply_delay_ms, 1_500);
/// assert_eq!(broker.viewer_id, "currUser");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Delay before the demo auto-responder replies to an agent message.
    #[serde(default = "BrokerConfig::default_auto_reply_delay")]
    pub auto_reply_delay_ms: u64,
    /// Identity whose unread counts the room summaries track.
    #[serde(default = "BrokerConfig::default_viewer_id")]
    pub viewer_id: String,
}

impl BrokerConfig {
    const fn default_auto_reply_delay() -> u64 {
        1_500
    }

    fn default_viewer_id() -> String {
        "currUser".to_string()
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            auto_reply_delay_ms: Self::default_auto_reply_delay(),
            viewer_id: Self::default_viewer_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Remote roster endpoint used to refresh the agent directory at
    /// bootstrap. When unset (or unreachable) the built-in seed data is used.
    #[serde(default)]
    pub users_url: Option<String>,
    #[serde(default = "DirectoryConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl DirectoryConfig {
    const fn default_request_timeout() -> u64 {
        10
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            users_url: None,
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use relaydesk_config::load;
///
/// std::env::remove_var("RELAYDESK_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default(
            "broker.auto_reply_delay_ms",
            i64::try_from(defaults.broker.auto_reply_delay_ms).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default("broker.viewer_id", defaults.broker.viewer_id.clone())
        .unwrap()
        .set_default(
            "directory.request_timeout_seconds",
            i64::try_from(defaults.directory.request_timeout_seconds).unwrap_or(i64::MAX),
        )
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("RELAYDESK").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RELAYDESK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RELAYDESK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn load_uses_defaults_without_file_or_env() {
        std::env::remove_var("RELAYDESK_CONFIG");

        let config = load().expect("defaults should load");
        assert_eq!(config.http.port, 3001);
        assert_eq!(config.broker.auto_reply_delay_ms, 1_500);
        assert_eq!(config.broker.viewer_id, "currUser");
        assert!(config.directory.users_url.is_none());
    }

    #[test]
    #[serial]
    fn environment_overrides_take_precedence() {
        std::env::remove_var("RELAYDESK_CONFIG");
        std::env::set_var("RELAYDESK_BROKER__AUTO_REPLY_DELAY_MS", "250");

        let config = load().expect("configuration should load");
        assert_eq!(config.broker.auto_reply_delay_ms, 250);

        std::env::remove_var("RELAYDESK_BROKER__AUTO_REPLY_DELAY_MS");
    }
}
