//! Configuration for the console tap
//!
//! Settings are an explicit struct handed to `Tap::init`, validated once
//! and immutable thereafter (no ambient-global reads of the
//! `window.__CONSOLE_TAP_*__` kind a browser tap relies on). Loaders
//! for a TOML file and for environment variables are provided for hosts
//! that want the same "set a flag, get a tap" ergonomics.

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Default collector port when none is configured
pub const DEFAULT_PORT: u16 = 5055;

/// Path component of the derived collector URL
pub const ENDPOINT_PATH: &str = "/__console_tap__";

/// Environment variable enabling the tap (must be exactly "true" or "1")
pub const ENV_ENABLED: &str = "CONSOLE_TAP_ENABLED";
/// Environment variable for the runtime kill switch
pub const ENV_DISABLED: &str = "CONSOLE_TAP_DISABLED";
/// Environment variable overriding the collector port
pub const ENV_PORT: &str = "CONSOLE_TAP_PORT";
/// Environment variable overriding the full collector URL
pub const ENV_URL: &str = "CONSOLE_TAP_URL";

/// Dimensions of the host's display surface, carried on every event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 0,
            height: 0,
        }
    }
}

/// The host's analog of the browser's location/navigator ambient context
///
/// Supplied explicitly by the host; every field has a neutral default so a
/// plain `TapConfig::default()` still produces a usable derived URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageContext {
    /// URL scheme with trailing colon, e.g. "http:" or "https:"
    pub protocol: String,
    /// Host the collector is derived from when no explicit URL is set
    pub hostname: String,
    /// Full location of the host, sent as the `url` field of every event
    pub href: String,
    /// Identifier of the host application, sent as `userAgent`
    pub user_agent: String,
    /// Display dimensions, sent as `viewport`
    pub viewport: Viewport,
}

impl Default for PageContext {
    fn default() -> Self {
        PageContext {
            protocol: "http:".to_string(),
            hostname: "localhost".to_string(),
            href: "http://localhost/".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            viewport: Viewport::default(),
        }
    }
}

/// Immutable tap configuration
///
/// `enabled` is a hard opt-in gate: unless it is exactly `true`, `Tap::init`
/// installs nothing and the tap has zero runtime effect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TapConfig {
    /// Hard opt-in gate, disabled by default
    pub enabled: bool,
    /// Runtime kill switch: when true, events are constructed but every
    /// transmission is dropped silently
    pub disabled_override: bool,
    /// Collector port used when no explicit URL is set
    pub port: u16,
    /// Explicit collector URL; overrides derivation entirely
    pub url: Option<String>,
    /// Host context attached to every event
    pub page: PageContext,
}

impl Default for TapConfig {
    fn default() -> Self {
        TapConfig {
            enabled: false,
            disabled_override: false,
            port: DEFAULT_PORT,
            url: None,
            page: PageContext::default(),
        }
    }
}

impl TapConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults. The loaded configuration
    /// is validated before being returned.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config: TapConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from `CONSOLE_TAP_*` environment variables
    ///
    /// Environment variables are the process-wide analog of the browser's
    /// `window.__CONSOLE_TAP_*__` globals: the enable flag must be exactly
    /// "true" or "1". Unparseable port values are
    /// reported through the log facade and fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests drive it with a plain map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = TapConfig::default();

        config.enabled = matches!(lookup(ENV_ENABLED).as_deref(), Some("true") | Some("1"));
        config.disabled_override =
            matches!(lookup(ENV_DISABLED).as_deref(), Some("true") | Some("1"));

        if let Some(raw) = lookup(ENV_PORT) {
            match raw.parse::<u16>() {
                Ok(port) if port != 0 => config.port = port,
                _ => warn!(
                    "Ignoring unusable {} value '{}', using port {}",
                    ENV_PORT, raw, DEFAULT_PORT
                ),
            }
        }

        config.url = lookup(ENV_URL).filter(|url| !url.is_empty());

        config
    }

    /// Validate the configuration
    ///
    /// Checks the port, the explicit URL (scheme and syntax) and the page
    /// protocol used for URL derivation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ValidationError(
                "port must be non-zero".to_string(),
            ));
        }

        if let Some(url) = &self.url {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                ConfigError::ValidationError(format!("invalid collector URL '{}': {}", url, e))
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ConfigError::ValidationError(format!(
                    "collector URL must be http(s), got '{}'",
                    parsed.scheme()
                )));
            }
        } else {
            if self.page.protocol != "http:" && self.page.protocol != "https:" {
                return Err(ConfigError::ValidationError(format!(
                    "page protocol must be 'http:' or 'https:', got '{}'",
                    self.page.protocol
                )));
            }
            if self.page.hostname.is_empty() {
                return Err(ConfigError::ValidationError(
                    "page hostname must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The collector URL events are POSTed to
    ///
    /// An explicit `url` wins; otherwise the URL is derived as
    /// `<protocol>//<hostname>:<port>/__console_tap__`.
    pub fn collector_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "{}//{}:{}{}",
                self.page.protocol, self.page.hostname, self.port, ENDPOINT_PATH
            ),
        }
    }
}
