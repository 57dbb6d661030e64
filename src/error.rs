use thiserror::Error;

/// Errors that can occur during configuration loading and validation
///
/// Configuration is the only fallible surface of this crate. Once a `Tap`
/// is initialized, every downstream operation is void by contract and
/// captures its own failures internally.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}
