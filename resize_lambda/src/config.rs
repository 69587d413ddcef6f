use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "RESIZE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How the source image is fitted into the `max_width` x `max_height` box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Scale down preserving aspect ratio so both sides fit the box.
    #[default]
    Contain,
    /// Force the exact box dimensions, ignoring aspect ratio.
    Exact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResizeConfig {
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,
    #[serde(default = "default_dest_prefix")]
    pub dest_prefix: String,
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    #[serde(default)]
    pub mode: ResizeMode,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_source_prefix() -> String {
    "uploads/".to_string()
}

fn default_dest_prefix() -> String {
    "resized/".to_string()
}

fn default_max_dimension() -> u32 {
    300
}

fn default_jpeg_quality() -> u8 {
    75
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            source_prefix: default_source_prefix(),
            dest_prefix: default_dest_prefix(),
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            mode: ResizeMode::default(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl ResizeConfig {
    /// Load configuration from `RESIZE_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: ResizeConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// A destination key must never fall back under the source prefix, otherwise
    /// every write would trigger another resize.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_prefix.is_empty() || self.dest_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "source and destination prefixes must not be empty".to_string(),
            ));
        }
        if self.dest_prefix.starts_with(&self.source_prefix)
            || self.source_prefix.starts_with(&self.dest_prefix)
        {
            return Err(ConfigError::Invalid(format!(
                "prefixes overlap: source={:?} destination={:?}",
                self.source_prefix, self.dest_prefix
            )));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::Invalid(
                "max_width and max_height must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
