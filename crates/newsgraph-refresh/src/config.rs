//! News graph configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! feed_url = "http://www.freecodecamp.com/news/hot"
//! container = "#forcemap"
//! width = 800
//! height = 800
//! refresh_interval_secs = 60
//! fetch_timeout_secs = 10
//! ```

use crate::error::ConfigError;
use crate::render::RenderTarget;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default news feed
pub const DEFAULT_FEED_URL: &str = "http://www.freecodecamp.com/news/hot";

/// News graph configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsGraphConfig {
    /// Feed location (`http(s)://` URL or local path)
    pub feed_url: String,
    /// Render container selector handed to the renderer
    pub container: String,
    /// Render width in pixels
    pub width: u32,
    /// Render height in pixels
    pub height: u32,
    /// Seconds between refresh cycles
    pub refresh_interval_secs: u64,
    /// HTTP fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// HTTP user agent
    pub user_agent: String,
}

impl Default for NewsGraphConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            container: "#forcemap".to_string(),
            width: 800,
            height: 800,
            refresh_interval_secs: 60,
            fetch_timeout_secs: 10,
            user_agent: concat!("newsgraph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl NewsGraphConfig {
    /// Parse and validate TOML
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for bad TOML or unknown keys,
    /// [`ConfigError::Invalid`] for out of range values.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`NewsGraphConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_url.trim().is_empty() {
            return Err(ConfigError::Invalid("feed_url must not be empty".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "render size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Refresh interval as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Fetch timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Where the renderer draws
    #[must_use]
    pub fn render_target(&self) -> RenderTarget {
        RenderTarget {
            container: self.container.clone(),
            width: self.width,
            height: self.height,
        }
    }
}
