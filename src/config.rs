//! Store configuration.
//!
//! Use the builder methods to customize where state is persisted and how
//! long notifications stay visible.
//!
//! # Example
//!
//! ```ignore
//! use velocollab::config::StoreConfig;
//! use std::time::Duration;
//!
//! let config = StoreConfig::default()
//!     .with_notification_lifetime(Duration::from_secs(3))
//!     .with_data_dir("/tmp/velocollab");
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Key under which the theme is persisted.
pub const DEFAULT_THEME_KEY: &str = "velocollab-theme";

/// Key under which the signed-in identity is persisted (JSON).
pub const DEFAULT_USER_KEY: &str = "velocollab-user";

/// How long a notification stays in the queue before it expires.
pub const DEFAULT_NOTIFICATION_LIFETIME: Duration = Duration::from_millis(5000);

/// Directory name under the home directory used by the file store.
const DATA_DIR_NAME: &str = ".velocollab";

/// Configuration for the application store and its persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Persistence key for the theme
    pub theme_key: String,
    /// Persistence key for the identity
    pub user_key: String,
    /// Time after which a notification is removed automatically
    pub notification_lifetime: Duration,
    /// Directory for file-backed persistence (None = `~/.velocollab`)
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            theme_key: DEFAULT_THEME_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
            notification_lifetime: DEFAULT_NOTIFICATION_LIFETIME,
            data_dir: None,
        }
    }
}

impl StoreConfig {
    /// Create a new StoreConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the theme persistence key.
    pub fn with_theme_key(mut self, key: impl Into<String>) -> Self {
        self.theme_key = key.into();
        self
    }

    /// Set the identity persistence key.
    pub fn with_user_key(mut self, key: impl Into<String>) -> Self {
        self.user_key = key.into();
        self
    }

    /// Set how long notifications live.
    pub fn with_notification_lifetime(mut self, lifetime: Duration) -> Self {
        self.notification_lifetime = lifetime;
        self
    }

    /// Set the directory used by the file store.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Resolve the data directory, falling back to `~/.velocollab`.
    ///
    /// Returns `None` if no directory is configured and the home directory
    /// cannot be determined.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(dir.clone()),
            None => dirs::home_dir().map(|home| home.join(DATA_DIR_NAME)),
        }
    }

    /// Build config from environment variables.
    ///
    /// - `VELOCOLLAB_DATA_DIR` - file store directory
    /// - `VELOCOLLAB_NOTIFICATION_TTL_MS` - notification lifetime in ms
    /// - `VELOCOLLAB_THEME_KEY` / `VELOCOLLAB_USER_KEY` - persistence keys
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("VELOCOLLAB_DATA_DIR") {
            if !dir.is_empty() {
                config = config.with_data_dir(dir);
            }
        }

        if let Ok(raw) = std::env::var("VELOCOLLAB_NOTIFICATION_TTL_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => {
                    config = config.with_notification_lifetime(Duration::from_millis(ms));
                }
                Err(e) => {
                    tracing::warn!("Ignoring VELOCOLLAB_NOTIFICATION_TTL_MS={:?}: {}", raw, e);
                }
            }
        }

        if let Ok(key) = std::env::var("VELOCOLLAB_THEME_KEY") {
            if !key.is_empty() {
                config = config.with_theme_key(key);
            }
        }

        if let Ok(key) = std::env::var("VELOCOLLAB_USER_KEY") {
            if !key.is_empty() {
                config = config.with_user_key(key);
            }
        }

        config
    }
}
