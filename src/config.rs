use crate::controller::wait::WaitPolicy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Configuration for a screener extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// URL of the equity screener page
    #[serde(default = "default_screener_url")]
    pub screener_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default)]
    pub headless: bool,

    /// Wait window for page loads and filter or page-size transitions
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Wait window for the next-page control and the page flip itself
    #[serde(default = "default_short_timeout_secs")]
    pub short_timeout_secs: u64,

    /// Delay between two polls of a waiting predicate
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How many times to click the region button before giving up
    #[serde(default = "default_panel_open_attempts")]
    pub panel_open_attempts: usize,
}

/// Default value for screener_url
fn default_screener_url() -> String {
    "https://finance.yahoo.com/research-hub/screener/equity/".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_navigation_timeout_secs() -> u64 {
    20
}

fn default_short_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_panel_open_attempts() -> usize {
    2
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            screener_url: default_screener_url(),
            webdriver_url: default_webdriver_url(),
            headless: false,
            navigation_timeout_secs: default_navigation_timeout_secs(),
            short_timeout_secs: default_short_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            panel_open_attempts: default_panel_open_attempts(),
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn apply_env(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Check that both URLs parse
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.screener_url, &self.webdriver_url] {
            Url::parse(url).map_err(|source| ConfigError::Url {
                url: url.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn navigation_wait(&self) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_secs(self.navigation_timeout_secs),
            self.poll_interval(),
        )
    }

    pub fn short_wait(&self) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_secs(self.short_timeout_secs),
            self.poll_interval(),
        )
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
