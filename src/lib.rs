// Re-export modules
pub mod config;
pub mod controller;
pub mod crawlers;
pub mod driver;
pub mod error;
pub mod export;
pub mod parsers;
pub mod results;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use config::ScreenerConfig;
pub use controller::PageController;
pub use crawlers::EquityCrawler;
pub use driver::{Driver, Locator, WebDriverSession};
pub use error::{DriverError, ScreenerError};
pub use results::Equity;

use std::path::Path;

/// Builder for a single-region screener extraction
pub struct Screener {
    region: String,
    config: ScreenerConfig,
}

impl Screener {
    /// Create a new Screener builder for `region`, as labelled on the page
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            config: ScreenerConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScreenerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        self,
        path: impl AsRef<Path>,
    ) -> Result<Self, error::ConfigError> {
        let config = ScreenerConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, error::ConfigError> {
        let config = ScreenerConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Run the browser without a visible window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Connect a browser, extract every equity for the region and close the browser
    pub async fn fetch(self) -> Result<Vec<Equity>, ScreenerError> {
        let session = WebDriverSession::connect(&self.config).await?;
        let controller = PageController::new(session, self.config);
        let crawler = EquityCrawler::new(controller);

        crawler.extract_and_shutdown(&self.region).await
    }
}
