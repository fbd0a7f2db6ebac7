use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browser driver implementation
#[derive(Debug, Error)]
pub enum DriverError {
    /// Another element sits on top of the click target
    #[error("click intercepted: {0}")]
    ClickIntercepted(String),

    /// The element handle no longer refers to a node in the document
    #[error("stale element reference: {0}")]
    StaleElement(String),

    #[error("no element matches {0}")]
    NoSuchElement(String),

    #[error("could not connect to WebDriver at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("WebDriver command failed: {0}")]
    Command(String),

    #[error("browser session already closed")]
    SessionClosed,
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Errors surfaced by the controller and the crawler
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// A page load or UI transition did not settle in time
    #[error("timed out after {waited:?} waiting for {what}")]
    NavigationTimeout { what: String, waited: Duration },

    /// The region filter could not be opened or the region label was not offered
    #[error("could not apply region filter '{region}': {reason}")]
    FilterApplication { region: String, reason: String },

    /// The next-page control was clicked but the first row never changed
    #[error("pagination stalled: first row stayed at '{fingerprint}' for {waited:?}")]
    PaginationStall { fingerprint: String, waited: Duration },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised by the CSV exporter
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("refusing to export an empty record list")]
    Empty,

    #[error("could not write export: {0}")]
    Io(#[from] std::io::Error),
}
