pub mod webdriver;

pub use webdriver::WebDriverSession;

use crate::error::DriverResult;
use async_trait::async_trait;
use std::fmt;

/// How to find an element in the live document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Element id attribute
    Id(String),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css `{}`", css),
            Locator::XPath(xpath) => write!(f, "xpath `{}`", xpath),
            Locator::Id(id) => write!(f, "id `{}`", id),
        }
    }
}

/// Capabilities the page controller needs from a browser automation backend
///
/// A missing element is `Ok(None)` from [`Driver::find`], never an error;
/// errors are reserved for failed commands.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Handle to an element in the current document
    type Element: Send + Sync;

    /// Navigate the session to `url`
    async fn goto(&self, url: &str) -> DriverResult<()>;

    /// First element matching `locator`, if any
    async fn find(&self, locator: &Locator) -> DriverResult<Option<Self::Element>>;

    /// All elements matching `locator`
    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Self::Element>>;

    /// Native click; fails with `DriverError::ClickIntercepted` if another element is on top
    async fn click(&self, element: &Self::Element) -> DriverResult<()>;

    /// Run `script` with the element bound to `arguments[0]`
    async fn run_script(&self, script: &str, element: &Self::Element) -> DriverResult<()>;

    /// Rendered text of the element
    async fn text(&self, element: &Self::Element) -> DriverResult<String>;

    /// Serialized markup of the element, itself included
    async fn outer_html(&self, element: &Self::Element) -> DriverResult<String>;

    async fn is_displayed(&self, element: &Self::Element) -> DriverResult<bool>;

    async fn is_enabled(&self, element: &Self::Element) -> DriverResult<bool>;

    async fn is_selected(&self, element: &Self::Element) -> DriverResult<bool>;

    async fn attribute(&self, element: &Self::Element, name: &str)
    -> DriverResult<Option<String>>;

    /// End the browser session
    async fn quit(&self) -> DriverResult<()>;
}
