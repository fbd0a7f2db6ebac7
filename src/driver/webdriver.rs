use crate::config::ScreenerConfig;
use crate::driver::{Driver, Locator};
use crate::error::{DriverError, DriverResult};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};

/// A Chrome session driven over the WebDriver protocol
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to the WebDriver server named in `config`
    ///
    /// Falls back to the usual local endpoints when the configured one
    /// refuses the session.
    pub async fn connect(config: &ScreenerConfig) -> DriverResult<Self> {
        let capabilities = chrome_capabilities(config.headless);

        let primary = match new_session(&config.webdriver_url, &capabilities).await {
            Ok(client) => return Ok(Self { client }),
            Err(e) => e,
        };
        ::log::warn!("{}", primary);

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == config.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = new_session(url, &capabilities).await {
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(primary)
    }

    /// Wrap an already established client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

async fn new_session(url: &str, capabilities: &Map<String, Value>) -> DriverResult<Client> {
    match ClientBuilder::native()
        .capabilities(capabilities.clone())
        .connect(url)
        .await
    {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", url);
            Ok(client)
        }
        Err(e) => Err(DriverError::Connect {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Chrome capabilities; eager page loads since the table renders client-side anyway
fn chrome_capabilities(headless: bool) -> Map<String, Value> {
    let mut args = vec!["--window-size=1920,1080", "--disable-gpu"];
    if headless {
        args.push("--headless=new");
    }

    let mut capabilities = Map::new();
    capabilities.insert("pageLoadStrategy".to_string(), json!("eager"));
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

fn as_fantoccini(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Css(css) => fantoccini::Locator::Css(css),
        Locator::XPath(xpath) => fantoccini::Locator::XPath(xpath),
        Locator::Id(id) => fantoccini::Locator::Id(id),
    }
}

/// Maps a fantoccini command error onto the statuses the controller reacts to
fn command_error(context: &str, error: CmdError) -> DriverError {
    if let CmdError::Standard(ref wd) = error {
        match wd.error {
            ErrorStatus::ElementClickIntercepted => {
                return DriverError::ClickIntercepted(wd.to_string());
            }
            ErrorStatus::StaleElementReference => {
                return DriverError::StaleElement(wd.to_string());
            }
            _ => {}
        }
    }

    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {}", context);
        return DriverError::SessionClosed;
    }

    DriverError::Command(format!("{}: {}", context, error))
}

#[async_trait]
impl Driver for WebDriverSession {
    type Element = Element;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.client
            .goto(url)
            .await
            .map_err(|e| command_error("navigating", e))
    }

    async fn find(&self, locator: &Locator) -> DriverResult<Option<Element>> {
        match self.client.find(as_fantoccini(locator)).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(command_error("finding element", e)),
        }
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Element>> {
        self.client
            .find_all(as_fantoccini(locator))
            .await
            .map_err(|e| command_error("finding elements", e))
    }

    async fn click(&self, element: &Element) -> DriverResult<()> {
        element
            .click()
            .await
            .map_err(|e| command_error("clicking", e))
    }

    async fn run_script(&self, script: &str, element: &Element) -> DriverResult<()> {
        let argument = serde_json::to_value(element)
            .map_err(|e| DriverError::Command(format!("serializing element: {}", e)))?;
        self.client
            .execute(script, vec![argument])
            .await
            .map(|_| ())
            .map_err(|e| command_error("running script", e))
    }

    async fn text(&self, element: &Element) -> DriverResult<String> {
        element
            .text()
            .await
            .map_err(|e| command_error("reading text", e))
    }

    async fn outer_html(&self, element: &Element) -> DriverResult<String> {
        element
            .html(false)
            .await
            .map_err(|e| command_error("reading markup", e))
    }

    async fn is_displayed(&self, element: &Element) -> DriverResult<bool> {
        element
            .is_displayed()
            .await
            .map_err(|e| command_error("checking visibility", e))
    }

    async fn is_enabled(&self, element: &Element) -> DriverResult<bool> {
        element
            .is_enabled()
            .await
            .map_err(|e| command_error("checking enabled state", e))
    }

    async fn is_selected(&self, element: &Element) -> DriverResult<bool> {
        element
            .is_selected()
            .await
            .map_err(|e| command_error("checking selection", e))
    }

    async fn attribute(&self, element: &Element, name: &str) -> DriverResult<Option<String>> {
        element
            .attr(name)
            .await
            .map_err(|e| command_error("reading attribute", e))
    }

    async fn quit(&self) -> DriverResult<()> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| command_error("closing session", e))
    }
}
