//! Scripted in-memory screener used by the controller and crawler tests.

use crate::config::ScreenerConfig;
use crate::controller::selectors;
use crate::driver::{Driver, Locator};
use crate::error::{DriverError, DriverResult};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

pub type FixtureRow = (String, String, String);

/// `count` rows with symbols `{prefix}0.BA`, `{prefix}1.BA`, ...
pub fn numbered_rows(prefix: &str, count: usize) -> Vec<FixtureRow> {
    (0..count)
        .map(|i| {
            (
                format!("{}{}.BA", prefix, i),
                format!("{} Holding {}", prefix, i),
                format!("{},{:03}.25", 1 + i / 1000, i % 1000),
            )
        })
        .collect()
}

/// Results table markup the way the screener renders it
pub fn table_markup<S: AsRef<str>>(rows: &[(S, S, S)]) -> String {
    let body = rows
        .iter()
        .map(|(symbol, name, price)| {
            format!(
                concat!(
                    "<tr>",
                    r#"<td data-testid-cell="ticker"><a><div><span>{}</span></div></a></td>"#,
                    r#"<td data-testid-cell="companyshortname.raw">{}</td>"#,
                    r#"<td data-testid-cell="intradayprice">{}</td>"#,
                    "</tr>"
                ),
                symbol.as_ref(),
                name.as_ref(),
                price.as_ref()
            )
        })
        .collect::<String>();

    format!(
        r#"<div class="screener-table"><div class="table-container"><table><tbody>{}</tbody></table></div></div>"#,
        body
    )
}

/// Config whose waits probe exactly once
pub fn instant_config() -> ScreenerConfig {
    ScreenerConfig {
        screener_url: "https://screener.test/equity/".to_string(),
        navigation_timeout_secs: 0,
        short_timeout_secs: 0,
        poll_interval_ms: 1,
        ..ScreenerConfig::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    ResultsContainer,
    RegionButton,
    FilterOption,
    RegionCheckbox(String),
    UnitedStatesCheckbox,
    ApplyButton,
    FilteredTable,
    PageSizeMenu,
    PageSizeOption(usize),
    Row,
    NextButton,
    FirstTicker,
}

/// State of the fake screener page
#[derive(Debug)]
pub struct FakePage {
    pub loads_results: bool,
    pub clicks_to_open_panel: usize,
    pub regions: Vec<String>,
    pub selected: HashSet<String>,
    pub offers_united_states: bool,
    pub applies_filter: bool,
    pub pages: Vec<Vec<FixtureRow>>,
    pub current: usize,
    pub default_page_size: usize,
    pub page_size_takes_effect: bool,
    pub has_next_button: bool,
    pub next_stalls: bool,

    /// Row lookups after a page-size click during which the table is still
    /// re-rendering: old rows shown, next-page control gone
    pub rerender_lookups: usize,
    rendering: usize,

    /// Native clicks that will be reported as intercepted before clicks start landing
    pub intercepted_clicks: usize,

    pub visited: Vec<String>,
    pub panel_clicks: usize,
    pub filter_applied: bool,
    pub menu_open: bool,
    pub page_size: Option<usize>,
    pub native_clicks: Vec<FakeElement>,
    pub script_clicks: Vec<FakeElement>,
    pub scrolled: Vec<FakeElement>,
    pub quit_calls: usize,
}

impl FakePage {
    /// A screener offering `regions` whose filtered results span `pages`
    pub fn screener(regions: &[&str], pages: Vec<Vec<FixtureRow>>) -> Self {
        Self {
            loads_results: true,
            clicks_to_open_panel: 1,
            regions: regions.iter().map(|r| r.to_string()).collect(),
            selected: HashSet::from([selectors::DEFAULT_REGION.to_string()]),
            offers_united_states: true,
            applies_filter: true,
            pages,
            current: 0,
            default_page_size: 25,
            page_size_takes_effect: true,
            has_next_button: true,
            next_stalls: false,
            rerender_lookups: 0,
            rendering: 0,
            intercepted_clicks: 0,
            visited: Vec::new(),
            panel_clicks: 0,
            filter_applied: false,
            menu_open: false,
            page_size: None,
            native_clicks: Vec::new(),
            script_clicks: Vec::new(),
            scrolled: Vec::new(),
            quit_calls: 0,
        }
    }

    fn loaded(&self) -> bool {
        self.loads_results && !self.visited.is_empty()
    }

    fn panel_open(&self) -> bool {
        self.loaded() && self.panel_clicks >= self.clicks_to_open_panel
    }

    fn has_later_page(&self) -> bool {
        self.current + 1 < self.pages.len()
    }

    fn next_enabled(&self) -> bool {
        self.has_later_page() || self.visible_rows().len() < self.current_rows().len()
    }

    fn current_rows(&self) -> &[FixtureRow] {
        self.pages.get(self.current).map(Vec::as_slice).unwrap_or(&[])
    }

    fn visible_rows(&self) -> &[FixtureRow] {
        let rows = self.current_rows();
        match self.page_size {
            Some(_) if self.page_size_takes_effect && self.rendering == 0 => rows,
            _ => &rows[..rows.len().min(self.default_page_size)],
        }
    }

    fn find(&self, locator: &Locator) -> Option<FakeElement> {
        if !self.loaded() {
            return None;
        }

        let candidates = [
            (selectors::results_container(), true, FakeElement::ResultsContainer),
            (selectors::region_filter_button(), true, FakeElement::RegionButton),
            (selectors::filter_options(), self.panel_open(), FakeElement::FilterOption),
            (
                selectors::united_states_checkbox(),
                self.panel_open() && self.offers_united_states,
                FakeElement::UnitedStatesCheckbox,
            ),
            (selectors::apply_button(), self.panel_open(), FakeElement::ApplyButton),
            (selectors::filtered_table(), self.filter_applied, FakeElement::FilteredTable),
            (selectors::page_size_menu(), true, FakeElement::PageSizeMenu),
            (
                selectors::next_page_button(),
                self.has_next_button && self.rendering == 0,
                FakeElement::NextButton,
            ),
            (
                selectors::first_row_ticker(),
                !self.visible_rows().is_empty(),
                FakeElement::FirstTicker,
            ),
        ];
        for (candidate, present, element) in candidates {
            if candidate == *locator {
                return present.then_some(element);
            }
        }

        if let Some(region) = self
            .regions
            .iter()
            .find(|r| selectors::region_checkbox(r) == *locator)
        {
            return self
                .panel_open()
                .then(|| FakeElement::RegionCheckbox(region.clone()));
        }

        [10, 25, 50, 100]
            .into_iter()
            .find(|size| selectors::page_size_option(*size) == *locator)
            .filter(|_| self.menu_open)
            .map(FakeElement::PageSizeOption)
    }

    fn land_click(&mut self, element: &FakeElement) {
        match element {
            FakeElement::RegionButton => self.panel_clicks += 1,
            FakeElement::RegionCheckbox(region) => self.toggle(region.clone()),
            FakeElement::UnitedStatesCheckbox => self.toggle(selectors::DEFAULT_REGION.to_string()),
            FakeElement::ApplyButton => self.filter_applied = self.applies_filter,
            FakeElement::PageSizeMenu => self.menu_open = true,
            FakeElement::PageSizeOption(size) => {
                self.page_size = Some(*size);
                self.menu_open = false;
                self.rendering = self.rerender_lookups;
            }
            FakeElement::NextButton => {
                if self.has_later_page() && !self.next_stalls {
                    self.current += 1;
                }
            }
            _ => {}
        }
    }

    fn toggle(&mut self, region: String) {
        if !self.selected.remove(&region) {
            self.selected.insert(region);
        }
    }
}

pub struct FakeDriver {
    page: Mutex<FakePage>,
}

impl FakeDriver {
    pub fn new(page: FakePage) -> Self {
        Self {
            page: Mutex::new(page),
        }
    }

    pub fn page(&self) -> MutexGuard<'_, FakePage> {
        self.page.lock().expect("fake page lock poisoned")
    }
}

#[async_trait]
impl Driver for FakeDriver {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.page().visited.push(url.to_string());
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> DriverResult<Option<FakeElement>> {
        Ok(self.page().find(locator))
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<FakeElement>> {
        let mut page = self.page();
        if *locator == selectors::table_rows() {
            let count = if page.loaded() { page.visible_rows().len() } else { 0 };
            page.rendering = page.rendering.saturating_sub(1);
            return Ok((0..count).map(|_| FakeElement::Row).collect());
        }
        Ok(page.find(locator).into_iter().collect())
    }

    async fn click(&self, element: &FakeElement) -> DriverResult<()> {
        let mut page = self.page();
        if page.intercepted_clicks > 0 {
            page.intercepted_clicks -= 1;
            return Err(DriverError::ClickIntercepted(format!(
                "{:?} is covered by an overlay",
                element
            )));
        }
        page.native_clicks.push(element.clone());
        page.land_click(element);
        Ok(())
    }

    async fn run_script(&self, script: &str, element: &FakeElement) -> DriverResult<()> {
        let mut page = self.page();
        if script.contains("scrollIntoView") {
            page.scrolled.push(element.clone());
        } else if script.contains("click()") {
            page.script_clicks.push(element.clone());
            page.land_click(element);
        }
        Ok(())
    }

    async fn text(&self, element: &FakeElement) -> DriverResult<String> {
        let page = self.page();
        match element {
            FakeElement::FirstTicker => Ok(page
                .visible_rows()
                .first()
                .map(|(symbol, _, _)| format!("  {}\n", symbol))
                .unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    async fn outer_html(&self, element: &FakeElement) -> DriverResult<String> {
        let page = self.page();
        match element {
            FakeElement::ResultsContainer => Ok(table_markup(page.visible_rows())),
            other => Err(DriverError::Command(format!("no markup for {:?}", other))),
        }
    }

    async fn is_displayed(&self, _element: &FakeElement) -> DriverResult<bool> {
        Ok(true)
    }

    async fn is_enabled(&self, _element: &FakeElement) -> DriverResult<bool> {
        Ok(true)
    }

    async fn is_selected(&self, element: &FakeElement) -> DriverResult<bool> {
        let page = self.page();
        Ok(match element {
            FakeElement::RegionCheckbox(region) => page.selected.contains(region),
            FakeElement::UnitedStatesCheckbox => page.selected.contains(selectors::DEFAULT_REGION),
            _ => false,
        })
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> DriverResult<Option<String>> {
        let page = self.page();
        match (element, name) {
            (FakeElement::NextButton, "disabled") if !page.next_enabled() => {
                Ok(Some("true".to_string()))
            }
            _ => Ok(None),
        }
    }

    async fn quit(&self) -> DriverResult<()> {
        self.page().quit_calls += 1;
        Ok(())
    }
}
