//! Page controller for the screener UI.
//!
//! Every operation here returns only once the live document has visibly
//! reached the expected state. Clicks never count as completion on their
//! own; each one is followed by a bounded wait on a document predicate.

pub mod selectors;
pub mod wait;


use crate::config::ScreenerConfig;
use crate::driver::{Driver, Locator};
use crate::error::{DriverError, DriverResult, Result, ScreenerError};
use std::sync::atomic::{AtomicBool, Ordering};
use wait::{WaitError, WaitPolicy, poll_until};

/// Drives one browser session through the screener's filter and pagination UI
pub struct PageController<D: Driver> {
    driver: D,
    config: ScreenerConfig,
    log_target: String,
    closed: AtomicBool,
}

impl<D: Driver> PageController<D> {
    /// Create a controller that owns `driver` for the rest of its life
    pub fn new(driver: D, config: ScreenerConfig) -> Self {
        Self {
            driver,
            config,
            log_target: module_path!().to_string(),
            closed: AtomicBool::new(false),
        }
    }

    /// Send this controller's log records to `target`
    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    fn target(&self) -> &str {
        &self.log_target
    }

    /// Navigate to the screener and wait for the results table to exist
    pub async fn open_results_view(&self) -> Result<()> {
        self.ensure_open()?;
        ::log::info!(target: self.target(), "Opening screener at {}", self.config.screener_url);

        self.driver.goto(&self.config.screener_url).await?;
        self.wait_present(&selectors::results_container(), self.config.navigation_wait())
            .await
            .map_err(navigation_timeout("results table container"))?;

        ::log::debug!(target: self.target(), "Results table container is present");
        Ok(())
    }

    /// Restrict results to `region`, which must match a label offered by the page exactly
    pub async fn apply_region_filter(&self, region: &str) -> Result<()> {
        self.ensure_open()?;
        ::log::info!(target: self.target(), "Applying region filter: {}", region);

        self.open_region_panel(region).await?;
        self.select_region(region).await?;
        self.deselect_default_region(region).await?;
        self.submit_filter().await
    }

    /// Switch the table to `size` rows per page
    ///
    /// Completion is observed as the row count growing past its value before
    /// the click. A table that already shows `size` rows or more is accepted
    /// as is, and so is one whose results all fit on a single page. Both are
    /// decided before the click: while the table re-renders the next-page
    /// control can vanish, which says nothing about how many results exist.
    pub async fn set_result_page_size(&self, size: usize) -> Result<()> {
        self.ensure_open()?;
        ::log::info!(target: self.target(), "Setting page size to {}", size);
        let policy = self.config.navigation_wait();

        let menu = self
            .wait_clickable(&selectors::page_size_menu(), policy)
            .await
            .map_err(navigation_timeout("page size menu"))?;
        self.safe_click(&menu, "page size menu").await?;

        let option = self
            .wait_clickable(&selectors::page_size_option(size), policy)
            .await
            .map_err(navigation_timeout(format!("page size option {}", size)))?;

        let rows_before = self.driver.find_all(&selectors::table_rows()).await?.len();
        let single_page = rows_before < size && !self.has_usable_next_control().await?;
        self.safe_click(&option, "page size option").await?;

        if rows_before >= size {
            ::log::debug!(
                target: self.target(),
                "Table already shows {} rows, not waiting for it to grow",
                rows_before
            );
            return Ok(());
        }
        if single_page {
            ::log::debug!(
                target: self.target(),
                "All {} results fit on one page, not waiting for it to grow",
                rows_before
            );
            return Ok(());
        }

        let driver = &self.driver;
        let rows = &selectors::table_rows();
        let rows_after = poll_until(policy, move || async move {
            let count = driver.find_all(rows).await?.len();
            Ok((count > rows_before).then_some(count))
        })
        .await
        .map_err(navigation_timeout(format!("page size change to {} rows", size)))?;

        ::log::debug!(
            target: self.target(),
            "Row count went from {} to {}",
            rows_before,
            rows_after
        );
        Ok(())
    }

    /// Move to the next page of results
    ///
    /// Returns `false` without touching the page when there is no usable
    /// next-page control. Otherwise clicks it and waits until the first row's
    /// ticker differs from what it was before the click.
    pub async fn advance_to_next_page(&self) -> Result<bool> {
        self.ensure_open()?;
        let policy = self.config.short_wait();

        let button = match self
            .wait_present(&selectors::next_page_button(), policy)
            .await
        {
            Ok(button) => button,
            Err(WaitError::TimedOut(_)) => {
                ::log::debug!(target: self.target(), "No next-page control on this page");
                return Ok(false);
            }
            Err(WaitError::Driver(e)) => return Err(e.into()),
        };

        if !control_enabled(&self.driver, &button).await? {
            ::log::debug!(target: self.target(), "Next-page control is disabled, last page reached");
            return Ok(false);
        }

        let ticker = &selectors::first_row_ticker();
        let fingerprint = tolerate_stale(first_row_text(&self.driver, ticker).await)?
            .unwrap_or_default();
        self.safe_click(&button, "next page button").await?;

        let driver = &self.driver;
        let before = fingerprint.as_str();
        let outcome = poll_until(policy, move || async move {
            let current = tolerate_stale(first_row_text(driver, ticker).await)?;
            Ok(current.filter(|text| text != before))
        })
        .await;

        match outcome {
            Ok(current) => {
                ::log::debug!(
                    target: self.target(),
                    "Page turned: first row {} -> {}",
                    fingerprint,
                    current
                );
                Ok(true)
            }
            Err(WaitError::TimedOut(waited)) => Err(ScreenerError::PaginationStall {
                fingerprint: fingerprint.clone(),
                waited,
            }),
            Err(WaitError::Driver(e)) => Err(e.into()),
        }
    }

    /// Markup of the results table as currently rendered, without waiting
    pub async fn current_page_markup(&self) -> Result<String> {
        self.ensure_open()?;
        let locator = selectors::results_container();
        let Some(container) = self.driver.find(&locator).await? else {
            return Err(DriverError::NoSuchElement(locator.to_string()).into());
        };
        Ok(self.driver.outer_html(&container).await?)
    }

    /// Release the browser session
    ///
    /// Only the first call reaches the driver; later calls return `Ok(())`.
    pub async fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            ::log::debug!(target: self.target(), "Browser session already released");
            return Ok(());
        }

        ::log::info!(target: self.target(), "Closing browser session");
        self.driver.quit().await?;
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether the next-page control is on the page right now and enabled
    async fn has_usable_next_control(&self) -> Result<bool> {
        let Some(button) = self.driver.find(&selectors::next_page_button()).await? else {
            return Ok(false);
        };
        Ok(control_enabled(&self.driver, &button).await?)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(DriverError::SessionClosed.into());
        }
        Ok(())
    }

    /// Click the region button until the options list shows up
    async fn open_region_panel(&self, region: &str) -> Result<()> {
        let attempts = self.config.panel_open_attempts.max(1);
        let policy = self.config.navigation_wait();
        let button_locator = selectors::region_filter_button();

        for attempt in 1..=attempts {
            let button = self
                .wait_clickable(&button_locator, policy)
                .await
                .map_err(navigation_timeout("region filter button"))?;
            self.safe_click(&button, "region filter button").await?;

            match self.wait_present(&selectors::filter_options(), policy).await {
                Ok(_) => return Ok(()),
                Err(WaitError::TimedOut(_)) => {
                    ::log::warn!(
                        target: self.target(),
                        "Region filter panel did not open (attempt {}/{})",
                        attempt,
                        attempts
                    );
                }
                Err(WaitError::Driver(e)) => return Err(e.into()),
            }
        }

        Err(ScreenerError::FilterApplication {
            region: region.to_string(),
            reason: format!("filter panel did not open after {} attempts", attempts),
        })
    }

    async fn select_region(&self, region: &str) -> Result<()> {
        let checkbox = self
            .wait_present(
                &selectors::region_checkbox(region),
                self.config.navigation_wait(),
            )
            .await
            .map_err(|e| match e {
                WaitError::TimedOut(waited) => ScreenerError::FilterApplication {
                    region: region.to_string(),
                    reason: format!("no option labelled '{}' within {:?}", region, waited),
                },
                WaitError::Driver(e) => e.into(),
            })?;

        if !self.driver.is_selected(&checkbox).await? {
            self.safe_click(&checkbox, "region checkbox").await?;
        }
        Ok(())
    }

    /// Untick the default region unless it is the one being asked for
    async fn deselect_default_region(&self, region: &str) -> Result<()> {
        if region.eq_ignore_ascii_case(selectors::DEFAULT_REGION) {
            return Ok(());
        }

        match self
            .wait_present(&selectors::united_states_checkbox(), self.config.short_wait())
            .await
        {
            Ok(checkbox) => {
                if self.driver.is_selected(&checkbox).await? {
                    ::log::debug!(target: self.target(), "Deselecting {}", selectors::DEFAULT_REGION);
                    self.safe_click(&checkbox, "default region checkbox").await?;
                }
                Ok(())
            }
            Err(WaitError::TimedOut(_)) => {
                ::log::debug!(
                    target: self.target(),
                    "No {} checkbox offered, nothing to deselect",
                    selectors::DEFAULT_REGION
                );
                Ok(())
            }
            Err(WaitError::Driver(e)) => Err(e.into()),
        }
    }

    async fn submit_filter(&self) -> Result<()> {
        let policy = self.config.navigation_wait();
        let apply = self
            .wait_clickable(&selectors::apply_button(), policy)
            .await
            .map_err(navigation_timeout("filter apply button"))?;

        self.driver
            .run_script(
                "arguments[0].scrollIntoView({block: 'center', inline: 'center'});",
                &apply,
            )
            .await?;
        self.safe_click(&apply, "apply button").await?;

        self.wait_present(&selectors::filtered_table(), policy)
            .await
            .map_err(navigation_timeout("filtered results table"))?;
        Ok(())
    }

    /// Native click, falling back to a script click when something overlaps the target
    async fn safe_click(&self, element: &D::Element, what: &str) -> Result<()> {
        match self.driver.click(element).await {
            Err(DriverError::ClickIntercepted(reason)) => {
                ::log::debug!(
                    target: self.target(),
                    "Click on {} intercepted ({}), clicking via script",
                    what,
                    reason
                );
                self.driver
                    .run_script("arguments[0].click();", element)
                    .await?;
                Ok(())
            }
            other => Ok(other?),
        }
    }

    async fn wait_present(
        &self,
        locator: &Locator,
        policy: WaitPolicy,
    ) -> std::result::Result<D::Element, WaitError> {
        let driver = &self.driver;
        poll_until(policy, move || driver.find(locator)).await
    }

    /// Wait for an element that is present, displayed and enabled
    async fn wait_clickable(
        &self,
        locator: &Locator,
        policy: WaitPolicy,
    ) -> std::result::Result<D::Element, WaitError> {
        let driver = &self.driver;
        poll_until(policy, move || async move {
            let Some(element) = driver.find(locator).await? else {
                return Ok(None);
            };
            let clickable = tolerate_stale(
                clickable_state(driver, &element).await.map(Some),
            )?
            .unwrap_or(false);
            Ok(clickable.then_some(element))
        })
        .await
    }
}

async fn clickable_state<D: Driver>(driver: &D, element: &D::Element) -> DriverResult<bool> {
    Ok(driver.is_displayed(element).await? && driver.is_enabled(element).await?)
}

/// Enabled per the driver and not carrying a `disabled` attribute
async fn control_enabled<D: Driver>(driver: &D, element: &D::Element) -> DriverResult<bool> {
    if !driver.is_enabled(element).await? {
        return Ok(false);
    }
    let disabled = driver.attribute(element, "disabled").await?;
    Ok(!matches!(disabled.as_deref(), Some(value) if value != "false"))
}

async fn first_row_text<D: Driver>(driver: &D, locator: &Locator) -> DriverResult<Option<String>> {
    let Some(cell) = driver.find(locator).await? else {
        return Ok(None);
    };
    Ok(Some(driver.text(&cell).await?.trim().to_string()))
}

/// A node replaced mid-probe reads as "not there yet"
fn tolerate_stale<T>(result: DriverResult<Option<T>>) -> DriverResult<Option<T>> {
    match result {
        Err(DriverError::StaleElement(_)) => Ok(None),
        other => other,
    }
}

fn navigation_timeout(what: impl Into<String>) -> impl FnOnce(WaitError) -> ScreenerError {
    let what = what.into();
    move |e| match e {
        WaitError::TimedOut(waited) => ScreenerError::NavigationTimeout { what, waited },
        WaitError::Driver(e) => e.into(),
    }
}
