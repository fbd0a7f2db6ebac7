use crate::controller::PageController;
use crate::driver::Driver;
use crate::error::Result;
use crate::parsers;
use crate::results::Equity;

/// Rows per page requested from the screener before paginating
pub const PAGE_SIZE: usize = 100;

/// Runs a full region extraction against one browser session
pub struct EquityCrawler<D: Driver> {
    controller: PageController<D>,
    log_target: String,
}

impl<D: Driver> EquityCrawler<D> {
    pub fn new(controller: PageController<D>) -> Self {
        Self {
            controller,
            log_target: module_path!().to_string(),
        }
    }

    /// Send this crawler's log records to `target`
    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    pub fn controller(&self) -> &PageController<D> {
        &self.controller
    }

    fn target(&self) -> &str {
        &self.log_target
    }

    /// Collects every equity listed for `region`, in page then row order
    ///
    /// Any failure aborts the run; records gathered from earlier pages are
    /// dropped with it.
    pub async fn run_extraction(&self, region: &str) -> Result<Vec<Equity>> {
        ::log::info!(target: self.target(), "Starting extraction for region: {}", region);

        self.controller.open_results_view().await?;
        self.controller.apply_region_filter(region).await?;
        self.controller.set_result_page_size(PAGE_SIZE).await?;

        let mut equities = Vec::new();
        match self.extract_all_pages(&mut equities).await {
            Ok(pages) => {
                ::log::info!(
                    target: self.target(),
                    "Extracted {} equities from {} pages for {}",
                    equities.len(),
                    pages,
                    region
                );
                Ok(equities)
            }
            Err(e) => {
                ::log::warn!(
                    target: self.target(),
                    "Discarding {} equities collected before the failure",
                    equities.len()
                );
                Err(e)
            }
        }
    }

    /// Parses the current page, then keeps turning pages until there is no next one
    async fn extract_all_pages(&self, equities: &mut Vec<Equity>) -> Result<usize> {
        let mut pages = 0;

        loop {
            let markup = self.controller.current_page_markup().await?;
            let page = parsers::parse_page(&markup);
            pages += 1;
            ::log::debug!(target: self.target(), "Page {}: {} rows", pages, page.len());
            equities.extend(page);

            if !self.controller.advance_to_next_page().await? {
                return Ok(pages);
            }
        }
    }

    /// Release the browser session; safe to call more than once
    pub async fn shutdown(&self) -> Result<()> {
        self.controller.shutdown().await
    }

    /// Run the extraction and release the session whatever the outcome
    ///
    /// A failure to shut down is logged, never returned: it neither hides an
    /// extraction error nor throws away a finished extraction.
    pub async fn extract_and_shutdown(&self, region: &str) -> Result<Vec<Equity>> {
        let extraction = self.run_extraction(region).await;
        let shutdown = self.shutdown().await;

        if let Err(e) = shutdown {
            ::log::error!(target: self.target(), "Failed to close browser session: {}", e);
        }
        extraction
    }
}
