//! Locators for the screener page, kept in one place so a markup change is a one-file fix.

use crate::driver::Locator;
use crate::utils::xpath_literal;

/// Region that the screener selects on first load
pub const DEFAULT_REGION: &str = "United States";

/// Wrapper around the results table, present once the screener has rendered
pub fn results_container() -> Locator {
    Locator::Css("div.screener-table".to_string())
}

pub fn region_filter_button() -> Locator {
    Locator::XPath(
        "//div[@data-testid='filter-selector'][.//div[text()='Region']]//button".to_string(),
    )
}

/// Any option label inside an open filter panel
pub fn filter_options() -> Locator {
    Locator::XPath("//div[contains(@class,'options')]//label".to_string())
}

/// Checkbox input whose label text is exactly `region`
pub fn region_checkbox(region: &str) -> Locator {
    Locator::XPath(format!(
        "//div[contains(@class,'options')]//span[normalize-space()={}]/ancestor::label//input",
        xpath_literal(region)
    ))
}

pub fn united_states_checkbox() -> Locator {
    Locator::Id("us".to_string())
}

pub fn apply_button() -> Locator {
    Locator::XPath("//button[normalize-space()='Apply']".to_string())
}

/// Table rendered after a filter has been applied
pub fn filtered_table() -> Locator {
    Locator::Css("div.table-container table".to_string())
}

pub fn page_size_menu() -> Locator {
    Locator::Css(".paginationContainer .menuContainer button".to_string())
}

pub fn page_size_option(size: usize) -> Locator {
    Locator::Css(format!("div[role='option'][data-value='{}']", size))
}

pub fn table_rows() -> Locator {
    Locator::Css("table tbody tr".to_string())
}

pub fn next_page_button() -> Locator {
    Locator::Css("button[data-testid='next-page-button']".to_string())
}

/// Ticker cell of the first row; its text is the pagination fingerprint
pub fn first_row_ticker() -> Locator {
    Locator::Css(
        ".screener-table tbody tr:first-child [data-testid-cell=\"ticker\"]".to_string(),
    )
}
