use crate::results::Equity;
use crate::utils::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector(".screener-table table"));
static ROWS: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static TICKER_CELL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-testid-cell="ticker"]"#));
static NAME_CELL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-testid-cell="companyshortname.raw"]"#));
static PRICE_CELL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-testid-cell="intradayprice"]"#));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("span"));

/// What the screener renders in place of a missing price
const PRICE_PLACEHOLDERS: [&str; 3] = ["—", "N/A", "-"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Parses one page of screener markup into equity records
///
/// Markup without a results table yields no records. Every row of the table
/// yields exactly one record, whatever cells it is missing.
pub fn parse_page(markup: &str) -> Vec<Equity> {
    let doc = Html::parse_document(markup);

    let Some(table) = doc.select(&TABLE).next() else {
        return Vec::new();
    };

    table.select(&ROWS).map(parse_row).collect()
}

fn parse_row(row: ElementRef<'_>) -> Equity {
    let symbol = row.select(&TICKER_CELL).next().and_then(parse_symbol);
    let name = row
        .select(&NAME_CELL)
        .next()
        .and_then(|cell| non_empty(cell_text(cell)));
    let price = row
        .select(&PRICE_CELL)
        .next()
        .and_then(|cell| parse_price(&cell_text(cell)));

    Equity::new(symbol, name, price)
}

/// Ticker text from the cell's `a > div > span` nesting
///
/// Any missing level leaves the symbol absent.
pub fn parse_symbol(cell: ElementRef<'_>) -> Option<String> {
    let link = cell.select(&ANCHOR).next()?;
    let container = link.select(&CONTAINER).next()?;
    let label = container.select(&LABEL).next()?;

    non_empty(label.text().collect::<String>().trim().to_string())
}

/// Parses a displayed price such as `2,800.50`
///
/// Placeholders, empty text and anything that is not a finite number are
/// absent rather than errors.
pub fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || PRICE_PLACEHOLDERS.contains(&text) {
        return None;
    }

    text.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

fn cell_text(cell: ElementRef<'_>) -> String {
    normalize_whitespace(cell.text())
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
