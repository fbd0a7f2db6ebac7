/// One row of the screener results table
///
/// Every field is optional: the page routinely omits cells or renders
/// placeholders, and a missing value is an expected outcome.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Equity {
    /// Ticker symbol (e.g. `AAPL.BA`)
    pub symbol: Option<String>,

    /// Company short name
    pub name: Option<String>,

    /// Intraday price
    pub price: Option<f64>,
}

impl Equity {
    /// Create a new equity record
    pub fn new(symbol: Option<String>, name: Option<String>, price: Option<f64>) -> Self {
        Self {
            symbol,
            name,
            price,
        }
    }

    /// Fields in export column order, with absent values rendered empty
    pub fn csv_fields(&self) -> [String; 3] {
        [
            self.symbol.clone().unwrap_or_default(),
            self.name.clone().unwrap_or_default(),
            self.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
        ]
    }
}
