/// Join text fragments as they are, then collapse every run of whitespace
/// to a single space and trim the ends
///
/// Adjacent text nodes are not separated: `<span>1,234</span>.56` reads as `1,234.56`.
pub fn normalize_whitespace<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote `value` as an XPath 1.0 string literal
///
/// XPath has no escape sequences, so a value containing both quote kinds
/// is assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let parts = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect::<Vec<_>>()
        .join(", \"'\", ");
    format!("concat({})", parts)
}
