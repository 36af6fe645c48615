//! Price string parsing
//!
//! Display prices arrive as free text ("$1,234.56", "US $19.99", "19.99 USD").
//! Parsing assumes US formatting: every character other than an ASCII digit
//! or `.` is dropped, so `,` acts as a thousands separator and `.` is the
//! decimal point. European-formatted prices ("1.234,56") are NOT understood
//! and parse to a different value.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{PriceCompareError, Result};

/// Everything that is not an ASCII digit or a decimal point
static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("valid regex"));

/// Strip a display price down to digits and decimal points
pub fn clean_price(display: &str) -> String {
    NON_NUMERIC.replace_all(display, "").into_owned()
}

/// Parse a display price into a number.
///
/// Fails when nothing numeric survives cleaning, or when the cleaned text is
/// not a single valid decimal (e.g. "1.2.3").
pub fn parse_price(display: &str) -> Result<f64> {
    let cleaned = clean_price(display);
    if cleaned.is_empty() {
        return Err(PriceCompareError::Parse(format!(
            "no numeric content in {:?}",
            display
        )));
    }

    let value: f64 = cleaned.parse().map_err(|e| {
        PriceCompareError::Parse(format!("{:?} (cleaned {:?}): {}", display, cleaned, e))
    })?;

    if !value.is_finite() {
        return Err(PriceCompareError::Parse(format!(
            "{:?} is out of range",
            display
        )));
    }

    Ok(value)
}
