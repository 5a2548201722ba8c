//! Cell coercion helpers.

/// Parses a numeric cell.
///
/// Empty, unparsable, and non-finite values (`NaN`, `inf`) all coerce to
/// `None`; coercion never fails loudly.
pub fn parse_f64(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces a text cell; nulls become the empty string.
pub fn to_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Coerces the operation cell; null or blank means the row has no operation.
pub fn to_label(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
