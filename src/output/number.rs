//! Number to string conversion for XPath results.

/// Formats an XPath number as the shortest decimal that round-trips.
///
/// Whole numbers have no fractional part and the output never uses
/// exponent notation. NaN, the infinities and negative zero are written the
/// way XPath's `string()` function writes them.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else {
        // f64's Display is shortest round-trip and never switches to exponents.
        format!("{}", value)
    }
}
