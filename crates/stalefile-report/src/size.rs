//! Decimal size formatting.

/// Format a byte count with decimal thresholds.
///
/// Units switch at 1e2, 1e5 and 1e8 bytes, so a value is never shown with
/// more than three digits before the point: `99 o`, `0.15 K`, `0.15 M`,
/// `0.15 G`.
pub fn format_size(bytes: u64) -> String {
    let value = bytes as f64;
    if value >= 1e8 {
        format!("{} G", format_scaled(value / 1e9))
    } else if value >= 1e5 {
        format!("{} M", format_scaled(value / 1e6))
    } else if value >= 1e2 {
        format!("{} K", format_scaled(value / 1e3))
    } else {
        format!("{bytes} o")
    }
}

/// Format a byte count as gigabytes, as used for the cumulated size.
///
/// Totals under a megabyte switch to scientific notation so that a positive
/// total never prints as zero: `150200` gives `1.502e-4 G`.
pub fn format_gigabytes(bytes: u64) -> String {
    let value = bytes as f64 / 1e9;
    if bytes > 0 && value < 1e-3 {
        format!("{} G", format_scientific(value))
    } else {
        format!("{} G", format_scaled(value))
    }
}

/// Four significant digits in scientific notation, trailing mantissa zeros
/// dropped.
fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.3e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{mantissa}e{exponent}")
        }
        None => formatted,
    }
}

/// At most three decimals, trailing zeros dropped.
fn format_scaled(value: f64) -> String {
    let formatted = format!("{value:.3}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
