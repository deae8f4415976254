//! Number formatting shared by expression printing and plot tick labels.

/// Formats `value` with `precision` significant digits the way C's `%g`
/// does: fixed notation for moderate exponents, scientific otherwise, with
/// trailing zeros removed.
///
/// ```rust
/// use plotscript::ast::number::format_significant;
/// assert_eq!(format_significant(-1.0, 2), "-1");
/// assert_eq!(format_significant(123.0, 2), "1.2e+02");
/// assert_eq!(format_significant(3.14159265, 6), "3.14159");
/// ```
pub fn format_significant(value: f64, precision: usize) -> String {
    let precision = precision.max(1);

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding can carry into the next decade, so take the exponent from the
    // rounded scientific form rather than from log10.
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
