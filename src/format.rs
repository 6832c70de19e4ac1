//! Number formatting for stats and tooltips (`$0,0.00` style patterns).

/// Prices below this get eight decimals in the tooltip.
pub const SMALL_PRICE_THRESHOLD: f64 = 0.01;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `value` with `decimals` places and comma-grouped integer digits.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };
    // no "-0.00"
    let negative = value < 0.0 && fixed.bytes().any(|b| (b'1'..=b'9').contains(&b));

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `$0,0.00`
pub fn format_currency(value: f64) -> String {
    with_dollar(format_grouped(value, 2))
}

/// Tooltip price: `$0,0.00`, or `$0,0.00000000` for sub-cent prices.
pub fn format_price(value: f64) -> String {
    let decimals = if value < SMALL_PRICE_THRESHOLD { 8 } else { 2 };
    with_dollar(format_grouped(value, decimals))
}

/// A percentage given in percent units (`12.5` means 12.5%), as `0.00%`.
/// Unlike the currency patterns there is no thousands grouping.
pub fn format_percent(percentage: f64) -> String {
    let percentage = if percentage.is_finite() { percentage } else { 0.0 };
    let fixed = format!("{percentage:.2}");
    match fixed.as_str() {
        "-0.00" => "0.00%".to_string(),
        _ => format!("{fixed}%"),
    }
}

fn with_dollar(grouped: String) -> String {
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_currency(61_234.5), "$61,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(12.0), "$12.00");
    }

    #[test]
    fn negative_values_keep_sign_outside_dollar() {
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn sub_cent_prices_get_more_decimals() {
        assert_eq!(format_price(0.00123456), "$0.00123456");
        assert_eq!(format_price(0.5), "$0.50");
    }

    #[test]
    fn percent_keeps_two_decimals() {
        assert_eq!(format_percent(3.14159), "3.14%");
        assert_eq!(format_percent(-45.2), "-45.20%");
    }

    #[test]
    fn percent_is_not_grouped() {
        assert_eq!(format_percent(1234.5), "1234.50%");
        assert_eq!(format_percent(-0.001), "0.00%");
        assert_eq!(format_percent(f64::NAN), "0.00%");
    }

    #[test]
    fn non_finite_formats_as_zero() {
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }
}
