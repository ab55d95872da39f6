//! Number formatting for insight messages
//!
//! Uses Indonesian (`id-ID`) conventions: `.` groups thousands, `,` separates
//! decimals, and at most three fraction digits are shown.

/// Format a number with `id-ID` grouping, e.g. `1234567.5` → `1.234.567,5`
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    // Round to 3 fraction digits first so carries propagate into the integer part
    let scaled = (value.abs() * 1000.0).round();
    let integer = (scaled / 1000.0).trunc() as u64;
    let fraction = (scaled % 1000.0) as u64;
    let negative = value < 0.0 && scaled > 0.0;

    let digits = integer.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if fraction > 0 {
        let frac = format!("{:03}", fraction);
        grouped.push(',');
        grouped.push_str(frac.trim_end_matches('0'));
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a currency amount, e.g. `format_currency("Rp", 20000.0)` → `Rp 20.000`
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{} {}", symbol, format_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1.000");
        assert_eq!(format_number(20000.0), "20.000");
        assert_eq!(format_number(1234567.0), "1.234.567");
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(format_number(1234.5), "1.234,5");
        assert_eq!(format_number(0.125), "0,125");
        assert_eq!(format_number(3333.3333), "3.333,333");
        assert_eq!(format_number(9999.9999), "10.000");
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(format_number(-1500.0), "-1.500");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_number(f64::INFINITY), "0");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency("Rp", 20000.0), "Rp 20.000");
    }
}
