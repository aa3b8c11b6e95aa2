use crate::config::{PLOT_CONFIG, Price};

/// Integer with `,` thousands separators, e.g. `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Marker label for a price: currency prefix, floored, thousands-separated.
pub fn format_price(price: Price) -> String {
    format!(
        "{}{}",
        PLOT_CONFIG.currency_prefix,
        format_thousands(price.floor() as i64)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(-45210), "-45,210");
    }

    #[test]
    fn price_label_is_floored() {
        assert_eq!(format_price(2345.99), "¥2,345");
        assert_eq!(format_price(12.0), "¥12");
    }
}
