/// Render a price as whole dollars with thousands separators
///
/// `450000.0` becomes `$450,000`. Non-finite prices render as `N/A`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "N/A".to_string();
    }

    let rounded = price.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(1000.0), "$1,000");
        assert_eq!(format_price(450_000.0), "$450,000");
        assert_eq!(format_price(1_250_000.4), "$1,250,000");
        assert_eq!(format_price(-2500.0), "-$2,500");
        assert_eq!(format_price(f64::INFINITY), "N/A");
    }
}
