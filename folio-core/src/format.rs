//! Display formatting helpers

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const GROUP_SEPARATOR: char = '٬';
const CURRENCY: &str = "تومان";

/// Format a price in tomans with Persian digits and thousands grouping
///
/// Fractions are rounded to the nearest whole toman.
pub fn format_price(price: f64) -> String {
    let rounded = price.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        let d = c.to_digit(10).unwrap_or(0) as usize;
        grouped.push(PERSIAN_DIGITS[d]);
    }

    if negative {
        format!("-{} {}", grouped, CURRENCY)
    } else {
        format!("{} {}", grouped, CURRENCY)
    }
}

/// Shorten `s` to `length` characters, appending `...` when cut
pub fn truncate(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let mut out: String = s.chars().take(length).collect();
    out.push_str("...");
    out
}
