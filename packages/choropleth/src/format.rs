//! Tooltip text formatting.
//!
//! Missing values format as the empty string so a tooltip shows a blank
//! field rather than "NaN" or a made-up zero.

/// Thousands-separated whole number, or `""` when missing.
#[must_use]
pub fn count_text(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| {
        #[allow(clippy::cast_possible_truncation)] // counts and populations fit i64
        group_thousands(v.round() as i64)
    })
}

/// One-decimal rate, or `""` when missing.
#[must_use]
pub fn rate_text(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.1}"))
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
