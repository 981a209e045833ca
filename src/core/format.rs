//! Display helpers for amounts, percentage changes and day labels.

use chrono::NaiveDate;

pub const DEFAULT_CURRENCY_PREFIX: &str = "NT$";

/// `prefix` followed by the amount with thousands separators and at most two decimals.
pub fn format_currency(amount: f64, prefix: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let decimals = match fraction {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{f:02}"),
    };
    format!("{prefix} {sign}{grouped}{decimals}")
}

/// Signed percentage, e.g. `+25%`, `-50%`, `0%`.
pub fn format_percent_change(change: i64) -> String {
    if change > 0 {
        format!("+{change}%")
    } else {
        format!("{change}%")
    }
}

/// Short day label such as `Mar 10 (Mon)`.
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%b %-d (%a)").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0, "NT$"), "NT$ 0");
        assert_eq!(format_currency(999.0, "NT$"), "NT$ 999");
        assert_eq!(format_currency(1234.0, "NT$"), "NT$ 1,234");
        assert_eq!(format_currency(1234567.5, "$"), "$ 1,234,567.5");
        assert_eq!(format_currency(12.05, "$"), "$ 12.05");
        assert_eq!(format_currency(-1500.0, "$"), "$ -1,500");
    }

    #[test]
    fn percent_change_carries_sign() {
        assert_eq!(format_percent_change(25), "+25%");
        assert_eq!(format_percent_change(-50), "-50%");
        assert_eq!(format_percent_change(0), "0%");
    }

    #[test]
    fn day_label_is_short() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(format_day_label(date), "Mar 10 (Mon)");
    }
}
