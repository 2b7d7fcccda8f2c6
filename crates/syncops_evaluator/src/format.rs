//! Display formatters for simulation output.

use crate::error::{Error, Result};

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Formats a byte count with binary units and up to two decimals.
///
/// Trailing zeros are dropped: `1536` → `1.5 KB`, `1048576` → `1 MB`.
#[must_use]
pub fn format_storage_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// Formats a USD amount as `$1,234.56` (negative: `-$1,234.56`).
///
/// Non-finite amounts render as `N/A`.
#[must_use]
pub fn format_storage_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${whole}.{:02}", cents % 100)
}

/// Parses text produced by [`format_storage_currency`] back into a number.
///
/// # Errors
///
/// Returns [`Error::InvalidCurrency`] if the text is not a currency amount.
pub fn parse_storage_currency(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let (negative, unsigned) = trimmed
        .strip_prefix('-')
        .map_or((false, trimmed), |rest| (true, rest));
    let digits = unsigned
        .strip_prefix('$')
        .ok_or_else(|| Error::InvalidCurrency(text.to_string()))?
        .replace(',', "");

    let value: f64 = digits
        .parse()
        .map_err(|_| Error::InvalidCurrency(text.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidCurrency(text.to_string()));
    }
    Ok(if negative { -value } else { value })
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn file_sizes() {
        insta::assert_snapshot!(format_storage_file_size(0), @"0 B");
        insta::assert_snapshot!(format_storage_file_size(512), @"512 B");
        insta::assert_snapshot!(format_storage_file_size(1536), @"1.5 KB");
        insta::assert_snapshot!(format_storage_file_size(1_048_576), @"1 MB");
        insta::assert_snapshot!(format_storage_file_size(5_368_709_120), @"5 GB");
        insta::assert_snapshot!(format_storage_file_size(1_234_567_890_123), @"1.12 TB");
    }

    #[test]
    fn huge_sizes_stay_in_petabytes() {
        assert!(format_storage_file_size(u64::MAX).ends_with(" PB"));
    }

    #[test]
    fn currency() {
        insta::assert_snapshot!(format_storage_currency(0.0), @"$0.00");
        insta::assert_snapshot!(format_storage_currency(12.5), @"$12.50");
        insta::assert_snapshot!(format_storage_currency(1234.567), @"$1,234.57");
        insta::assert_snapshot!(format_storage_currency(-9_876_543.21), @"-$9,876,543.21");
        insta::assert_snapshot!(format_storage_currency(-0.001), @"$0.00");
        insta::assert_snapshot!(format_storage_currency(f64::NAN), @"N/A");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_storage_currency("12.00").is_err());
        assert!(parse_storage_currency("$abc").is_err());
        assert!(parse_storage_currency("").is_err());
        assert!(parse_storage_currency("$-5").is_err());
    }

    #[test]
    fn parse_handles_grouping_and_sign() {
        assert!((parse_storage_currency("-$1,234.50").unwrap() + 1234.5).abs() < 1e-9);
        assert!((parse_storage_currency(" $0.99 ").unwrap() - 0.99).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn currency_roundtrip(amount in -1.0e9f64..1.0e9) {
            let parsed = parse_storage_currency(&format_storage_currency(amount)).unwrap();
            prop_assert!((parsed - amount).abs() <= 0.005 + 1e-6);
        }
    }
}
