//! Text formatting for prices, ages and the connection line.

use chrono::{DateTime, Local, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use skinwatch_sdk::ConnectionStatus;

/// Formats a price as US dollars, e.g. `$1,234.50`.
#[must_use]
pub fn format_usd(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats how long ago `timestamp_ms` was, e.g. `42s ago` or `3h ago`.
///
/// Future timestamps read as `0s ago`.
#[must_use]
pub fn time_since(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms).max(0) / 1000;
    if seconds < 60 {
        return format!("{seconds}s ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Formats a UTC time as local wall-clock time. Out-of-range times
/// render as `--:--:--`.
#[must_use]
pub fn local_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Formats the connection line, e.g. `Server Online  Last update: 14:02:11`.
#[must_use]
pub fn status_line(status: &ConnectionStatus) -> String {
    let state = if status.online { "Online" } else { "Offline" };
    format!(
        "Server {state}  Last update: {}",
        local_time(status.updated_at())
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn usd(s: &str) -> String {
        format_usd(Decimal::from_str(s).expect("decimal"))
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(usd("0"), "$0.00");
        assert_eq!(usd("5"), "$5.00");
        assert_eq!(usd("207.2"), "$207.20");
        assert_eq!(usd("1234.5"), "$1,234.50");
        assert_eq!(usd("1234567.891"), "$1,234,567.89");
        assert_eq!(usd("999.995"), "$1,000.00");
        assert_eq!(usd("-12.5"), "-$12.50");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn test_time_since() {
        let now = 100_000_000;
        assert_eq!(time_since(now, now), "0s ago");
        assert_eq!(time_since(now - 59_999, now), "59s ago");
        assert_eq!(time_since(now - 60_000, now), "1m ago");
        assert_eq!(time_since(now - 3_600_000, now), "1h ago");
        assert_eq!(time_since(now - 86_400_000 * 2, now), "2d ago");
        assert_eq!(time_since(now + 5_000, now), "0s ago");
    }

    #[test]
    fn test_status_line() {
        let online = status_line(&ConnectionStatus::online(0));
        assert!(online.starts_with("Server Online"));

        let offline = status_line(&ConnectionStatus::offline(0));
        assert!(offline.starts_with("Server Offline"));
        assert!(offline.contains("Last update:"));
    }

    #[test]
    fn test_local_time_out_of_range() {
        let status = ConnectionStatus::offline(i64::MAX);
        assert_eq!(local_time(status.updated_at()), "--:--:--");
        assert!(status_line(&status).ends_with("--:--:--"));
    }
}
