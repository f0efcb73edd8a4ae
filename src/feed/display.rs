//! Display helpers for feed output.

use chrono::{DateTime, Local};
use std::time::{SystemTime, UNIX_EPOCH};

/// Shorten an address for display: `0x1234...abcd`.
///
/// Addresses at or under 10 characters are returned unchanged. Counts
/// characters, not bytes, so arbitrary indexer-supplied strings are safe.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Format a microsecond chain timestamp as a local datetime string.
pub fn format_timestamp(timestamp_usecs: u64) -> String {
    match i64::try_from(timestamp_usecs)
        .ok()
        .and_then(DateTime::from_timestamp_micros)
    {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "invalid timestamp".to_string(),
    }
}

/// Humanized age of a microsecond chain timestamp: "3d ago", "just now".
pub fn time_since(timestamp_usecs: u64) -> String {
    let now_usecs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64;
    time_since_at(timestamp_usecs, now_usecs)
}

fn time_since_at(timestamp_usecs: u64, now_usecs: u64) -> String {
    let diff_secs = now_usecs.saturating_sub(timestamp_usecs) / 1_000_000;

    let days = diff_secs / 86_400;
    let hours = diff_secs / 3_600;
    let minutes = diff_secs / 60;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x24051bca580d28e80a340a17f87c99de"),
            "0x2405...99de"
        );
        assert_eq!(shorten_address("0x1"), "0x1");
        assert_eq!(shorten_address("0x12345678"), "0x12345678");
    }

    #[test]
    fn test_shorten_address_handles_multibyte_input() {
        // Author strings come from the indexer; nothing guarantees ASCII.
        assert_eq!(shorten_address("héllo wörld éé"), "héllo ...d éé");
        assert_eq!(shorten_address("éééééééééé"), "éééééééééé");
    }

    #[test]
    fn test_time_since_buckets() {
        let now = 10_000_000_000_000_000u64; // arbitrary epoch offset in usecs
        assert_eq!(time_since_at(now, now), "just now");
        assert_eq!(time_since_at(now - 30 * 1_000_000, now), "just now");
        assert_eq!(time_since_at(now - 90 * 1_000_000, now), "1m ago");
        assert_eq!(time_since_at(now - 2 * 3_600 * 1_000_000, now), "2h ago");
        assert_eq!(time_since_at(now - 3 * 86_400 * 1_000_000, now), "3d ago");
    }

    #[test]
    fn test_time_since_future_timestamp_is_just_now() {
        let now = 10_000_000_000_000_000u64;
        assert_eq!(time_since_at(now + 60 * 1_000_000, now), "just now");
    }

    #[test]
    fn test_format_timestamp_rejects_overflow() {
        assert_eq!(format_timestamp(u64::MAX), "invalid timestamp");
    }
}
