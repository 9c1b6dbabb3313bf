//! Value generators for server-attached IRCv3 tags.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static MSGID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique message ID for the `msgid` tag.
///
/// Combines the Unix millisecond clock with a process-wide
/// counter, both hex encoded, e.g. `18c2d5a1f3b-2a`.
pub fn generate_msgid() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let counter = MSGID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", millis, counter)
}

/// Format the current time as an IRCv3 `time` tag value.
///
/// Returns an RFC 3339 timestamp with millisecond precision, like
/// `2023-01-01T12:00:00.000Z`.
pub fn format_server_time() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Format a Unix timestamp in milliseconds as an IRCv3 `time` tag value.
pub fn format_timestamp_millis(unix_millis: i64) -> String {
    match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(unix_millis) {
        Some(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        None => "1970-01-01T00:00:00.000Z".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msgids_are_unique() {
        let a = generate_msgid();
        let b = generate_msgid();
        assert_ne!(a, b);
        assert!(a.contains('-'));
        assert!(!a.contains(' ') && !a.contains(';'));
    }

    #[test]
    fn test_format_timestamp_millis() {
        assert_eq!(format_timestamp_millis(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(
            format_timestamp_millis(1_672_574_400_123),
            "2023-01-01T12:00:00.123Z"
        );
    }

    #[test]
    fn test_server_time_shape() {
        let now = format_server_time();
        assert!(now.ends_with('Z'));
        assert_eq!(now.len(), "2023-01-01T12:00:00.000Z".len());
    }
}
