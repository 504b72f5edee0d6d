//! Recursive listing entries and the file-age window

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Age bounds for "recently written" files.
///
/// A file qualifies when `min <= now - mod_time <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeWindow {
    pub min: Duration,
    pub max: Duration,
}

impl AgeWindow {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, mod_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // Files stamped in the future have no age yet
        let Ok(age) = (now - mod_time).to_std() else {
            return false;
        };
        self.min <= age && age <= self.max
    }
}

/// One entry from a recursive, files-only listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListEntry {
    /// Path relative to the listed root
    pub path: String,
    pub name: String,
    /// Size in bytes; the engine reports -1 when unknown
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub mod_time: Option<String>,
    #[serde(default)]
    pub is_dir: bool,
}

impl ListEntry {
    /// Modification time in UTC, if present and parseable.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        let raw = self.mod_time.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(value = raw, error = %e, "Failed to parse listing mod time");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn test_window_bounds_inclusive() {
        let window = AgeWindow::new(DAY, 2 * DAY);
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

        assert!(window.contains(now - chrono::Duration::days(1), now));
        assert!(window.contains(now - chrono::Duration::hours(36), now));
        assert!(window.contains(now - chrono::Duration::days(2), now));
        assert!(!window.contains(now - chrono::Duration::hours(23), now));
        assert!(!window.contains(now - chrono::Duration::hours(49), now));
        assert!(!window.contains(now + chrono::Duration::hours(1), now));
    }

    #[test]
    fn test_entry_from_listing_json() {
        let raw = r#"[{"Path":"2024/a.jpg","Name":"a.jpg","Size":2048,"MimeType":"image/jpeg","ModTime":"2025-03-09T08:30:00.123456789+01:00","IsDir":false}]"#;
        let entries: Vec<ListEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "2024/a.jpg");
        assert_eq!(entries[0].size, 2048);
        assert_eq!(
            entries[0].modified().unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 9, 7, 30, 0).unwrap()
                + chrono::Duration::nanoseconds(123456789)
        );
    }

    #[test]
    fn test_entry_with_bad_time() {
        let entry = ListEntry {
            path: "a".into(),
            name: "a".into(),
            size: 1,
            mod_time: Some("yesterday".into()),
            is_dir: false,
        };
        assert_eq!(entry.modified(), None);
    }
}
