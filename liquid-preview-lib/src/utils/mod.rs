use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Component, Path};

pub const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f", // 2024-06-17T12:30:00.123
    "%Y-%m-%dT%H:%M:%S",    // 2024-06-17T12:30:00
    "%Y-%m-%d %H:%M:%S%.f", // 2024-06-17 12:30:00.123
    "%Y-%m-%d %H:%M:%S",    // 2024-06-17 12:30:00
];

/// Parse an RFC 3339 timestamp, or an offset-less one taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(trimmed, fmt)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Append `extension` (with its leading dot) unless `name` already ends with
/// it, compared case-insensitively.
pub fn with_extension_if_missing(name: &str, extension: &str) -> String {
    let has_extension = name.len() >= extension.len()
        && name
            .get(name.len() - extension.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(extension));
    if has_extension {
        name.to_string()
    } else {
        format!("{name}{extension}")
    }
}

/// True when `path` is relative and never steps outside its base directory.
pub fn is_contained_relative_path(path: &Path) -> bool {
    path.components().count() > 0
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
