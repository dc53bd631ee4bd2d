//! Helpers for the `key=value;flag;...` INFO column.

pub const INFO_SEPARATOR: char = ';';
pub const MISSING_VALUE: &str = ".";

///
/// Iterate over the INFO entries of a record as `(key, value)` pairs. Flags
/// have no value; a missing column (`.`) yields nothing.
///
pub fn info_entries(column: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    column
        .split(INFO_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && *entry != MISSING_VALUE)
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (entry, None),
        })
}

/// The value of the first INFO entry whose key is exactly `tag`.
pub fn tagged_value<'a>(column: &'a str, tag: &str) -> Option<&'a str> {
    info_entries(column)
        .find(|(key, _)| *key == tag)
        .and_then(|(_, value)| value)
}

/// True if the column has a `tag` flag or a `tag` entry with a value.
pub fn has_entry(column: &str, tag: &str) -> bool {
    info_entries(column).any(|(key, value)| key == tag && (value.is_none() || present(value).is_some()))
}

///
/// Append entries to an INFO column, replacing a missing (`.`) column.
///
pub fn append_info(column: &str, entries: &[(&str, String)]) -> String {
    let mut info = match column.trim() {
        "" | MISSING_VALUE => String::new(),
        existing => existing.to_string(),
    };

    for (key, value) in entries {
        if !info.is_empty() {
            info.push(INFO_SEPARATOR);
        }
        info.push_str(key);
        info.push('=');
        info.push_str(value);
    }

    if info.is_empty() {
        MISSING_VALUE.to_string()
    } else {
        info
    }
}

/// A field value, treating empty strings and `.` as absent.
pub fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != MISSING_VALUE)
}
