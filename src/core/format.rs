// Logbook - core/format.rs
//
// Levels, timestamps, and line composition. Pure formatting, no I/O.
//
// A log line looks like:
//
//   2024-06-01 13:05:09.123  network T:0  INFO request queued
//
// with the category column right-justified to the widest category
// registered so far in the process and the level tag right-justified to
// five characters. Both timestamps (line and filename stamp) are UTC so
// files sort and correlate identically regardless of the device locale.

use crate::util::constants;
use chrono::{DateTime, Utc};

// =============================================================================
// Level
// =============================================================================

/// Log levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Fault,
}

impl Level {
    /// Fixed tag written into the line's level column.
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTE",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRIT",
            Level::Fault => "FAULT",
        }
    }

    /// All variants in severity order.
    pub fn all() -> &'static [Level] {
        &[
            Level::Debug,
            Level::Info,
            Level::Notice,
            Level::Warning,
            Level::Error,
            Level::Critical,
            Level::Fault,
        ]
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Format an instant for the line timestamp column (millisecond precision).
pub fn line_timestamp(at: DateTime<Utc>) -> String {
    at.format(constants::LINE_TIMESTAMP_FORMAT).to_string()
}

/// Format an instant for embedding in a session file name.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format(constants::FILE_STAMP_FORMAT).to_string()
}

/// Session file name for a device/subsystem pair at the given instant:
/// `<device>-<stamp>.<subsystem>.log`.
pub fn session_file_name(device: &str, subsystem: &str, at: DateTime<Utc>) -> String {
    format!("{device}-{}.{subsystem}.log", file_stamp(at))
}

/// Filename suffix shared by all of a subsystem's session files.
pub fn session_suffix(subsystem: &str) -> String {
    format!(".{subsystem}.log")
}

// =============================================================================
// Line composition
// =============================================================================

/// Compose one complete log line, newline included.
///
/// `category_width` is the current process-wide column width; `thread_marker`
/// is 0 for the main/UI thread and 1 otherwise.
pub fn compose_line(
    timestamp: &str,
    category: &str,
    category_width: usize,
    thread_marker: u8,
    level: Level,
    message: &str,
) -> String {
    format!(
        "{timestamp} {category:>cat_width$} T:{thread_marker} {tag:>tag_width$} {message}\n",
        cat_width = category_width,
        tag = level.tag(),
        tag_width = constants::LEVEL_TAG_WIDTH,
    )
}

// =============================================================================
// Tests
// =============================================================================
