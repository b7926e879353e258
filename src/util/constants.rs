// Logbook - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Crate display name, used for config/data directory resolution.
pub const APP_NAME: &str = "Logbook";

/// Current crate version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Filesystem layout
// =============================================================================

/// Subdirectory of the storage root holding compressed prior-session archives.
pub const ARCHIVE_DIR_NAME: &str = "logs";

/// Extension appended to an archived session file (`<name>.log` becomes
/// `<name>.log.zip` under the archive directory).
pub const ARCHIVE_EXT: &str = "zip";

/// Configuration file name, looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Line format
// =============================================================================

/// Timestamp pattern for log lines: `2024-06-01 13:05:09.123` (UTC).
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Timestamp pattern embedded in session file names: `20240601-130509-123`.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S-%3f";

/// Starting width of the category column. A category of this length or
/// longer widens the column to its length plus one for the rest of the
/// process; the column never shrinks.
pub const DEFAULT_CATEGORY_WIDTH: usize = 7;

/// Width of the right-justified level tag column (the longest tags,
/// DEBUG/ERROR/FAULT, are five characters).
pub const LEVEL_TAG_WIDTH: usize = 5;

// =============================================================================
// Retention
// =============================================================================

/// Archives whose modification time is older than this many calendar months
/// before the archiver run are deleted. Fixed; not configurable.
pub const RETENTION_MONTHS: u32 = 12;

// =============================================================================
// Device identity
// =============================================================================

/// Host environment variables consulted for the device name, in order.
pub const DEVICE_NAME_ENV_VARS: &[&str] = &["COMPUTERNAME", "HOSTNAME", "HOST"];

/// Device name used when no environment variable yields one.
pub const DEFAULT_DEVICE_NAME: &str = "device";

// =============================================================================
// Diagnostics
// =============================================================================

/// Default level filter for the diagnostic (tracing) channel.
pub const DEFAULT_DIAG_LEVEL: &str = "info";
