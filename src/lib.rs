// Logbook - lib.rs
//
// Session-scoped file logger: one log file per process run, leveled line
// formatting with a padded category column, and startup housekeeping that
// zips prior-session files and prunes archives older than a year.
//
// Layering: `core` holds the logging and archival logic, `platform`
// resolves directories/device identity/configuration, `util` holds
// constants, error types, and diagnostics setup.

pub mod core;
pub mod platform;
pub mod util;

// The types a hosting application actually touches.
pub use crate::core::bridge::ConsoleMessage;
pub use crate::core::format::Level;
pub use crate::core::session::{LogSession, Logger};
pub use crate::platform::config::SessionOptions;
