// Logbook - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// These types exist for the *internal* API: the public logging surface
// catches every one of them and degrades to a no-op, so a failure to log
// can never crash the hosting application. The only place an error
// escapes to the caller is session construction, where an unusable
// storage root indicates a broken host environment.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Logbook operations.
#[derive(Debug)]
pub enum LogbookError {
    /// Startup archival failed in a non-recoverable way.
    Archive(ArchiveError),

    /// Session file creation or opening failed.
    Session(SessionError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(e) => write!(f, "Archive error: {e}"),
            Self::Session(e) => write!(f, "Session error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogbookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Archive(e) => Some(e),
            Self::Session(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Archive errors
// ---------------------------------------------------------------------------

/// Errors raised while archiving prior-session files.
///
/// Per-file variants (`Zip`, `Io`) are caught inside the archiver batch and
/// reported as diagnostics; only `CreateDir` aborts the run, since a storage
/// root where `logs/` cannot be created is unusable for the session file too.
#[derive(Debug)]
pub enum ArchiveError {
    /// The archive subdirectory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// Writing the zip container failed.
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// I/O error reading a session file or writing its archive.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(
                    f,
                    "Cannot create archive directory '{}': {source}",
                    path.display()
                )
            }
            Self::Zip { path, source } => {
                write!(f, "Cannot write archive '{}': {source}", path.display())
            }
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Zip { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ArchiveError> for LogbookError {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Errors raised while constructing the session log file.
#[derive(Debug)]
pub enum SessionError {
    /// The storage root could not be created or is not writable.
    RootUnavailable { path: PathBuf, source: io::Error },

    /// The session log file could not be created or opened for appending.
    Open { path: PathBuf, source: io::Error },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootUnavailable { path, source } => {
                write!(
                    f,
                    "Storage root '{}' is unavailable: {source}",
                    path.display()
                )
            }
            Self::Open { path, source } => {
                write!(
                    f,
                    "Cannot open session log '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RootUnavailable { source, .. } => Some(source),
            Self::Open { source, .. } => Some(source),
        }
    }
}

impl From<SessionError> for LogbookError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

/// Convenience type alias for Logbook results.
pub type Result<T> = std::result::Result<T, LogbookError>;
