// Logbook - platform/paths.rs
//
// Storage-root and config-directory resolution.
//
// Session files live in the user's documents directory by default, so
// they are visible and shareable through the platform's file browser —
// the whole point of a device-local session log is that someone can pull
// it off the device. Hosts that want them elsewhere set an explicit root
// in the options (tests always do).
//
// Uses the `directories` crate for XDG (Linux), Known Folder (Windows),
// and Library (macOS) compliance.

use crate::util::constants;
use directories::{ProjectDirs, UserDirs};
use std::path::PathBuf;

/// Resolve the default storage root for session logs.
///
/// Resolution order: documents directory, platform data directory,
/// current directory. The result is not created here; session
/// construction creates it and treats failure as fatal.
pub fn resolve_storage_root() -> PathBuf {
    if let Some(user_dirs) = UserDirs::new() {
        if let Some(docs) = user_dirs.document_dir() {
            tracing::debug!(root = %docs.display(), "Storage root resolved to documents");
            return docs.to_path_buf();
        }
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_NAME) {
        let data = proj_dirs.data_dir().to_path_buf();
        tracing::debug!(root = %data.display(), "Storage root resolved to data dir");
        return data;
    }

    tracing::warn!("Could not determine platform directories, using current directory");
    PathBuf::from(".")
}

/// Resolve the configuration directory searched for `config.toml`.
///
/// `None` when the platform provides no home directory at all (containers,
/// stripped-down service accounts); callers fall back to defaults.
pub fn resolve_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", constants::APP_NAME).map(|d| d.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_root_is_never_empty() {
        let root = resolve_storage_root();
        assert!(!root.as_os_str().is_empty());
    }
}
