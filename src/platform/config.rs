// Logbook - platform/config.rs
//
// Session options and optional config.toml loading with startup
// validation. Misconfiguration is never fatal: invalid values produce
// actionable warnings and fall back to defaults, and unknown keys are
// silently ignored so a newer config file works with an older binary.

use crate::platform::paths;
use crate::util::constants;
use std::path::{Path, PathBuf};

// =============================================================================
// SessionOptions
// =============================================================================

/// Resolved options for opening a session.
///
/// Construct with [`SessionOptions::new`] and override fields with struct
/// update syntax, or let [`load_options`] fill them from config.toml.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Partition key for this host's log files; appears as the filename
    /// suffix discriminator. Not validated beyond non-empty use.
    pub subsystem: String,

    /// Explicit storage root. `None` resolves the platform default
    /// (documents directory).
    pub root: Option<PathBuf>,

    /// Explicit device name. `None` consults the host environment.
    pub device_name: Option<String>,

    /// Mirror leveled calls to the diagnostic (tracing) channel.
    pub mirror: bool,

    /// Write `debug`-level lines to the session file. Info and above are
    /// always written regardless of this flag.
    pub debug_to_file: bool,

    /// Filter directive for the diagnostic channel, passed to
    /// `util::diag::init` by hosts that use it.
    pub diag_level: Option<String>,
}

impl SessionOptions {
    /// Defaults for the given subsystem: platform storage root, environment
    /// device name, and debug-tier output in debug builds only.
    pub fn new(subsystem: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            root: None,
            device_name: None,
            mirror: cfg!(debug_assertions),
            debug_to_file: cfg!(debug_assertions),
            diag_level: None,
        }
    }
}

// =============================================================================
// config.toml loading
// =============================================================================

/// Raw deserialisable shape of config.toml.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct RawConfig {
    /// `[session]` section.
    session: SessionSection,
    /// `[logging]` section.
    logging: LoggingSection,
}

/// `[session]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionSection {
    /// Override the subsystem identifier.
    subsystem: Option<String>,
    /// Override the device name used in session file names.
    device_name: Option<String>,
    /// Override the storage root.
    root: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LoggingSection {
    /// Mirror leveled calls to the diagnostic channel.
    mirror: Option<bool>,
    /// Write debug-level lines to the session file.
    debug_to_file: Option<bool>,
    /// Diagnostic level: "error", "warn", "info", "debug", "trace".
    level: Option<String>,
}

/// Build options for `subsystem`, applying overrides from `config.toml`
/// in `config_dir` when present.
///
/// Returns the options and a list of non-fatal validation warnings. A
/// missing file is the normal first-run case and produces no warnings; an
/// unreadable or unparseable file falls back to defaults with a warning.
pub fn load_options(config_dir: &Path, subsystem: &str) -> (SessionOptions, Vec<String>) {
    let mut options = SessionOptions::new(subsystem);
    let mut warnings: Vec<String> = Vec::new();

    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (options, warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (options, warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (options, warnings);
        }
    };

    tracing::debug!(path = %config_path.display(), "Loaded config.toml");

    // -- Session: subsystem --
    if let Some(ref subsystem) = raw.session.subsystem {
        if subsystem.trim().is_empty() {
            warnings.push(
                "[session] subsystem is empty. Keeping the subsystem supplied by the host."
                    .to_string(),
            );
        } else {
            options.subsystem = subsystem.clone();
        }
    }

    // -- Session: device_name --
    if let Some(ref device) = raw.session.device_name {
        if device.trim().is_empty() {
            warnings.push(
                "[session] device_name is empty. Using the environment device name.".to_string(),
            );
        } else {
            options.device_name = Some(device.clone());
        }
    }

    // -- Session: root --
    if let Some(ref root) = raw.session.root {
        if root.trim().is_empty() {
            warnings
                .push("[session] root is empty. Using the platform storage root.".to_string());
        } else {
            options.root = Some(PathBuf::from(root));
        }
    }

    // -- Logging: flags --
    if let Some(mirror) = raw.logging.mirror {
        options.mirror = mirror;
    }
    if let Some(debug_to_file) = raw.logging.debug_to_file {
        options.debug_to_file = debug_to_file;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            options.diag_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_DIAG_LEVEL,
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (options, warnings)
}

/// Build options for `subsystem` from the platform config directory.
///
/// The usual host entry point: resolves the config directory, applies any
/// `config.toml` found there. On platforms with no resolvable config
/// directory (containers, stripped-down service accounts) this is plain
/// defaults with no warnings.
pub fn default_options(subsystem: &str) -> (SessionOptions, Vec<String>) {
    match paths::resolve_config_dir() {
        Some(dir) => load_options(&dir, subsystem),
        None => (SessionOptions::new(subsystem), Vec::new()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (options, warnings) = load_options(dir.path(), "app");
        assert_eq!(options.subsystem, "app");
        assert!(options.root.is_none());
        assert!(options.device_name.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unparseable_config_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "not [valid toml").unwrap();
        let (options, warnings) = load_options(dir.path(), "app");
        assert_eq!(options.subsystem, "app");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to parse"));
    }

    #[test]
    fn test_values_applied_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            r#"
[session]
device_name = "bench-03"
root = "/var/log/sessions"

[logging]
mirror = false
debug_to_file = true
level = "debug"
"#,
        )
        .unwrap();

        let (options, warnings) = load_options(dir.path(), "app");
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(options.subsystem, "app");
        assert_eq!(options.device_name.as_deref(), Some("bench-03"));
        assert_eq!(options.root.as_deref(), Some(Path::new("/var/log/sessions")));
        assert!(!options.mirror);
        assert!(options.debug_to_file);
        assert_eq!(options.diag_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_level_and_empty_fields_warn() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            r#"
[session]
subsystem = ""
device_name = " "

[logging]
level = "verbose"
"#,
        )
        .unwrap();

        let (options, warnings) = load_options(dir.path(), "app");
        assert_eq!(options.subsystem, "app", "empty subsystem keeps host value");
        assert!(options.device_name.is_none());
        assert!(options.diag_level.is_none());
        assert_eq!(warnings.len(), 3, "{warnings:?}");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[session]\nfuture_knob = 7\n\n[telemetry]\nenabled = true\n",
        )
        .unwrap();
        let (_, warnings) = load_options(dir.path(), "app");
        assert!(warnings.is_empty(), "{warnings:?}");
    }
}
