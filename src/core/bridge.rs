// Logbook - core/bridge.rs
//
// Inbound logging surface for a hosting application's bridge/plugin
// dispatcher: a free-text message plus a console-style level string.
// Level strings follow the web console vocabulary ("log", "info",
// "warn", "error"); anything unrecognised lands on debug so malformed
// payloads still leave a trace in debug builds without polluting the
// info tier.

use crate::core::session::Logger;
use serde::Deserialize;

/// A console-style log payload as delivered by a bridge dispatcher.
///
/// Deserialises directly from the dispatcher's JSON; missing fields fall
/// back to an empty message at the default "log" level.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleMessage {
    /// Free-text message, written unescaped.
    pub message: String,

    /// Console level string: "log", "info", "warn", "error", or anything.
    pub level: String,
}

impl Default for ConsoleMessage {
    fn default() -> Self {
        Self {
            message: String::new(),
            level: "log".to_string(),
        }
    }
}

/// Route a console payload to the matching leveled write.
///
/// Mapping: "log" and "info" → info, "error" → error, "warn" → warning,
/// everything else → debug.
pub fn dispatch(logger: &Logger, msg: &ConsoleMessage) {
    match msg.level.as_str() {
        "log" | "info" => logger.info(&msg.message),
        "error" => logger.error(&msg.message),
        "warn" => logger.warning(&msg.message),
        _ => logger.debug(&msg.message),
    }
}

/// Parse a raw JSON payload and route it.
///
/// A payload that fails to parse is reported on the diagnostic channel
/// and dropped — the bridge surface is fail-safe like every other public
/// entry point.
pub fn dispatch_json(logger: &Logger, payload: &str) {
    match serde_json::from_str::<ConsoleMessage>(payload) {
        Ok(msg) => dispatch(logger, &msg),
        Err(e) => {
            tracing::debug!(error = %e, "Dropped unparseable console payload");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::LogSession;
    use crate::platform::config::SessionOptions;
    use std::fs;
    use std::path::Path;

    fn session_in(root: &Path) -> std::sync::Arc<LogSession> {
        LogSession::open(&SessionOptions {
            root: Some(root.to_path_buf()),
            device_name: Some("unit".to_string()),
            mirror: false,
            debug_to_file: true,
            ..SessionOptions::new("app")
        })
        .unwrap()
    }

    #[test]
    fn test_console_levels_map_to_file_tags() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let log = session.logger("console");

        for (level, message) in [
            ("log", "m-log"),
            ("info", "m-info"),
            ("warn", "m-warn"),
            ("error", "m-error"),
            ("banana", "m-other"),
        ] {
            dispatch(
                &log,
                &ConsoleMessage {
                    message: message.to_string(),
                    level: level.to_string(),
                },
            );
        }

        let content = fs::read_to_string(session.path()).unwrap();
        let line_for = |msg: &str| {
            content
                .lines()
                .find(|l| l.ends_with(msg))
                .unwrap_or_else(|| panic!("no line for {msg} in:\n{content}"))
                .to_string()
        };
        assert!(line_for("m-log").contains(" INFO "));
        assert!(line_for("m-info").contains(" INFO "));
        assert!(line_for("m-warn").contains(" WARN "));
        assert!(line_for("m-error").contains(" ERROR "));
        assert!(line_for("m-other").contains(" DEBUG "));
    }

    #[test]
    fn test_json_payload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let log = session.logger("console");

        dispatch_json(&log, r#"{"message": "over the wire", "level": "warn"}"#);
        // Missing level defaults to "log" → INFO.
        dispatch_json(&log, r#"{"message": "default level"}"#);
        // Garbage is dropped, not panicked on.
        dispatch_json(&log, "not json at all");

        let content = fs::read_to_string(session.path()).unwrap();
        assert!(content.contains("over the wire"));
        assert!(content
            .lines()
            .find(|l| l.ends_with("default level"))
            .unwrap()
            .contains(" INFO "));
        assert_eq!(content.lines().count(), 2);
    }
}
