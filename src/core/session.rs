// Logbook - core/session.rs
//
// The session log: one open file handle per process lifetime, shared by
// every category logger. Construction runs the archiver (rotating prior
// sessions out of the way), then creates and opens this run's file.
//
// Concurrency: the handle and the category-column width live together in
// one mutex so line writes are atomic (never interleaved), width updates
// are visible to every subsequent write from any handle, and no write is
// lost. The founding thread is recorded as the main/UI thread for the
// per-line thread marker.
//
// Error policy: `open` is the single fatal surface (an unusable storage
// root means a broken host environment). Everything past construction is
// fail-safe — append failures are swallowed, because a missed log line is
// acceptable and a crash caused by logging is not.

use crate::core::{archive, format};
use crate::core::format::Level;
use crate::platform::{config::SessionOptions, device, paths};
use crate::util::constants;
use crate::util::error::{Result, SessionError};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

// =============================================================================
// LogSession
// =============================================================================

/// State guarded by the session mutex: the open handle and the current
/// category-column width.
struct SinkState {
    file: File,
    category_width: usize,
}

/// An open session log file plus the shared formatting state.
///
/// Constructed once per process run; cheap per-category [`Logger`] handles
/// are created from it with [`LogSession::logger`]. The handle is never
/// explicitly closed — it is released at process exit, and the file is
/// archived by the next run's startup housekeeping.
pub struct LogSession {
    path: PathBuf,
    main_thread: ThreadId,
    mirror: bool,
    debug_to_file: bool,
    state: Mutex<SinkState>,
}

impl LogSession {
    /// Open a new session: run the archiver for `options.subsystem`, then
    /// create and open this run's log file for appending.
    ///
    /// This is the dependency-injected constructor — it touches no global
    /// state, so tests (and hosts that want per-subsystem sessions) can
    /// open as many as they like against distinct roots. Production hosts
    /// normally go through [`LogSession::bootstrap`] instead.
    pub fn open(options: &SessionOptions) -> Result<Arc<Self>> {
        let root = options
            .root
            .clone()
            .unwrap_or_else(paths::resolve_storage_root);
        std::fs::create_dir_all(&root).map_err(|e| SessionError::RootUnavailable {
            path: root.clone(),
            source: e,
        })?;

        // Prior sessions move into logs/ before this run's file exists, so
        // the archiver can never swallow the file we are about to create.
        let summary = archive::run(&root, &options.subsystem)?;
        tracing::debug!(
            subsystem = %options.subsystem,
            archived = summary.archived,
            pruned = summary.pruned,
            failed = summary.failed,
            "Startup archival complete"
        );

        let device = device::sanitize(
            &options
                .device_name
                .clone()
                .unwrap_or_else(device::device_name),
        );
        let path = root.join(format::session_file_name(
            &device,
            &options.subsystem,
            Utc::now(),
        ));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SessionError::Open {
                path: path.clone(),
                source: e,
            })?;

        tracing::info!(path = %path.display(), "Session log opened");

        Ok(Arc::new(Self {
            path,
            main_thread: thread::current().id(),
            mirror: options.mirror,
            debug_to_file: options.debug_to_file,
            state: Mutex::new(SinkState {
                file,
                category_width: constants::DEFAULT_CATEGORY_WIDTH,
            }),
        }))
    }

    /// Open the process-wide session, or return the existing one.
    ///
    /// The first caller's options win: construction runs exactly once and
    /// completes before any other caller proceeds, and every later call —
    /// for any subsystem — receives the same session. A later, *different*
    /// subsystem therefore shares the first subsystem's file and never gets
    /// its own archival run — intentional, and relied upon by existing
    /// hosts. Hosts needing per-subsystem independence call
    /// [`LogSession::open`] per subsystem instead.
    pub fn bootstrap(options: &SessionOptions) -> Result<Arc<Self>> {
        static SESSION: OnceLock<Arc<LogSession>> = OnceLock::new();
        // Serialise racing bootstrappers: OnceLock::get_or_init cannot carry
        // the Result out, and two concurrent `open` calls would leave an
        // orphaned empty session file on disk for the loser.
        static INIT: Mutex<()> = Mutex::new(());

        if let Some(session) = SESSION.get() {
            return Ok(Arc::clone(session));
        }
        let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = SESSION.get() {
            return Ok(Arc::clone(session));
        }
        let session = Self::open(options)?;
        let _ = SESSION.set(Arc::clone(&session));
        Ok(session)
    }

    /// Create a logger handle for `category`, registering its width.
    ///
    /// A category at least as wide as the current column widens it to the
    /// category length plus one for every subsequent write from every
    /// handle. The column never shrinks.
    pub fn logger(self: &Arc<Self>, category: &str) -> Logger {
        let len = category.chars().count();
        {
            let mut state = self.state();
            if len >= state.category_width {
                state.category_width = len + 1;
            }
        }
        Logger {
            session: Arc::clone(self),
            category: category.to_string(),
        }
    }

    /// Path of this session's log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compose and append one line. Failures are swallowed: by the time a
    /// write fails the host is mid-flight and a logging crash would cost
    /// far more than the lost line.
    fn write_line(&self, category: &str, level: Level, message: &str) {
        let marker = u8::from(thread::current().id() != self.main_thread);
        let timestamp = format::line_timestamp(Utc::now());

        let mut state = self.state();
        let line = format::compose_line(
            &timestamp,
            category,
            state.category_width,
            marker,
            level,
            message,
        );
        if let Err(e) = state.file.write_all(line.as_bytes()) {
            tracing::debug!(path = %self.path.display(), error = %e, "Log append failed");
        }
    }

    /// Lock the sink state. A panic in another thread while holding the
    /// lock leaves the state perfectly usable for appending, so poisoning
    /// is deliberately ignored — logging keeps working.
    fn state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Logger
// =============================================================================

/// A per-category handle onto the shared session.
///
/// All handles write through the same file; the category appears as a
/// right-justified column in each line. Leveled calls never fail from the
/// caller's perspective.
#[derive(Clone)]
pub struct Logger {
    session: Arc<LogSession>,
    category: String,
}

impl Logger {
    /// The category this handle stamps on its lines.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Debug: mirrored to diagnostics; written to file only when the
    /// session's `debug_to_file` flag is set (default: debug builds).
    pub fn debug(&self, message: &str) {
        self.mirror(Level::Debug, message);
        if self.session.debug_to_file {
            self.session.write_line(&self.category, Level::Debug, message);
        }
    }

    pub fn info(&self, message: &str) {
        self.mirror(Level::Info, message);
        self.session.write_line(&self.category, Level::Info, message);
    }

    pub fn notice(&self, message: &str) {
        self.mirror(Level::Notice, message);
        self.session.write_line(&self.category, Level::Notice, message);
    }

    pub fn warning(&self, message: &str) {
        self.mirror(Level::Warning, message);
        self.session.write_line(&self.category, Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.mirror(Level::Error, message);
        self.session.write_line(&self.category, Level::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.mirror(Level::Critical, message);
        self.session.write_line(&self.category, Level::Critical, message);
    }

    pub fn fault(&self, message: &str) {
        self.mirror(Level::Fault, message);
        self.session.write_line(&self.category, Level::Fault, message);
    }

    /// Passive mirror to the diagnostic channel. `tracing` has no notice
    /// tier, so NOTE rides on info; CRIT and FAULT ride on error.
    fn mirror(&self, level: Level, message: &str) {
        if !self.session.mirror {
            return;
        }
        match level {
            Level::Debug => tracing::debug!(category = %self.category, "{message}"),
            Level::Info | Level::Notice => {
                tracing::info!(category = %self.category, level = %level, "{message}");
            }
            Level::Warning => tracing::warn!(category = %self.category, "{message}"),
            Level::Error | Level::Critical | Level::Fault => {
                tracing::error!(category = %self.category, level = %level, "{message}");
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn test_options(root: &Path) -> SessionOptions {
        SessionOptions {
            root: Some(root.to_path_buf()),
            device_name: Some("unit".to_string()),
            mirror: false,
            debug_to_file: true,
            ..SessionOptions::new("app")
        }
    }

    fn read_log(session: &LogSession) -> String {
        fs::read_to_string(session.path()).unwrap()
    }

    #[test]
    fn test_open_creates_named_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let session = LogSession::open(&test_options(dir.path())).unwrap();

        let name = session.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("unit-"), "device prefix: {name}");
        assert!(name.ends_with(".app.log"), "subsystem suffix: {name}");
        assert!(session.path().exists());
    }

    #[test]
    fn test_open_archives_prior_session_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("unit-20240101-000000-000.app.log"), "old\n").unwrap();

        let session = LogSession::open(&test_options(dir.path())).unwrap();

        assert!(dir
            .path()
            .join("logs/unit-20240101-000000-000.app.log.zip")
            .exists());
        assert!(!dir.path().join("unit-20240101-000000-000.app.log").exists());
        // The freshly created session file must not have been swallowed.
        assert!(session.path().exists());
    }

    #[test]
    fn test_category_width_grows_and_never_shrinks() {
        let dir = tempfile::tempdir().unwrap();
        let session = LogSession::open(&test_options(dir.path())).unwrap();

        let short = session.logger("abc");
        short.info("one");
        // Width is still the default: category padded to 7.
        let _wide = session.logger("wideeeeeee"); // 10 chars, widens to 11
        let medium = session.logger("five5");
        short.info("two");
        medium.info("three");

        let content = read_log(&session);
        let mut lines = content.lines();
        assert!(lines.next().unwrap().contains("     abc T:0"));
        // After registering the 10-char category every writer pads to 11.
        assert!(content.lines().nth(1).unwrap().contains("         abc T:0"));
        assert!(content.lines().nth(2).unwrap().contains("       five5 T:0"));
    }

    #[test]
    fn test_debug_gated_by_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = test_options(dir.path());
        options.debug_to_file = false;
        let session = LogSession::open(&options).unwrap();

        let log = session.logger("gate");
        log.debug("hidden");
        log.info("visible");

        let content = read_log(&session);
        assert!(!content.contains("hidden"));
        assert!(content.contains("visible"));
        assert!(content.contains(" INFO "));
    }

    #[test]
    fn test_thread_marker_distinguishes_founding_thread() {
        let dir = tempfile::tempdir().unwrap();
        let session = LogSession::open(&test_options(dir.path())).unwrap();

        let log = session.logger("thread");
        log.info("from main");

        let worker_log = log.clone();
        thread::spawn(move || worker_log.info("from worker"))
            .join()
            .unwrap();

        let content = read_log(&session);
        let main_line = content.lines().find(|l| l.ends_with("from main")).unwrap();
        let worker_line = content.lines().find(|l| l.ends_with("from worker")).unwrap();
        assert!(main_line.contains("T:0"), "{main_line}");
        assert!(worker_line.contains("T:1"), "{worker_line}");
    }

    #[test]
    fn test_all_levels_write_their_tags() {
        let dir = tempfile::tempdir().unwrap();
        let session = LogSession::open(&test_options(dir.path())).unwrap();
        let log = session.logger("levels");

        log.debug("d");
        log.info("i");
        log.notice("n");
        log.warning("w");
        log.error("e");
        log.critical("c");
        log.fault("f");

        let content = read_log(&session);
        for tag in ["DEBUG", "INFO", "NOTE", "WARN", "ERROR", "CRIT", "FAULT"] {
            assert!(content.contains(&format!(" {tag} ")) || content.contains(&format!(" {tag}\n")),
                "missing {tag} in:\n{content}");
        }
        assert_eq!(content.lines().count(), 7);
    }
}
