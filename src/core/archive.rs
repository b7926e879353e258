// Logbook - core/archive.rs
//
// Startup housekeeping: runs once per process before the session file is
// opened. Prunes archives older than the retention window, then compresses
// every prior session's log file into a single-entry deflate zip under
// `<root>/logs/` and deletes the original on success.
//
// Error policy:
//   - Directory-listing failures degrade to "no files found", never fatal.
//   - Per-file failures are reported as diagnostics and do not abort the
//     batch; a file that failed to compress stays in place and is retried
//     on the next process start.
//   - Deletion failures (pruning or post-archive cleanup) are ignored.
//   - Only an uncreatable archive directory aborts the run: a storage root
//     where `logs/` cannot be created will not hold a session file either.

use crate::core::format;
use crate::util::constants;
use crate::util::error::ArchiveError;
use chrono::{DateTime, Months, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

// =============================================================================
// Summary
// =============================================================================

/// Outcome counts of one archiver run, for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Prior-session files successfully compressed and removed.
    pub archived: usize,

    /// Expired archives deleted from the archive directory.
    pub pruned: usize,

    /// Files that failed to compress and were left in place for retry.
    pub failed: usize,
}

// =============================================================================
// Archiver run
// =============================================================================

/// Run the archiver for one subsystem: prune expired archives, then
/// compress and remove prior-session log files.
///
/// Idempotent on a quiesced directory: after a successful run no plain
/// `.<subsystem>.log` files remain under the root, so a second run finds
/// nothing to do.
pub fn run(root: &Path, subsystem: &str) -> Result<ArchiveSummary, ArchiveError> {
    let archive_dir = root.join(constants::ARCHIVE_DIR_NAME);
    fs::create_dir_all(&archive_dir).map_err(|e| ArchiveError::CreateDir {
        path: archive_dir.clone(),
        source: e,
    })?;

    let mut summary = ArchiveSummary::default();
    prune_expired(&archive_dir, subsystem, &mut summary);
    compact_sessions(root, &archive_dir, subsystem, &mut summary);

    tracing::debug!(
        subsystem,
        archived = summary.archived,
        pruned = summary.pruned,
        failed = summary.failed,
        "Archiver run complete"
    );
    Ok(summary)
}

/// Delete archives in `archive_dir` older than the retention window.
fn prune_expired(archive_dir: &Path, subsystem: &str, summary: &mut ArchiveSummary) {
    let suffix = format!(
        "{}.{}",
        format::session_suffix(subsystem),
        constants::ARCHIVE_EXT
    );

    // Calendar subtraction, not a fixed day count: "one year before now"
    // lands on the same date and clock time last year.
    let Some(cutoff) = Utc::now().checked_sub_months(Months::new(constants::RETENTION_MONTHS))
    else {
        return;
    };

    for path in list_files_with_suffix(archive_dir, &suffix) {
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from);
        let Ok(modified) = modified else {
            continue;
        };

        if modified < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    summary.pruned += 1;
                    tracing::debug!(path = %path.display(), "Pruned expired archive");
                }
                Err(e) => {
                    // Best-effort: a stale archive is retried next run.
                    tracing::debug!(path = %path.display(), error = %e, "Prune failed");
                }
            }
        }
    }
}

/// Compress each prior-session file under `root` into `archive_dir`,
/// deleting the original only when the archive was fully written.
fn compact_sessions(
    root: &Path,
    archive_dir: &Path,
    subsystem: &str,
    summary: &mut ArchiveSummary,
) {
    let suffix = format::session_suffix(subsystem);

    for path in list_files_with_suffix(root, &suffix) {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let zip_path = archive_dir.join(format!("{file_name}.{}", constants::ARCHIVE_EXT));

        match write_archive(&path, &zip_path, file_name) {
            Ok(()) => {
                summary.archived += 1;
                // Deletion failure leaves a duplicate source behind; the next
                // run overwrites the archive with identical content.
                if let Err(e) = fs::remove_file(&path) {
                    tracing::debug!(path = %path.display(), error = %e, "Cleanup failed");
                }
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to archive session log; original kept for retry"
                );
            }
        }
    }
}

/// Write a single-entry deflate zip of `source` at `zip_path`.
///
/// On any failure the partially written archive is removed so a broken zip
/// is never left referenced next to a surviving source file.
fn write_archive(source: &Path, zip_path: &Path, entry_name: &str) -> Result<(), ArchiveError> {
    let result = (|| -> Result<(), ArchiveError> {
        let mut reader = io::BufReader::new(fs::File::open(source).map_err(|e| {
            ArchiveError::Io {
                path: source.to_path_buf(),
                operation: "open session log",
                source: e,
            }
        })?);

        let out = fs::File::create(zip_path).map_err(|e| ArchiveError::Io {
            path: zip_path.to_path_buf(),
            operation: "create archive",
            source: e,
        })?;

        let mut writer = zip::ZipWriter::new(out);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer
            .start_file(entry_name, options)
            .map_err(|e| ArchiveError::Zip {
                path: zip_path.to_path_buf(),
                source: e,
            })?;

        io::copy(&mut reader, &mut writer).map_err(|e| ArchiveError::Io {
            path: zip_path.to_path_buf(),
            operation: "compress session log",
            source: e,
        })?;

        writer.finish().map_err(|e| ArchiveError::Zip {
            path: zip_path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(zip_path);
    }
    result
}

/// List regular files directly under `dir` whose names end with `suffix`.
///
/// Listing failures (missing directory, permissions, unreadable entries)
/// degrade to an empty or partial result.
fn list_files_with_suffix(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.ends_with(suffix) {
            files.push(entry.into_path());
        }
    }

    // Deterministic processing order (walkdir order is platform-dependent).
    files.sort();
    files
}

// =============================================================================
// Tests
// =============================================================================
