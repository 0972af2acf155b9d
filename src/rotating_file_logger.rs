//! Rotating file logger with size-triggered rotation into numbered backups
//!
//! This module provides a best-effort, thread-safe file logger. Every entry is
//! appended to a single active file; once that file has grown past the configured
//! size, the next write first retires it into a bounded chain of numbered backups.
//!
//! ## Features
//!
//! ### Automatic Rotation
//! - Size-based rotation: checked before each write, never on a timer
//! - Numbered backups: `Trion.log.1` is the newest backup, `Trion.log.N` the oldest
//! - Bounded retention: the oldest backup is deleted before the chain would overflow
//! - Serialized writers: size check, rotation and append form one critical section
//!
//! ### Failure Model
//! Logging never fails the caller. Directory creation, rotation, append and
//! truncate errors are reported as `tracing` events on the diagnostic channel
//! (see [`crate::diagnostics`]) and then absorbed. A failed rotation does not
//! block the write that triggered it; the next oversized check simply retries.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use trion::RotatingFileLogger;
//!
//! let logger = RotatingFileLogger::builder()
//!     .with_path("logs/myapp/app.log")
//!     .with_max_size(1024 * 1024)
//!     .with_max_backups(3)
//!     .with_console_echo(true)
//!     .build();
//!
//! logger.info("service started");
//! logger.log(Some("custom tag"), "AUDIT");
//! ```
//!
//! ## Entry Format
//!
//! `yyyy-MM-dd HH:mm:ss [LEVEL] message`, local time. Embedded newlines in the
//! message are written verbatim, so one entry may span several physical lines.
//!
//! ## Overshoot
//!
//! The size is compared before appending, so the active file can exceed the
//! threshold by up to one entry before it gets rotated on the following write.

use crate::config::{clamp_backups, LoggerConfig};
use crate::level::Level;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, error, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builder for configuring the rotating file logger
pub struct RotatingFileLoggerBuilder {
    config: LoggerConfig,
    echo: Option<Box<dyn Write + Send>>,
}

impl RotatingFileLoggerBuilder {
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.config.max_size = bytes;
        self
    }

    /// Values below one are raised to one
    pub fn with_max_backups(mut self, count: i64) -> Self {
        self.config.max_backups = clamp_backups(count);
        self
    }

    pub fn with_console_echo(mut self, enabled: bool) -> Self {
        self.config.console_echo = enabled;
        self
    }

    /// Replace stdout as the destination of echoed entries
    pub fn with_echo_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.echo = Some(Box::new(writer));
        self
    }

    /// Build the logger. No file is touched until the first write.
    pub fn build(self) -> RotatingFileLogger {
        RotatingFileLogger {
            config: RwLock::new(self.config.normalized()),
            file_lock: Mutex::new(()),
            echo: Mutex::new(self.echo.unwrap_or_else(|| Box::new(io::stdout()))),
        }
    }
}

/// One file of the rotation chain as reported by [`RotatingFileLogger::log_files`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileInfo {
    /// 0 for the active file, `n` for backup `.n`
    pub index: usize,
    pub path: PathBuf,
    pub size: u64,
}

/// Thread-safe logger writing to a size-rotated file chain
pub struct RotatingFileLogger {
    config: RwLock<LoggerConfig>,
    // Guards every mutation of the active file and its backups
    file_lock: Mutex<()>,
    echo: Mutex<Box<dyn Write + Send>>,
}

impl RotatingFileLogger {
    /// Start building a rotating file logger configuration
    pub fn builder() -> RotatingFileLoggerBuilder {
        RotatingFileLoggerBuilder {
            config: LoggerConfig::default(),
            echo: None,
        }
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        RotatingFileLoggerBuilder { config, echo: None }.build()
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoggerConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn path(&self) -> PathBuf {
        self.config().path
    }

    pub fn max_size(&self) -> u64 {
        self.config().max_size
    }

    pub fn max_backups(&self) -> usize {
        self.config().max_backups
    }

    pub fn console_echo(&self) -> bool {
        self.config().console_echo
    }

    pub fn set_path<P: AsRef<Path>>(&self, path: P) {
        self.update(|config| config.path = path.as_ref().to_path_buf());
    }

    pub fn set_max_size(&self, bytes: u64) {
        self.update(|config| config.max_size = bytes);
    }

    /// Values below one are raised to one
    pub fn set_max_backups(&self, count: i64) {
        self.update(|config| config.max_backups = clamp_backups(count));
    }

    pub fn set_console_echo(&self, enabled: bool) {
        self.update(|config| config.console_echo = enabled);
    }

    fn update(&self, apply: impl FnOnce(&mut LoggerConfig)) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut config);
    }

    /// Path of backup `index` in the chain, e.g. `Trion.log.2`
    pub fn backup_path(&self, index: usize) -> PathBuf {
        backup_path(&self.path(), index)
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Some(message.as_ref()), Level::Info);
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Some(message.as_ref()), Level::Warning);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Some(message.as_ref()), Level::Error);
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Some(message.as_ref()), Level::Debug);
    }

    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(Some(message.as_ref()), Level::Fatal);
    }

    /// Log `message` at ERROR together with the error's type, text and trace
    pub fn error_with<E>(&self, message: impl AsRef<str>, err: &E)
    where
        E: std::error::Error + ?Sized,
    {
        let body = format_error(message.as_ref(), err);
        self.log(Some(body.as_str()), Level::Error);
    }

    /// Format, optionally echo, and append one entry. `None` is ignored.
    pub fn log(&self, message: Option<&str>, level: impl Into<Level>) {
        let Some(message) = message else {
            return;
        };

        let entry = format_entry(&Local::now(), &level.into(), message);
        let config = self.config();

        if config.console_echo {
            let mut echo = self.echo.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = writeln!(echo, "{}", entry).and_then(|_| echo.flush()) {
                warn!(error = %e, "Failed to echo log entry");
            }
        }

        self.write_entry(&config, &entry);
    }

    /// Truncate the active file. Backups are left alone.
    pub fn clear_log(&self) {
        let _guard = self.lock_files();
        let path = self.path();

        let result = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path);

        if let Err(e) = result {
            error!(path = %path.display(), error = %e, "Failed to clear log file");
        }
    }

    /// Active file followed by the existing backups, newest first
    ///
    /// Backups are found by scanning the log directory, so gaps left by a
    /// partial rotation are reported as they are.
    pub fn log_files(&self) -> Vec<LogFileInfo> {
        let _guard = self.lock_files();
        let config = self.config();
        let mut files = Vec::new();

        if let Ok(meta) = fs::metadata(&config.path) {
            files.push(LogFileInfo { index: 0, path: config.path.clone(), size: meta.len() });
        }

        let Some(prefix) = config.path.file_name().and_then(|name| name.to_str()) else {
            return files;
        };
        let prefix = format!("{}.", prefix);
        let directory = match config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(directory = %directory.display(), error = %e, "Failed to list log directory");
                }
                return files;
            }
        };

        let mut backups: Vec<LogFileInfo> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let index = backup_index(entry.file_name().to_str()?, &prefix)?;
                if index > config.max_backups {
                    return None;
                }
                let meta = entry.metadata().ok().filter(|meta| meta.is_file())?;
                Some(LogFileInfo { index, path: backup_path(&config.path, index), size: meta.len() })
            })
            .collect();
        backups.sort_by_key(|file| file.index);

        files.extend(backups);
        files
    }

    fn lock_files(&self) -> MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock is still usable
        self.file_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entry(&self, config: &LoggerConfig, entry: &str) {
        let _guard = self.lock_files();
        let path = config.path.as_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                error!(directory = %parent.display(), error = %e, "Failed to create log directory");
                return;
            }
        }

        match fs::metadata(path) {
            Ok(meta) if meta.len() > config.max_size => {
                debug!(path = %path.display(), size = meta.len(), "Rotating log file");
                if let Err(e) = rotate(path, config.max_backups) {
                    error!(path = %path.display(), error = %e, "Failed to rotate log files");
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to read log file size"),
        }

        if let Err(e) = append_line(path, entry) {
            error!(path = %path.display(), error = %e, "Failed to write log entry");
        }
    }
}

impl Default for RotatingFileLogger {
    fn default() -> Self {
        Self::from_config(LoggerConfig::default())
    }
}

/// Render one entry as `yyyy-MM-dd HH:mm:ss [LEVEL] message`
pub fn format_entry(timestamp: &DateTime<Local>, level: &Level, message: &str) -> String {
    format!("{} [{}] {}", timestamp.format(TIMESTAMP_FORMAT), level, message)
}

/// Compose the multi-line body logged by [`RotatingFileLogger::error_with`]
///
/// The trace lists the `source()` chain first, then the captured backtrace
/// frames when `RUST_BACKTRACE` enables capturing.
pub fn format_error<E>(message: &str, err: &E) -> String
where
    E: std::error::Error + ?Sized,
{
    let mut out = String::from(message);
    out.push_str(&format!("\nException: {}", std::any::type_name::<E>()));
    out.push_str(&format!("\nMessage: {}", err));
    out.push_str("\nStackTrace: ");

    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!("\n    caused by: {}", cause));
        source = cause.source();
    }

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        for frame in backtrace.to_string().lines() {
            out.push_str(&format!("\n    {}", frame.trim()));
        }
    }

    out
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// Index `n` of a file named `<prefix>n`, where `n` is written without sign or leading zeros
fn backup_index(file_name: &str, prefix: &str) -> Option<usize> {
    let suffix = file_name.strip_prefix(prefix)?;
    if suffix.starts_with('0') || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Shift the chain: drop `.N`, move `.i` to `.i+1`, then the active file to `.1`
fn rotate(path: &Path, max_backups: usize) -> io::Result<()> {
    let oldest = backup_path(path, max_backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }

    for i in (1..max_backups).rev() {
        let old_path = backup_path(path, i);
        if old_path.exists() {
            fs::rename(&old_path, backup_path(path, i + 1))?;
        }
    }

    if path.exists() {
        fs::rename(path, backup_path(path, 1))?;
    }

    Ok(())
}

fn append_line(path: &Path, entry: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format!("{}\n", entry).as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_entry() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let entry = format_entry(&timestamp, &Level::Warning, "disk almost full");
        assert_eq!(entry, "2024-03-07 09:05:01 [WARNING] disk almost full");
    }

    #[test]
    fn test_backup_path_appends_index() {
        let path = Path::new("logs/trion/Trion.log");
        assert_eq!(backup_path(path, 1), PathBuf::from("logs/trion/Trion.log.1"));
        assert_eq!(backup_path(path, 12), PathBuf::from("logs/trion/Trion.log.12"));
    }

    #[test]
    fn test_backup_index_accepts_plain_numbers_only() {
        assert_eq!(backup_index("app.log.1", "app.log."), Some(1));
        assert_eq!(backup_index("app.log.42", "app.log."), Some(42));
        assert_eq!(backup_index("app.log.0", "app.log."), None);
        assert_eq!(backup_index("app.log.01", "app.log."), None);
        assert_eq!(backup_index("app.log.+1", "app.log."), None);
        assert_eq!(backup_index("app.log.old", "app.log."), None);
        assert_eq!(backup_index("app.log.", "app.log."), None);
        assert_eq!(backup_index("other.log.1", "app.log."), None);
    }

    #[test]
    fn test_rotate_shifts_chain_and_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "active").unwrap();
        fs::write(backup_path(&path, 1), "one").unwrap();
        fs::write(backup_path(&path, 2), "two").unwrap();

        rotate(&path, 2).unwrap();

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "active");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "one");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn test_rotate_fills_gaps_in_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "active").unwrap();
        fs::write(backup_path(&path, 2), "two").unwrap();

        rotate(&path, 5).unwrap();

        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "active");
        assert!(!backup_path(&path, 2).exists());
        assert_eq!(fs::read_to_string(backup_path(&path, 3)).unwrap(), "two");
    }

    #[derive(Debug)]
    struct Inner;

    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "socket closed")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_format_error_lists_type_message_and_causes() {
        let body = format_error("sync aborted", &Outer(Inner));
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines[0], "sync aborted");
        assert!(lines[1].starts_with("Exception: ") && lines[1].ends_with("Outer"));
        assert_eq!(lines[2], "Message: request failed");
        assert_eq!(lines[3], "StackTrace: ");
        assert_eq!(lines[4], "    caused by: socket closed");
    }
}
