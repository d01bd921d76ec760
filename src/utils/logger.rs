//! File-backed logger
//!
//! Works alongside the standard log crate: records go to a log file and are
//! echoed to stderr. The binary installs it when `--log-file` is given and
//! falls back to `env_logger` otherwise.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Logger writing one line per record to a file
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level this logger accepts
    level: Level,
}

impl Logger {
    /// Creates a new logger writing to `log_file`, truncating it
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    /// * `level` - Most verbose level to record
    pub fn new<P: AsRef<Path>>(log_file: P, level: Level) -> io::Result<Self> {
        let file = File::create(log_file.as_ref())?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
        })
    }

    /// A logger that only echoes to stderr
    pub fn console(level: Level) -> Self {
        Logger {
            file: Mutex::new(None),
            level,
        }
    }

    /// Logs a message to the log file
    ///
    /// A writer that panicked while holding the lock leaves the file usable,
    /// so a poisoned lock is taken over rather than reported.
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Install a file logger as the global `log` backend
    pub fn init_global_logger<P: AsRef<Path>>(log_file: P, level: Level) -> io::Result<()> {
        let global_logger = Logger::new(log_file, level)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.level.to_level_filter()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let _ = Logger::log(self, &message);

            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        // Every record is flushed as it is written
    }
}
