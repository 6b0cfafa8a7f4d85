//! Logger setup for the binary.
//!
//! The page owns the terminal while it runs, so log output never goes
//! straight to stderr. It is written to `--log-file`, or held in memory and
//! printed with [`HeldLogs::release`] once the terminal is restored.
//! `RUST_LOG` always wins over the default filters.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use env_logger::{Builder, Env, Target, WriteStyle};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used when logging to a file and `RUST_LOG` is unset.
pub const FILE_FILTER: &str = "warn,spark_folio=debug";

/// Bytes of held output kept; later lines are dropped.
pub const HELD_LIMIT: usize = 64 * 1024;

/// Log output kept back while the screen is in use.
#[derive(Debug, Clone, Default)]
pub struct HeldLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl HeldLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything held so far.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Print everything held so far to stderr.
    pub fn release(&self) -> io::Result<()> {
        let held = self.take();
        if held.is_empty() {
            return Ok(());
        }
        let mut stderr = io::stderr().lock();
        stderr.write_all(&held)?;
        stderr.flush()
    }
}

impl Write for HeldLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        let room = HELD_LIMIT.saturating_sub(buf.len());
        buf.extend_from_slice(&bytes[..bytes.len().min(room)]);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Build the logger. Without `log_file` the output is held in memory and
/// the returned [`HeldLogs`] must be released after the screen is restored.
pub fn builder(log_file: Option<&Path>) -> io::Result<(Builder, Option<HeldLogs>)> {
    let default_filter = if log_file.is_some() {
        FILE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.write_style(WriteStyle::Never);

    let held = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file)));
            None
        }
        None => {
            let held = HeldLogs::new();
            builder.target(Target::Pipe(Box::new(held.clone())));
            Some(held)
        }
    };
    Ok((builder, held))
}

/// Install the global logger. A second call is a no-op.
pub fn init(log_file: Option<&Path>) -> io::Result<Option<HeldLogs>> {
    let (mut builder, held) = builder(log_file)?;
    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
    Ok(held)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.log");
        let (_, held) = builder(Some(&path)).unwrap();
        assert!(path.exists());
        assert!(held.is_none());
    }

    #[test]
    fn test_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("folio.log");
        assert!(builder(Some(&path)).is_err());
    }

    #[test]
    fn test_screen_logs_are_held() {
        let (_, held) = builder(None).unwrap();
        assert!(held.is_some());
    }

    #[test]
    fn test_held_logs_take_and_clear() {
        let held = HeldLogs::new();
        let mut writer = held.clone();
        writeln!(writer, "[WARN spark_folio] relay down").unwrap();

        assert_eq!(held.take(), b"[WARN spark_folio] relay down\n".to_vec());
        assert!(held.take().is_empty());
    }

    #[test]
    fn test_held_logs_capped() {
        let held = HeldLogs::new();
        let mut writer = held.clone();
        let chunk = vec![b'x'; 1000];
        for _ in 0..100 {
            assert_eq!(writer.write(&chunk).unwrap(), chunk.len());
        }
        assert_eq!(held.take().len(), HELD_LIMIT);
    }

    #[test]
    fn test_init_twice_is_ok() {
        init(None).unwrap();
        init(None).unwrap();
    }
}
