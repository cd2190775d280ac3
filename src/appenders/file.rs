//! File appender implementation

use super::writer::write_counted;
use crate::core::{Appender, LoggerError, Result, Written};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appender writing records to a file opened in append mode.
///
/// Writes go straight to the file; nothing is buffered in between.
pub struct FileAppender {
    file: File,
    path: PathBuf,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self { file, path })
    }

    /// Create `logs.<unix_seconds>.txt` inside `dir`.
    ///
    /// The directory is created if it does not exist and reused otherwise.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fanout_logger::appenders::FileAppender;
    ///
    /// let appender = FileAppender::in_dir("logs").unwrap();
    /// println!("logging to {}", appender.path().display());
    /// ```
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                format!("cannot create '{}'", dir.display()),
                e,
            )
        })?;

        Self::new(dir.join(log_file_name(Utc::now().timestamp())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// File name used by [`FileAppender::in_dir`] for a given epoch second
pub fn log_file_name(unix_seconds: i64) -> String {
    format!("logs.{}.txt", unix_seconds)
}

impl Appender for FileAppender {
    fn append(&mut self, buf: &[u8]) -> Written {
        write_counted(&mut self.file, buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_appends() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");

        let mut appender = FileAppender::new(&path)?;
        assert!(appender.append(b"one\n").is_ok());
        drop(appender);

        let mut appender = FileAppender::new(&path)?;
        assert!(appender.append(b"two\n").is_ok());
        appender.flush()?;

        assert_eq!(fs::read_to_string(&path)?, "one\ntwo\n");
        Ok(())
    }

    #[test]
    fn test_in_dir_creates_directory() -> Result<()> {
        let dir = tempdir()?;
        let logs = dir.path().join("nested").join("logs");

        let before = Utc::now().timestamp();
        let appender = FileAppender::in_dir(&logs)?;
        let after = Utc::now().timestamp();

        assert!(logs.is_dir());
        let name = appender.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!((before..=after).any(|s| name == log_file_name(s)), "unexpected name {}", name);
        Ok(())
    }

    #[test]
    fn test_in_dir_reuses_existing_directory() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("keep.txt"), "kept")?;

        FileAppender::in_dir(dir.path())?;

        assert_eq!(fs::read_to_string(dir.path().join("keep.txt"))?, "kept");
        Ok(())
    }

    #[test]
    fn test_in_dir_fails_on_file_path() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory")?;

        let err = FileAppender::in_dir(&blocker).err().expect("directory creation fails");
        assert!(err.to_string().contains("creating log directory"));
        Ok(())
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file_name(1736332245), "logs.1736332245.txt");
    }
}
