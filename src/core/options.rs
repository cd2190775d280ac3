//! Construction-time options for log records
//!
//! An option is a function applied to a [`LogRecord`] while it is being
//! built. Options run in the order they are given and a later option writing
//! the same field overwrites the earlier value.

use super::error::LoggerError;
use super::field_value::FieldValue;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Mutator applied to a record at construction time
pub type LogOption = Box<dyn Fn(&mut LogRecord) + Send + Sync>;

/// Data key used by [`with_source`] for the function name
pub const SRC_FUNCTION_KEY: &str = "src_function";
/// Data key used by [`with_source`] for `file:line`
pub const SRC_FILE_LINE_KEY: &str = "src_file_line";

/// Set a data field to any value convertible into a [`FieldValue`].
pub fn with_data(key: impl Into<String>, value: impl Into<FieldValue>) -> LogOption {
    let key = key.into();
    let value = value.into();
    Box::new(move |record| record.insert(key.clone(), value.clone()))
}

/// Set a data field from any serde-serializable value.
///
/// Values JSON cannot represent make the JSON serializer fail later.
pub fn with_serialized<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> LogOption {
    with_data(key, FieldValue::from_serialize(value))
}

/// Stamp the record with the current time.
pub fn with_timestamp() -> LogOption {
    Box::new(|record| record.set_created_at(Utc::now()))
}

/// Set the severity level of the record.
pub fn with_level(level: LogLevel) -> LogOption {
    Box::new(move |record| record.set_level(level))
}

/// Record where the log comes from as `"<function> at <file>:<line>"`.
///
/// Offset 0 is the function that applied the options (the caller of
/// [`LogRecord::new`] or of [`Logger::log`](super::Logger::log)); each extra
/// offset walks one frame further up the stack. Nothing is written when the
/// frame cannot be resolved. In builds without line tables only offset 0
/// resolves, using the call site recorded by `#[track_caller]`.
pub fn with_source_location(key: impl Into<String>, offset: usize) -> LogOption {
    let key = key.into();
    Box::new(move |record| {
        if let Some(frame) = record.call_site().and_then(|site| resolve_frame(site, offset)) {
            record.insert(key.clone(), format!("{} at {}:{}", frame.function, frame.file, frame.line));
        }
    })
}

/// Record the calling function and its `file:line` under
/// [`SRC_FUNCTION_KEY`] and [`SRC_FILE_LINE_KEY`].
pub fn with_source() -> LogOption {
    Box::new(|record| {
        if let Some(frame) = record.call_site().and_then(|site| resolve_frame(site, 0)) {
            record.insert(SRC_FUNCTION_KEY, frame.function);
            record.insert(SRC_FILE_LINE_KEY, format!("{}:{}", frame.file, frame.line));
        }
    })
}

/// Record the files found under `dir` with their sizes.
///
/// The value is a map with a `files` list of `{path, size}` entries, paths
/// relative to `dir` and `/`-separated, in lexical order. If the walk fails
/// it stops there and the map also carries an `error` message next to the
/// files collected so far.
pub fn with_fs_snapshot(key: impl Into<String>, dir: impl Into<PathBuf>) -> LogOption {
    let key = key.into();
    let dir = dir.into();
    Box::new(move |record| record.insert(key.clone(), fs_snapshot(&dir)))
}

struct Frame {
    function: String,
    file: String,
    line: u32,
}

/// Symbol name, file and line of one resolved stack frame
type RawFrame = (Option<String>, Option<PathBuf>, Option<u32>);

/// Symbols that belong to the logger itself or to stack walking
const LIBRARY_FRAME_PREFIXES: &[&str] = &[
    "backtrace::",
    "fanout_logger::",
    "<fanout_logger::",
    "<alloc::boxed::Box",
    "core::ops::function::",
];

/// Walk the current stack and return the frame `offset` levels above the
/// one executing `anchor`.
fn resolve_frame(anchor: &Location<'_>, offset: usize) -> Option<Frame> {
    let mut frames: Vec<RawFrame> = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            frames.push((
                symbol.name().map(|name| format!("{:#}", name)),
                symbol.filename().map(Path::to_path_buf),
                symbol.lineno(),
            ));
        });
        true
    });

    locate_frame(frames, anchor, offset)
}

fn locate_frame(frames: Vec<RawFrame>, anchor: &Location<'_>, offset: usize) -> Option<Frame> {
    let anchored = frames.iter().position(|(_, file, line)| {
        *line == Some(anchor.line())
            && file
                .as_deref()
                .is_some_and(|file| file.ends_with(anchor.file()))
    });

    if let Some(start) = anchored {
        let (function, file, line) = frames.into_iter().nth(start + offset)?;
        return Some(Frame {
            function: function?,
            file: file?.display().to_string(),
            line: line?,
        });
    }

    // No line tables: the caller is the first named frame outside the library.
    let start = frames.iter().position(|(name, _, _)| {
        name.as_deref()
            .is_some_and(|name| !LIBRARY_FRAME_PREFIXES.iter().any(|p| name.starts_with(p)))
    })?;
    let (function, file, line) = frames.into_iter().nth(start + offset)?;
    if offset == 0 {
        return Some(Frame {
            function: function?,
            file: anchor.file().to_string(),
            line: anchor.line(),
        });
    }
    Some(Frame {
        function: function?,
        file: file?.display().to_string(),
        line: line?,
    })
}

fn fs_snapshot(dir: &Path) -> FieldValue {
    let mut files = Vec::new();
    let outcome = walk_files(dir, Path::new(""), &mut files);

    let mut snapshot = BTreeMap::new();
    snapshot.insert("files".to_string(), FieldValue::List(files));
    if let Err(e) = outcome {
        snapshot.insert("error".to_string(), FieldValue::String(e.to_string()));
    }
    FieldValue::Map(snapshot)
}

fn walk_files(root: &Path, relative: &Path, files: &mut Vec<FieldValue>) -> Result<(), LoggerError> {
    let dir = root.join(relative);
    let read_err = |e: std::io::Error| {
        LoggerError::io_operation("walking directory", format!("{}: {}", dir.display(), e), e)
    };

    let mut entries = fs::read_dir(&dir)
        .map_err(read_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = relative.join(entry.file_name());
        let stat_err = |e: std::io::Error| {
            let message = format!("{}: {}", entry.path().display(), e);
            LoggerError::io_operation("reading file info", message, e)
        };

        if entry.file_type().map_err(stat_err)?.is_dir() {
            walk_files(root, &path, files)?;
            continue;
        }

        // Symlinks are recorded, not followed.
        let size = entry.metadata().map_err(stat_err)?.len();
        let mut info = BTreeMap::new();
        info.insert("path".to_string(), FieldValue::String(slash_path(&path)));
        info.insert("size".to_string(), FieldValue::UInt(size));
        files.push(FieldValue::Map(info));
    }
    Ok(())
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
