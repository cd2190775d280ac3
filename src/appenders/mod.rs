//! Appender implementations

pub mod console;
pub mod file;
pub mod memory;
#[cfg(feature = "network")]
pub mod network;
pub mod writer;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use file::FileAppender;
pub use memory::MemoryAppender;
#[cfg(feature = "network")]
pub use network::NetworkAppender;
pub use writer::WriterAppender;

// Re-export traits for backward compatibility
pub use crate::core::{Appender, Written};
