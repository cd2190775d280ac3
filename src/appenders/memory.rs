//! In-memory appender for capturing output

use crate::core::{Appender, Result, Written};
use parking_lot::Mutex;
use std::sync::Arc;

/// Appender collecting everything into a shared buffer.
///
/// Clones share the same buffer, so one clone can be handed to a logger and
/// another kept to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, buf: &[u8]) -> Written {
        self.buffer.lock().extend_from_slice(buf);
        Written::all(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
