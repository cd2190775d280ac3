//! Appender trait for log output destinations

use super::error::{LoggerError, Result};

/// Outcome of writing one buffer to an appender.
///
/// `bytes` counts what the destination accepted, even when the write
/// stopped early with an error.
#[derive(Debug)]
#[must_use]
pub struct Written {
    pub bytes: usize,
    pub error: Option<LoggerError>,
}

impl Written {
    /// The whole buffer went through
    pub fn all(bytes: usize) -> Self {
        Self { bytes, error: None }
    }

    /// The write stopped after `bytes` bytes
    pub fn partial(bytes: usize, error: impl Into<LoggerError>) -> Self {
        Self {
            bytes,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the byte count when only success matters
    pub fn into_result(self) -> Result<usize> {
        match self.error {
            None => Ok(self.bytes),
            Some(e) => Err(e),
        }
    }
}

/// A destination for serialized, framed records
pub trait Appender: Send {
    /// Write the whole buffer, reporting how much was accepted.
    fn append(&mut self, buf: &[u8]) -> Written;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<A: Appender + ?Sized> Appender for Box<A> {
    fn append(&mut self, buf: &[u8]) -> Written {
        (**self).append(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
