//! Fan-out over several appenders
//!
//! [`Fanout`] presents an ordered set of appenders as a single one. Every
//! write is attempted on every appender in declaration order; a failing
//! appender never prevents the attempts on the ones after it. There is no
//! rollback and no per-appender retry.

use super::appender::{Appender, Written};
use super::error::{LoggerError, Result};

/// Ordered, fixed set of appenders written as one
pub struct Fanout {
    appenders: Vec<Box<dyn Appender>>,
}

impl Fanout {
    pub fn new(appenders: Vec<Box<dyn Appender>>) -> Self {
        Self { appenders }
    }

    pub fn len(&self) -> usize {
        self.appenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.is_empty()
    }

    /// Names of the appenders, in write order
    pub fn names(&self) -> Vec<&str> {
        self.appenders.iter().map(|a| a.name()).collect()
    }

    /// Write `buf` to every appender.
    ///
    /// `bytes` is the sum of what every appender accepted, failing ones
    /// included, so it says nothing about which appender got how much. If
    /// any appender failed, `error` is a [`LoggerError::Fanout`] holding the
    /// failures in declaration order.
    pub fn write(&mut self, buf: &[u8]) -> Written {
        let mut bytes = 0;
        let mut failures = Vec::new();

        for appender in self.appenders.iter_mut() {
            let written = appender.append(buf);
            bytes += written.bytes;
            if let Some(e) = written.error {
                failures.push(e);
            }
        }

        Written {
            bytes,
            error: LoggerError::fanout(failures),
        }
    }

    /// Flush every appender, aggregating failures like [`Fanout::write`].
    pub fn flush_all(&mut self) -> Result<()> {
        let failures: Vec<_> = self
            .appenders
            .iter_mut()
            .filter_map(|appender| appender.flush().err())
            .collect();

        match LoggerError::fanout(failures) {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}

impl Appender for Fanout {
    fn append(&mut self, buf: &[u8]) -> Written {
        self.write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_all()
    }

    fn name(&self) -> &str {
        "fanout"
    }
}
