//! Appender over any `std::io::Write`

use crate::core::{Appender, Result, Written};
use std::io::{self, Write};

/// Write all of `buf`, counting what was accepted before a failure.
///
/// `Interrupted` is retried; a write accepting zero bytes fails with
/// `WriteZero`.
pub(crate) fn write_counted<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Written {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                let e = io::Error::new(io::ErrorKind::WriteZero, "failed to write whole buffer");
                return Written::partial(written, e);
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Written::partial(written, e),
        }
    }
    Written::all(written)
}

/// Appender writing straight to a `Write` implementation, unbuffered
///
/// # Example
///
/// ```
/// use fanout_logger::appenders::WriterAppender;
/// use fanout_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .appender(WriterAppender::new("sink", std::io::sink()))
///     .build()
///     .unwrap();
/// logger.info("discarded").unwrap();
/// ```
pub struct WriterAppender<W> {
    name: String,
    writer: W,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&mut self, buf: &[u8]) -> Written {
        write_counted(&mut self.writer, buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;

    /// Accepts at most `chunk` bytes per call and `budget` bytes in total
    struct Trickle {
        chunk: usize,
        budget: usize,
        interrupted_once: bool,
        out: Vec<u8>,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.interrupted_once {
                self.interrupted_once = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.chunk).min(self.budget);
            self.budget -= n;
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_writes_are_completed() {
        let mut trickle = Trickle { chunk: 2, budget: 100, interrupted_once: false, out: Vec::new() };
        let written = write_counted(&mut trickle, b"abcdefg");
        assert!(written.is_ok());
        assert_eq!(written.bytes, 7);
        assert_eq!(trickle.out, b"abcdefg");
    }

    #[test]
    fn test_failure_reports_partial_count() {
        let mut trickle = Trickle { chunk: 2, budget: 5, interrupted_once: true, out: Vec::new() };
        let written = write_counted(&mut trickle, b"abcdefg");
        assert_eq!(written.bytes, 5);
        let err = written.error.unwrap();
        assert!(matches!(err, LoggerError::IoError(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_zero_write_fails() {
        let mut full: &mut [u8] = &mut [0u8; 3];
        let written = write_counted(&mut full, b"abcdef");
        assert_eq!(written.bytes, 3);
        assert!(written.error.unwrap().to_string().contains("whole buffer"));
    }

    #[test]
    fn test_writer_appender() {
        let mut appender = WriterAppender::new("vec", Vec::new());
        assert!(appender.append(b"line\n").is_ok());
        appender.flush().unwrap();
        assert_eq!(appender.name(), "vec");
        assert_eq!(appender.into_inner(), b"line\n");
    }
}
