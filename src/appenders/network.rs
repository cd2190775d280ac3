//! Network appender for remote logging
//!
//! Streams framed records to a remote server over TCP.

use super::writer::write_counted;
use crate::core::{Appender, LoggerError, Result, Written};
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Write timeout applied to the TCP stream
pub const NETWORK_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Network appender that sends records to a remote TCP server
///
/// # Example
///
/// ```no_run
/// use fanout_logger::appenders::NetworkAppender;
/// use fanout_logger::prelude::*;
///
/// let appender = NetworkAppender::new("127.0.0.1:8080")
///     .expect("Failed to connect to log server");
///
/// let logger = Logger::builder().appender(appender).build().unwrap();
/// logger.info("This record is sent to 127.0.0.1:8080").unwrap();
/// ```
pub struct NetworkAppender {
    stream: Option<TcpStream>,
    address: String,
    reconnect_on_error: bool,
}

impl NetworkAppender {
    /// Connect to `addr` (e.g. "localhost:8080")
    pub fn new(addr: impl ToSocketAddrs + ToString) -> Result<Self> {
        let address = addr.to_string();
        let stream = connect(&address)?;

        Ok(Self {
            stream: Some(stream),
            address,
            reconnect_on_error: true,
        })
    }

    /// Enable or disable one reconnect-and-resend after a failed write
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

fn connect(address: &str) -> Result<TcpStream> {
    let stream = TcpStream::connect(address).map_err(|e| {
        LoggerError::io_operation("connecting to log server", address.to_string(), e)
    })?;
    stream.set_write_timeout(Some(NETWORK_WRITE_TIMEOUT))?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

impl Appender for NetworkAppender {
    fn append(&mut self, buf: &[u8]) -> Written {
        let first = match self.stream.as_mut() {
            Some(stream) => write_counted(stream, buf),
            None => Written::partial(0, LoggerError::writer("Network stream not connected")),
        };
        if first.is_ok() {
            return first;
        }

        self.stream = None;
        if !self.reconnect_on_error {
            return first;
        }

        // The peer may have seen part of the record; it is sent again in full.
        match connect(&self.address) {
            Ok(mut stream) => {
                let retry = write_counted(&mut stream, buf);
                self.stream = Some(stream);
                Written {
                    bytes: first.bytes + retry.bytes,
                    error: retry.error,
                }
            }
            Err(reconnect_err) => Written::partial(
                first.bytes,
                LoggerError::writer(format!(
                    "Failed to send log and reconnect: {} (reconnect: {})",
                    first.error.map(|e| e.to_string()).unwrap_or_default(),
                    reconnect_err
                )),
            ),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut stream) = self.stream {
            stream.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "network"
    }
}
