// src/common/error.rs

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt::{self, Debug, Write};

/// Category of a [`SensorError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, thiserror::Error)]
pub enum ErrorKind {
    /// Text did not start with the `?` sentinel or carried no usable record.
    #[error("malformed request")]
    MalformedRequest,

    /// No configuration parameter of the sensor matched.
    #[error("configuration not found")]
    ConfigurationNotFound,

    /// A configuration parameter was rejected (bad type or bad schema entry).
    #[error("invalid configuration")]
    InvalidConfiguration,

    /// No value parameter of the sensor matched.
    #[error("value not found")]
    ValueNotFound,

    /// A value parameter was rejected (bad type or bad schema entry).
    #[error("invalid value")]
    InvalidValue,

    /// Stored text could not be converted to the requested type.
    #[error("invalid data type")]
    InvalidDataType,

    /// Building a sensor failed; the cause holds the reason.
    #[error("sensor initialization failed")]
    SensorInitializationFailed,

    /// The injected transport reported a failure.
    #[error("transport failure")]
    Transport,

    /// The remote sensor reported `status=error`.
    #[error("remote sensor fault")]
    RemoteFault,

    /// Non-fatal condition. Never moves a sensor to `ERROR`.
    #[error("warning")]
    Warning,
}

/// How bad an error is. Ordered from least to most severe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl ErrorKind {
    pub const fn severity(self) -> Severity {
        match self {
            ErrorKind::Warning => Severity::Warning,
            ErrorKind::InvalidDataType
            | ErrorKind::SensorInitializationFailed
            | ErrorKind::Transport => Severity::Critical,
            _ => Severity::Error,
        }
    }
}

/// Error value threaded through the codec, sensors and the manager.
///
/// Each error owns its cause, so a chain is dropped as a whole together with
/// whichever sensor or operation holds the outermost error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("({origin}) {kind}: {message}")]
pub struct SensorError {
    kind: ErrorKind,
    message: String,
    /// Operation that raised the error, e.g. `"Sensor::configure"`.
    origin: &'static str,
    #[source]
    cause: Option<Box<SensorError>>,
}

impl SensorError {
    pub fn new(kind: ErrorKind, origin: &'static str, message: impl Into<String>) -> Self {
        SensorError {
            kind,
            message: message.into(),
            origin,
            cause: None,
        }
    }

    /// Creates an error that wraps `cause` as the next link of the chain.
    pub fn wrap(
        kind: ErrorKind,
        origin: &'static str,
        message: impl Into<String>,
        cause: SensorError,
    ) -> Self {
        SensorError::new(kind, origin, message).with_cause(cause)
    }

    pub fn warning(origin: &'static str, message: impl Into<String>) -> Self {
        SensorError::new(ErrorKind::Warning, origin, message)
    }

    /// Converts a transport failure into a `Transport` error.
    pub fn transport<E: fmt::Display>(origin: &'static str, error: &E) -> Self {
        SensorError::new(ErrorKind::Transport, origin, error.to_string())
    }

    /// Replaces the cause of this error.
    pub fn with_cause(mut self, cause: SensorError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn origin(&self) -> &'static str {
        self.origin
    }

    #[inline]
    pub fn cause(&self) -> Option<&SensorError> {
        self.cause.as_deref()
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        self.kind == ErrorKind::Warning
    }

    /// Iterates the chain, starting with `self` and ending with the root cause.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    pub fn root_cause(&self) -> &SensorError {
        // chain() always yields at least self
        self.chain().last().unwrap_or(self)
    }

    /// Writes one link at `depth`, indented with `" \t"` per level, without a newline.
    fn write_link<W: Write>(&self, out: &mut W, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            out.write_str(" \t")?;
        }
        write!(out, "({}) {}: {}", self.origin, self.kind, self.message)
    }

    /// Writes one line per link, each nested cause indented one level deeper.
    pub fn render_into<W: Write>(&self, out: &mut W) -> fmt::Result {
        for (depth, link) in self.chain().enumerate() {
            link.write_link(out, depth)?;
            out.write_char('\n')?;
        }
        Ok(())
    }

    /// Renders the whole chain as text (see [`SensorError::render_into`]).
    pub fn render_chain(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_into(&mut out);
        out
    }

    /// Rendered lines of the chain, as written by [`SensorError::render_into`].
    pub fn render_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.chain().enumerate().map(|(depth, link)| {
            let mut line = String::new();
            let _ = link.write_link(&mut line, depth);
            line
        })
    }

    /// Logs every link of the chain at the level matching the severity.
    pub fn log(&self) {
        let level = match self.severity() {
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Critical => log::Level::Error,
        };
        for line in self.render_lines() {
            log::log!(level, "{}", line);
        }
    }
}

/// Iterator over a [`SensorError`] and its causes.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a SensorError>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a SensorError;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause.as_deref();
        Some(current)
    }
}

/// Failure of a byte-level transport. `E` is the error type of the underlying port.
#[derive(Debug, thiserror::Error)]
pub enum TransportError<E = ()>
where
    E: Debug,
{
    /// Underlying I/O error from the port implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Operation did not complete within the configured timeout.
    #[error("Operation timed out")]
    Timeout,

    /// Bytes arrived but the line terminator did not before the timeout.
    #[error("Incomplete line: {received} bytes without terminator")]
    Incomplete { received: usize },

    /// Received line did not fit the receive buffer.
    #[error("Receive buffer overflow: capacity {capacity} bytes")]
    BufferOverflow { capacity: usize },

    /// Received bytes were not valid UTF-8.
    #[error("Received bytes are not valid UTF-8")]
    InvalidUtf8,
}
