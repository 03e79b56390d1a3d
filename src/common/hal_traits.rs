// src/common/hal_traits.rs

use super::config::SerialConfig;
use alloc::string::String;
use core::fmt::{Debug, Display};

/// Message-level transport between the manager and the remote sensors.
///
/// One call carries exactly one protocol message. Implementations own their
/// timeout: `receive` must return (possibly empty) text once it expires
/// instead of blocking forever.
pub trait Transport {
    /// Associated error type for communication errors.
    type Error: Debug + Display;

    /// Prepares the underlying channel. Called once before any traffic.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Sends one message. Line termination is the transport's business.
    fn send(&mut self, message: &str) -> Result<(), Self::Error>;

    /// Receives one message without its line terminator.
    ///
    /// Returns empty text when nothing arrived in time. A line cut off by the
    /// timeout is an error, never partial text.
    fn receive(&mut self) -> Result<String, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    fn send(&mut self, message: &str) -> Result<(), Self::Error> {
        (**self).send(message)
    }

    fn receive(&mut self) -> Result<String, Self::Error> {
        (**self).receive()
    }
}

/// Abstraction for non-blocking byte-oriented serial communication (UART).
pub trait SerialPort {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the transmit buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Applies baud rate, framing and pin assignment.
    ///
    /// This operation might be blocking, hence `Result` instead of `nb::Result`.
    fn set_config(&mut self, config: &SerialConfig) -> Result<(), Self::Error>;
}
