// src/testing.rs

// Test doubles shared by the unit tests of sensor, manager and transport.

use crate::common::{
    config::SerialConfig,
    hal_traits::{SerialPort, Transport},
};
use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;
use embedded_hal::delay::DelayNs;

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockError;

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mock link down")
    }
}

// --- Mock Transport ---
/// Replies are handed out in order; an exhausted queue behaves like a timeout.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    pub responses: VecDeque<String>,
    pub sent: Vec<String>,
    pub initialized: bool,
    pub fail_send: bool,
    pub fail_receive: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<'a>(responses: impl IntoIterator<Item = &'a str>) -> Self {
        MockTransport {
            responses: responses.into_iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn push_response(&mut self, response: &str) {
        self.responses.push_back(response.to_string());
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.initialized = true;
        Ok(())
    }

    fn send(&mut self, message: &str) -> Result<(), Self::Error> {
        if self.fail_send {
            return Err(MockError);
        }
        self.sent.push(message.to_string());
        Ok(())
    }

    fn receive(&mut self) -> Result<String, Self::Error> {
        if self.fail_receive {
            return Err(MockError);
        }
        Ok(self.responses.pop_front().unwrap_or_default())
    }
}

// --- Mock Serial Port ---
/// `None` in `rx` yields a single `WouldBlock`; an empty queue blocks forever.
#[derive(Debug, Default)]
pub(crate) struct MockSerial {
    pub rx: VecDeque<Option<u8>>,
    pub tx: Vec<u8>,
    pub flushes: usize,
    pub config: Option<SerialConfig>,
    pub tx_blocked: bool,
    pub fail_io: bool,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rx(bytes: &[u8]) -> Self {
        MockSerial {
            rx: bytes.iter().copied().map(Some).collect(),
            ..Self::default()
        }
    }

    /// Queues `bytes`, each preceded by `stalls` empty polls.
    pub fn push_stalled(&mut self, bytes: &[u8], stalls: usize) {
        for byte in bytes {
            self.rx.extend(core::iter::repeat(None).take(stalls));
            self.rx.push_back(Some(*byte));
        }
    }
}

impl SerialPort for MockSerial {
    type Error = MockError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.fail_io {
            return Err(nb::Error::Other(MockError));
        }
        match self.rx.pop_front() {
            Some(Some(byte)) => Ok(byte),
            _ => Err(nb::Error::WouldBlock),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.fail_io {
            return Err(nb::Error::Other(MockError));
        }
        if self.tx_blocked {
            return Err(nb::Error::WouldBlock);
        }
        self.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }

    fn set_config(&mut self, config: &SerialConfig) -> Result<(), Self::Error> {
        self.config = Some(*config);
        Ok(())
    }
}

// --- Mock Delay ---
/// Virtual clock: delays only advance a counter.
#[derive(Debug, Default)]
pub(crate) struct MockDelay {
    elapsed_ns: u64,
}

impl MockDelay {
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns)
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
