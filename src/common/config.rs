// src/common/config.rs

use core::time::Duration;

// === Wire Protocol ===

/// Leading character of every protocol message.
pub const SENTINEL: char = '?';
/// Separates `key=value` pairs (and descriptor entries).
pub const PAIR_SEPARATOR: char = '&';
/// Separates a key from its value.
pub const KEY_VALUE_SEPARATOR: char = '=';
/// Separates identifier from kind in a handshake descriptor entry.
pub const DESCRIPTOR_SEPARATOR: char = ':';

/// Reserved key carrying the sensor identifier.
pub const KEY_ID: &str = "id";
/// Reserved key carrying the sensor kind.
pub const KEY_TYPE: &str = "type";
/// Reserved key carrying the status reported by the remote sensor.
pub const KEY_STATUS: &str = "status";

/// Request sent during a handshake; the remote side answers with a descriptor list.
pub const DISCOVERY_REQUEST: &str = "?";

/// Appended to every message sent over a serial line.
pub const LINE_TERMINATOR: &str = "\r\n";

// === Serial Defaults ===

pub const DEFAULT_PORT: u8 = 0;
pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Time allowed for a complete response line to arrive.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(100);
/// Extra time allowed per message on top of its nominal transmit time.
pub const WRITE_TIMEOUT_MARGIN: Duration = Duration::from_millis(20);
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(10);
/// Delay between polls of a port that returned `WouldBlock`.
pub const POLL_INTERVAL_US: u32 = 100;
/// Capacity of the receive line buffer, in bytes.
pub const RX_BUFFER_CAPACITY: usize = 256;

/// Serial frame layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FrameFormat {
    /// 8 data bits, no parity, 1 stop bit.
    Serial8N1,
    /// 7 data bits, even parity, 1 stop bit.
    Serial7E1,
}

impl FrameFormat {
    /// Bits on the wire per transmitted byte (start + data + parity + stop).
    pub const fn bits_per_byte(self) -> u32 {
        match self {
            // 1 start + 8 data + 1 stop / 1 start + 7 data + 1 parity + 1 stop
            FrameFormat::Serial8N1 | FrameFormat::Serial7E1 => 10,
        }
    }
}

/// Settings applied to a serial port when its transport is initialised.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SerialConfig {
    pub port: u8,
    pub baud_rate: u32,
    pub frame: FrameFormat,
    /// `None` keeps the board's default pin.
    pub rx_pin: Option<u8>,
    pub tx_pin: Option<u8>,
    pub receive_timeout: Duration,
}

impl SerialConfig {
    /// Nominal time needed to put one byte on the wire.
    pub fn byte_duration(&self) -> Duration {
        let bits = u64::from(self.frame.bits_per_byte());
        let baud = u64::from(self.baud_rate.max(1));
        Duration::from_micros(bits * 1_000_000 / baud)
    }

    /// Time allowed to transmit `len` bytes.
    pub fn write_timeout(&self, len: usize) -> Duration {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        self.byte_duration().saturating_mul(len) + WRITE_TIMEOUT_MARGIN
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port: DEFAULT_PORT,
            baud_rate: DEFAULT_BAUD_RATE,
            frame: FrameFormat::Serial8N1,
            rx_pin: None,
            tx_pin: None,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}

// === Manager ===

/// When `synchronize` asks the remote sensor for fresh values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ValueSync {
    /// On every synchronize.
    #[default]
    Always,
    /// Only while `values_dirty` is set.
    OnDirty,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ManagerConfig {
    pub value_sync: ValueSync,
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_defaults() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.port, 0);
        assert_eq!(cfg.baud_rate, 9600);
        assert_eq!(cfg.frame, FrameFormat::Serial8N1);
        assert_eq!(cfg.rx_pin, None);
        assert_eq!(cfg.receive_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_byte_and_write_timing() {
        let cfg = SerialConfig::default();
        // 10 bits at 9600 baud
        assert_eq!(cfg.byte_duration(), Duration::from_micros(1041));
        assert_eq!(
            cfg.write_timeout(10),
            Duration::from_micros(10_410) + WRITE_TIMEOUT_MARGIN
        );
    }

    #[test]
    fn test_value_sync_default() {
        assert_eq!(ManagerConfig::default().value_sync, ValueSync::Always);
    }
}
