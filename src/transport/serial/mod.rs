// src/transport/serial/mod.rs

// Polling and byte-level helpers
mod io_helpers;

use crate::common::{
    config::{SerialConfig, FLUSH_TIMEOUT, LINE_TERMINATOR, RX_BUFFER_CAPACITY},
    error::TransportError,
    hal_traits::{SerialPort, Transport},
};
use alloc::string::String;
use embedded_hal::delay::DelayNs;

/// Line-oriented [`Transport`] over a non-blocking serial port.
///
/// Every message is sent followed by `\r\n`. `receive` collects bytes until
/// `\n` or until `receive_timeout` of polling has elapsed.
#[derive(Debug)]
pub struct SerialTransport<P, D>
where
    P: SerialPort,
    D: DelayNs,
{
    port: P,
    delay: D,
    config: SerialConfig,
}

impl<P, D> SerialTransport<P, D>
where
    P: SerialPort,
    D: DelayNs,
{
    pub fn new(port: P, delay: D, config: SerialConfig) -> Self {
        SerialTransport {
            port,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Releases the port and the delay provider.
    pub fn release(self) -> (P, D) {
        (self.port, self.delay)
    }
}

impl<P, D> Transport for SerialTransport<P, D>
where
    P: SerialPort,
    D: DelayNs,
{
    type Error = TransportError<P::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        log::debug!(
            "Opening serial port {} at {} baud",
            self.config.port,
            self.config.baud_rate
        );
        self.port.set_config(&self.config).map_err(TransportError::Io)
    }

    fn send(&mut self, message: &str) -> Result<(), Self::Error> {
        let mut budget = self
            .config
            .write_timeout(message.len() + LINE_TERMINATOR.len());
        self.write_bytes(message.as_bytes(), &mut budget)?;
        self.write_bytes(LINE_TERMINATOR.as_bytes(), &mut budget)?;

        let mut flush_budget = FLUSH_TIMEOUT;
        self.execute_blocking_io_with_timeout(&mut flush_budget, |port| port.flush())
    }

    fn receive(&mut self) -> Result<String, Self::Error> {
        let line = self.read_line::<RX_BUFFER_CAPACITY>()?;
        core::str::from_utf8(&line)
            .map(String::from)
            .map_err(|_| TransportError::InvalidUtf8)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{config::ValueSync, error::ErrorKind, SensorError};
    use crate::sensor::{Sensor, SensorKind, SensorStatus};
    use crate::testing::{MockDelay, MockError, MockSerial};
    use alloc::vec;
    use core::time::Duration;

    fn transport(serial: MockSerial) -> SerialTransport<MockSerial, MockDelay> {
        SerialTransport::new(serial, MockDelay::default(), SerialConfig::default())
    }

    #[test]
    fn test_init_applies_config() {
        let mut t = transport(MockSerial::new());
        t.init().unwrap();
        assert_eq!(t.port().config, Some(SerialConfig::default()));
    }

    #[test]
    fn test_send_appends_terminator_and_flushes() {
        let mut t = transport(MockSerial::new());
        t.send("?type=ADC&id=0").unwrap();
        assert_eq!(t.port().tx, b"?type=ADC&id=0\r\n");
        assert_eq!(t.port().flushes, 1);
    }

    #[test]
    fn test_send_times_out_when_tx_stalls() {
        let mut serial = MockSerial::new();
        serial.tx_blocked = true;
        let mut t = transport(serial);
        assert!(matches!(t.send("?"), Err(TransportError::Timeout)));
    }

    #[test]
    fn test_receive_complete_line() {
        let mut t = transport(MockSerial::with_rx(b"?id=0&value=12\r\n"));
        assert_eq!(t.receive().unwrap(), "?id=0&value=12");
    }

    #[test]
    fn test_receive_stops_at_first_line() {
        let mut t = transport(MockSerial::with_rx(b"?id=0\r\n?id=1\r\n"));
        assert_eq!(t.receive().unwrap(), "?id=0");
        assert_eq!(t.receive().unwrap(), "?id=1");
    }

    #[test]
    fn test_receive_tolerates_slow_bytes() {
        let mut serial = MockSerial::new();
        serial.push_stalled(b"?id=2\n", 5);
        let mut t = transport(serial);
        assert_eq!(t.receive().unwrap(), "?id=2");
    }

    #[test]
    fn test_receive_timeout_without_bytes_is_empty() {
        let mut t = transport(MockSerial::new());
        assert_eq!(t.receive().unwrap(), "");
        let (_, delay) = t.release();
        assert!(delay.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_receive_cut_off_line_is_rejected() {
        let mut t = transport(MockSerial::with_rx(b"?id=0&val"));
        assert!(matches!(
            t.receive(),
            Err(TransportError::Incomplete { received: 9 })
        ));
    }

    #[test]
    fn test_cut_off_response_leaves_sensor_unsynced() {
        let mut t = transport(MockSerial::with_rx(b"?id=0&value=10"));
        let mut sensor = Sensor::new("0", SensorKind::Adc).unwrap();

        assert!(!sensor.sync_with(&mut t, ValueSync::Always));
        assert_eq!(sensor.value::<i32>("value").unwrap(), 0);
        assert!(sensor.values_dirty());
        assert_eq!(sensor.status(), SensorStatus::Error);
        assert_eq!(sensor.last_error().map(SensorError::kind), Some(ErrorKind::Transport));
    }

    #[test]
    fn test_line_of_full_capacity_fits() {
        let mut rx = vec![b'?'];
        rx.extend([b'a'; RX_BUFFER_CAPACITY - 1]);
        rx.extend(b"\r\n");
        let mut t = transport(MockSerial::with_rx(&rx));
        assert_eq!(t.receive().unwrap().len(), RX_BUFFER_CAPACITY);
    }

    #[test]
    fn test_carriage_return_inside_line_is_kept() {
        let mut t = transport(MockSerial::with_rx(b"?a\rb\r\n"));
        assert_eq!(t.receive().unwrap(), "?a\rb");
    }

    #[test]
    fn test_receive_buffer_overflow() {
        let long = [b'a'; RX_BUFFER_CAPACITY + 1];
        let mut t = transport(MockSerial::with_rx(&long));
        assert!(matches!(
            t.receive(),
            Err(TransportError::BufferOverflow {
                capacity: RX_BUFFER_CAPACITY
            })
        ));
    }

    #[test]
    fn test_overflow_drains_rest_of_line() {
        let mut rx = vec![b'?'];
        rx.extend([b'a'; 300]);
        rx.extend(b"\r\n?id=1&value=5\r\n");
        let mut t = transport(MockSerial::with_rx(&rx));

        assert!(matches!(
            t.receive(),
            Err(TransportError::BufferOverflow {
                capacity: RX_BUFFER_CAPACITY
            })
        ));
        assert_eq!(t.receive().unwrap(), "?id=1&value=5");
    }

    #[test]
    fn test_receive_rejects_invalid_utf8() {
        let mut t = transport(MockSerial::with_rx(&[b'?', 0xFF, b'\n']));
        assert!(matches!(t.receive(), Err(TransportError::InvalidUtf8)));
    }

    #[test]
    fn test_io_error_is_propagated() {
        let mut serial = MockSerial::with_rx(b"?id=0\n");
        serial.fail_io = true;
        let mut t = transport(serial);
        assert!(matches!(t.receive(), Err(TransportError::Io(MockError))));
        assert!(matches!(t.send("?"), Err(TransportError::Io(MockError))));
    }
}
