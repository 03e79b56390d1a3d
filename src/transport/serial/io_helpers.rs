// src/transport/serial/io_helpers.rs

use super::SerialTransport;
use crate::common::{config::POLL_INTERVAL_US, error::TransportError, hal_traits::SerialPort};
use arrayvec::ArrayVec;
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use nb::Result as NbResult;

const POLL_INTERVAL: Duration = Duration::from_micros(POLL_INTERVAL_US as u64);

impl<P, D> SerialTransport<P, D>
where
    P: SerialPort,
    D: DelayNs,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it stops
    /// returning `WouldBlock`.
    ///
    /// Time spent polling is taken from `budget`; once it is used up the
    /// operation fails with `Timeout`.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        budget: &mut Duration,
        mut f: FN,
    ) -> Result<T, TransportError<P::Error>>
    where
        FN: FnMut(&mut P) -> NbResult<T, P::Error>,
    {
        loop {
            match f(&mut self.port) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if budget.is_zero() {
                        return Err(TransportError::Timeout);
                    }
                    self.delay.delay_us(POLL_INTERVAL_US);
                    *budget = budget.saturating_sub(POLL_INTERVAL);
                }
                Err(nb::Error::Other(e)) => return Err(TransportError::Io(e)),
            }
        }
    }

    pub(super) fn write_bytes(
        &mut self,
        bytes: &[u8],
        budget: &mut Duration,
    ) -> Result<(), TransportError<P::Error>> {
        for byte in bytes {
            self.execute_blocking_io_with_timeout(budget, |port| port.write_byte(*byte))?;
        }
        Ok(())
    }

    /// Reads one line (up to `\n`) within the receive timeout.
    ///
    /// The terminator and a preceding `\r` are not returned and do not count
    /// against the capacity. Nothing arriving in time yields an empty line; a
    /// line cut off by the timeout fails with `Incomplete`. An oversized line
    /// is drained up to its terminator before failing with `BufferOverflow`,
    /// so the next read starts on a fresh line.
    pub(super) fn read_line<const N: usize>(
        &mut self,
    ) -> Result<ArrayVec<u8, N>, TransportError<P::Error>> {
        let mut budget = self.config.receive_timeout;
        let mut line = ArrayVec::<u8, N>::new();
        let mut received = 0usize;
        let mut pending_cr = false;
        let mut overflowed = false;

        loop {
            let byte = match self.execute_blocking_io_with_timeout(&mut budget, |port| port.read_byte()) {
                Ok(byte) => byte,
                Err(TransportError::Timeout) if received == 0 => return Ok(line),
                Err(TransportError::Timeout) => {
                    log::trace!("Receive timed out after {} bytes", received);
                    return Err(if overflowed {
                        TransportError::BufferOverflow { capacity: N }
                    } else {
                        TransportError::Incomplete { received }
                    });
                }
                Err(e) => return Err(e),
            };
            received += 1;

            if byte == b'\n' {
                break;
            }
            if overflowed {
                continue;
            }
            if core::mem::take(&mut pending_cr) && line.try_push(b'\r').is_err() {
                overflowed = true;
                continue;
            }
            if byte == b'\r' {
                pending_cr = true;
            } else if line.try_push(byte).is_err() {
                overflowed = true;
            }
        }

        if overflowed {
            return Err(TransportError::BufferOverflow { capacity: N });
        }
        Ok(line)
    }
}
