// src/lib.rs

#![no_std] // Specify no_std at the crate root

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod common;
pub mod manager;
pub mod sensor;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for convenience
pub use common::{ErrorKind, Metadata, SensorError, Transport};
pub use manager::{RouteOutcome, SensorManager};
pub use sensor::{Sensor, SensorKind, SensorStatus};
