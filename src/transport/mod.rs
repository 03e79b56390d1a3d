// src/transport/mod.rs

// Line transport over a non-blocking byte port (UART)
pub mod serial;

// Line transport over the process console
#[cfg(feature = "std")]
pub mod stdio;

pub use serial::SerialTransport;
#[cfg(feature = "std")]
pub use stdio::StdioTransport;
