// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod metadata;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From config.rs
pub use config::{FrameFormat, ManagerConfig, SerialConfig, ValueSync};

// From error.rs
pub use error::{ErrorKind, SensorError, Severity, TransportError};

// From hal_traits.rs
pub use hal_traits::{SerialPort, Transport};

// From metadata/
pub use metadata::{decode, Metadata};

// From types.rs
pub use types::{DataType, Parameter, ParameterMap, ParameterSet};
