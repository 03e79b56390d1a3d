// src/common/types.rs

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use super::error::ErrorKind;

// --- Parameter Data Types ---

/// Declared type of a sensor parameter. Values always travel as text; the
/// declared type decides which text is acceptable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    Int,
    Double,
    Float,
    String,
}

impl DataType {
    /// Returns true if `text` parses as this type.
    pub fn accepts(self, text: &str) -> bool {
        match self {
            DataType::Int => text.parse::<i64>().is_ok(),
            DataType::Double => text.parse::<f64>().is_ok(),
            DataType::Float => text.parse::<f32>().is_ok(),
            DataType::String => true,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "INT",
            DataType::Double => "DOUBLE",
            DataType::Float => "FLOAT",
            DataType::String => "STRING",
        };
        f.write_str(name)
    }
}

// --- Parameter ---

/// A named, typed, unit-bearing value held by a sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub value: String,
    pub unit: String,
    pub data_type: DataType,
}

impl Parameter {
    pub fn new(value: impl Into<String>, unit: impl Into<String>, data_type: DataType) -> Self {
        Parameter {
            value: value.into(),
            unit: unit.into(),
            data_type,
        }
    }
}

/// Parameters ordered by (lower-case) name.
pub type ParameterMap = BTreeMap<String, Parameter>;

/// Selects one of the two parameter maps of a sensor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParameterSet {
    /// Tunable settings pushed to the remote sensor.
    Configuration,
    /// Measured readings reported by the remote sensor.
    Values,
}

impl ParameterSet {
    /// Error kind used when a name is missing from this set.
    pub const fn not_found_kind(self) -> ErrorKind {
        match self {
            ParameterSet::Configuration => ErrorKind::ConfigurationNotFound,
            ParameterSet::Values => ErrorKind::ValueNotFound,
        }
    }

    /// Error kind used when a value is rejected by this set's schema.
    pub const fn invalid_kind(self) -> ErrorKind {
        match self {
            ParameterSet::Configuration => ErrorKind::InvalidConfiguration,
            ParameterSet::Values => ErrorKind::InvalidValue,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ParameterSet::Configuration => "configuration",
            ParameterSet::Values => "value",
        }
    }
}

/// Canonical form of a parameter name: ASCII lower-case.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_accepts() {
        assert!(DataType::Int.accepts("12"));
        assert!(DataType::Int.accepts("-3"));
        assert!(!DataType::Int.accepts("12.5"));
        assert!(!DataType::Int.accepts(""));
        assert!(DataType::Float.accepts("25.5"));
        assert!(DataType::Double.accepts("1e3"));
        assert!(!DataType::Double.accepts("warm"));
        assert!(DataType::String.accepts(""));
        assert!(DataType::String.accepts("anything"));
    }

    #[test]
    fn test_parameter_set_kinds() {
        assert_eq!(ParameterSet::Configuration.not_found_kind(), ErrorKind::ConfigurationNotFound);
        assert_eq!(ParameterSet::Values.not_found_kind(), ErrorKind::ValueNotFound);
        assert_eq!(ParameterSet::Configuration.invalid_kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(ParameterSet::Values.invalid_kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Resolution"), "resolution");
        assert_eq!(normalize_name("humidity"), "humidity");
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(alloc::format!("{}", DataType::Float), "FLOAT");
    }
}
