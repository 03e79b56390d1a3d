// src/sensor/schema.rs

use super::{Sensor, SensorKind};
use crate::common::error::SensorError;
use crate::common::types::{DataType, Parameter, ParameterSet};

/// Registers the default parameters of the sensor's kind.
pub(super) fn register_defaults(sensor: &mut Sensor) -> Result<(), SensorError> {
    match sensor.kind {
        SensorKind::Adc => {
            sensor.register(
                ParameterSet::Configuration,
                "resolution",
                Parameter::new("12", "bits", DataType::Int),
            )?;
            sensor.register(
                ParameterSet::Values,
                "value",
                Parameter::new("0", "", DataType::Int),
            )?;
        }
        SensorKind::Th => {
            sensor.register(
                ParameterSet::Configuration,
                "precision",
                Parameter::new("2", "decimals", DataType::Int),
            )?;
            sensor.register(
                ParameterSet::Values,
                "temperature",
                Parameter::new("0", "Celsius", DataType::Float),
            )?;
            sensor.register(
                ParameterSet::Values,
                "humidity",
                Parameter::new("0", "%", DataType::Int),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_sizes() {
        let adc = Sensor::new("0", SensorKind::Adc).unwrap();
        assert_eq!((adc.configs().len(), adc.values().len()), (1, 1));
        let th = Sensor::new("1", SensorKind::Th).unwrap();
        assert_eq!((th.configs().len(), th.values().len()), (1, 2));
    }

    #[test]
    fn test_defaults_match_declared_types() {
        for kind in [SensorKind::Adc, SensorKind::Th] {
            let sensor = Sensor::new("0", kind).unwrap();
            for param in sensor.configs().values().chain(sensor.values().values()) {
                assert!(param.data_type.accepts(&param.value));
            }
        }
    }
}
