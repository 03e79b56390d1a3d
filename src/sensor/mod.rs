// src/sensor/mod.rs

// Kind-specific parameter schemas
mod schema;
// Synchronisation with the remote sensor over a Transport
mod sync;
// Construct/draw hooks
pub mod view;

pub use view::{NoView, SensorView};

use crate::common::{
    error::{ErrorKind, SensorError},
    metadata::{encode_header, encode_record, value_for_key, Metadata},
    types::{normalize_name, Parameter, ParameterMap, ParameterSet},
};

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

// --- Kind & Status ---

/// Closed set of sensor kinds known to the registry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SensorKind {
    /// Analog to digital converter.
    Adc,
    /// Temperature and humidity sensor.
    Th,
}

impl SensorKind {
    /// Kind as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            SensorKind::Adc => "ADC",
            SensorKind::Th => "TH",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            SensorKind::Adc => "Analog to Digital Converter",
            SensorKind::Th => "Temperature & Humidity Sensor",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = SensorError;

    /// Parses a wire kind, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [SensorKind::Adc, SensorKind::Th]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                SensorError::warning("SensorKind::from_str", format!("Unknown sensor type: {}", s))
            })
    }
}

/// Operating state of a sensor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SensorStatus {
    Ok,
    Error,
    Offline,
}

impl SensorStatus {
    /// Numeric status code used in reports.
    pub const fn code(self) -> i8 {
        match self {
            SensorStatus::Ok => 0,
            SensorStatus::Error => -1,
            SensorStatus::Offline => 1,
        }
    }

    /// Parses a status reported by a remote sensor (`ok`, `error`, `offline`).
    pub fn from_report(text: &str) -> Option<Self> {
        [SensorStatus::Ok, SensorStatus::Error, SensorStatus::Offline]
            .into_iter()
            .find(|status| status.as_report().eq_ignore_ascii_case(text))
    }

    pub const fn as_report(self) -> &'static str {
        match self {
            SensorStatus::Ok => "ok",
            SensorStatus::Error => "error",
            SensorStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorStatus::Ok => "OK",
            SensorStatus::Error => "ERROR",
            SensorStatus::Offline => "OFFLINE",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

// --- Sensor ---

/// Digital twin of one remote sensor.
///
/// The status is derived from the held error: it is `Error` exactly when
/// `last_error` holds a non-warning error. Both dirty flags start set and are
/// only cleared by a successful synchronisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    id: String,
    kind: SensorKind,
    status: SensorStatus,
    configs: ParameterMap,
    values: ParameterMap,
    last_error: Option<SensorError>,
    configs_dirty: bool,
    values_dirty: bool,
    redraw_pending: bool,
}

impl Sensor {
    /// Builds a sensor with the default parameters of its kind.
    ///
    /// Any failure is reported as `SensorInitializationFailed` wrapping the
    /// original cause; the partially built sensor is dropped.
    pub fn new(id: impl Into<String>, kind: SensorKind) -> Result<Self, SensorError> {
        let id = id.into();
        let built = Self::bare(id, kind).and_then(|mut sensor| {
            schema::register_defaults(&mut sensor)?;
            Ok(sensor)
        });

        match built {
            Ok(sensor) => {
                log::debug!("Sensor [{}]:{} created successfully.", sensor.id, sensor.kind);
                Ok(sensor)
            }
            Err(cause) => {
                log::error!("Error during sensor initialization: {}", cause);
                Err(SensorError::wrap(
                    ErrorKind::SensorInitializationFailed,
                    "Sensor::new",
                    "Error during sensor initialization.",
                    cause,
                ))
            }
        }
    }

    fn bare(id: String, kind: SensorKind) -> Result<Self, SensorError> {
        if id.is_empty() || id.contains(['&', '=', '?', ':']) {
            return Err(SensorError::new(
                ErrorKind::MalformedRequest,
                "Sensor::bare",
                format!("Invalid sensor identifier: {:?}", id),
            ));
        }
        Ok(Sensor {
            id,
            kind,
            status: SensorStatus::Ok,
            configs: ParameterMap::new(),
            values: ParameterMap::new(),
            last_error: None,
            configs_dirty: true,
            values_dirty: true,
            redraw_pending: true,
        })
    }

    // --- Accessors ---

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    #[inline]
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    #[inline]
    pub fn status(&self) -> SensorStatus {
        self.status
    }

    #[inline]
    pub fn last_error(&self) -> Option<&SensorError> {
        self.last_error.as_ref()
    }

    /// Message of the held error, or `"No error"`.
    pub fn error_message(&self) -> &str {
        self.last_error.as_ref().map_or("No error", SensorError::message)
    }

    #[inline]
    pub fn configs(&self) -> &ParameterMap {
        &self.configs
    }

    #[inline]
    pub fn values(&self) -> &ParameterMap {
        &self.values
    }

    #[inline]
    pub fn configs_dirty(&self) -> bool {
        self.configs_dirty
    }

    #[inline]
    pub fn values_dirty(&self) -> bool {
        self.values_dirty
    }

    #[inline]
    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    pub fn parameters(&self, set: ParameterSet) -> &ParameterMap {
        match set {
            ParameterSet::Configuration => &self.configs,
            ParameterSet::Values => &self.values,
        }
    }

    fn parameters_mut(&mut self, set: ParameterSet) -> &mut ParameterMap {
        match set {
            ParameterSet::Configuration => &mut self.configs,
            ParameterSet::Values => &mut self.values,
        }
    }

    fn mark_dirty(&mut self, set: ParameterSet) {
        match set {
            ParameterSet::Configuration => self.configs_dirty = true,
            ParameterSet::Values => self.values_dirty = true,
        }
    }

    /// Marks both parameter maps as confirmed by the remote sensor.
    pub fn reset_dirty(&mut self) {
        self.configs_dirty = false;
        self.values_dirty = false;
    }

    // --- Schema ---

    /// Adds a parameter to the schema. Only used while the sensor is built.
    fn register(
        &mut self,
        set: ParameterSet,
        name: &str,
        param: Parameter,
    ) -> Result<(), SensorError> {
        let key = normalize_name(name);
        if key.is_empty() || key.contains(['&', '=']) {
            return Err(SensorError::new(
                set.invalid_kind(),
                "Sensor::register",
                format!("Invalid {} parameter name: {:?}", set.label(), name),
            ));
        }
        if !param.data_type.accepts(&param.value) {
            return Err(SensorError::new(
                set.invalid_kind(),
                "Sensor::register",
                format!("Default '{}' of '{}' is not a valid {}", param.value, key, param.data_type),
            ));
        }
        let map = self.parameters_mut(set);
        if map.contains_key(&key) {
            return Err(SensorError::new(
                set.invalid_kind(),
                "Sensor::register",
                format!("Duplicate {} parameter '{}'", set.label(), key),
            ));
        }
        map.insert(key, param);
        Ok(())
    }

    // --- Parameters ---

    pub fn parameter(&self, set: ParameterSet, name: &str) -> Option<&Parameter> {
        self.parameters(set).get(&normalize_name(name))
    }

    /// Reads a parameter converted to `T`.
    ///
    /// Missing or empty values fail with the set's not-found kind; text that
    /// does not convert fails with `InvalidDataType`.
    pub fn get_parameter<T: FromStr>(&self, set: ParameterSet, name: &str) -> Result<T, SensorError> {
        let value = self
            .parameter(set, name)
            .map(|param| param.value.as_str())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                SensorError::new(
                    set.not_found_kind(),
                    "Sensor::get_parameter",
                    format!("{} not found for key: {}", set.label(), name),
                )
            })?;

        value.parse::<T>().map_err(|_| {
            SensorError::new(
                ErrorKind::InvalidDataType,
                "Sensor::get_parameter",
                format!("{} is non-{} format string!", value, core::any::type_name::<T>()),
            )
        })
    }

    /// Overwrites an existing parameter. Schemas are closed: unknown names fail.
    pub fn set_parameter(
        &mut self,
        set: ParameterSet,
        name: &str,
        value: &str,
    ) -> Result<(), SensorError> {
        let param = self
            .parameters_mut(set)
            .get_mut(&normalize_name(name))
            .ok_or_else(|| {
                SensorError::new(
                    set.not_found_kind(),
                    "Sensor::set_parameter",
                    format!("{} not found for key: {}", set.label(), name),
                )
            })?;
        if !param.data_type.accepts(value) {
            return Err(SensorError::new(
                set.invalid_kind(),
                "Sensor::set_parameter",
                format!("'{}' is not a valid {} for '{}'", value, param.data_type, name),
            ));
        }
        param.value = value.to_string();
        self.mark_dirty(set);
        Ok(())
    }

    pub fn config<T: FromStr>(&self, name: &str) -> Result<T, SensorError> {
        self.get_parameter(ParameterSet::Configuration, name)
    }

    pub fn value<T: FromStr>(&self, name: &str) -> Result<T, SensorError> {
        self.get_parameter(ParameterSet::Values, name)
    }

    pub fn set_config(&mut self, name: &str, value: &str) -> Result<(), SensorError> {
        self.set_parameter(ParameterSet::Configuration, name, value)
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), SensorError> {
        self.set_parameter(ParameterSet::Values, name, value)
    }

    /// Unit of a parameter; empty when the parameter does not exist.
    pub fn unit(&self, set: ParameterSet, name: &str) -> &str {
        self.parameter(set, name).map_or("", |param| param.unit.as_str())
    }

    pub fn config_unit(&self, name: &str) -> &str {
        self.unit(ParameterSet::Configuration, name)
    }

    pub fn value_unit(&self, name: &str) -> &str {
        self.unit(ParameterSet::Values, name)
    }

    // --- Protocol Operations ---

    /// Overwrites every configuration parameter named in `text`.
    pub fn configure(&mut self, text: &str) -> Result<usize, SensorError> {
        self.apply(ParameterSet::Configuration, text, "Sensor::configure")
    }

    /// Overwrites every value parameter named in `text`.
    pub fn update(&mut self, text: &str) -> Result<usize, SensorError> {
        self.apply(ParameterSet::Values, text, "Sensor::update")
    }

    /// Shared scan/overwrite contract of `configure` and `update`.
    ///
    /// Nothing is written unless every matched value is valid for its type.
    fn apply(
        &mut self,
        set: ParameterSet,
        text: &str,
        origin: &'static str,
    ) -> Result<usize, SensorError> {
        let mut matched: Vec<(String, &str)> = Vec::new();
        for (name, param) in self.parameters(set) {
            let value = value_for_key(text, name);
            if value.is_empty() {
                continue;
            }
            if !param.data_type.accepts(value) {
                return Err(SensorError::new(
                    set.invalid_kind(),
                    origin,
                    format!("'{}' is not a valid {} for '{}'", value, param.data_type, name),
                ));
            }
            matched.push((name.clone(), value));
        }

        if matched.is_empty() {
            return Err(SensorError::new(
                set.not_found_kind(),
                origin,
                format!("No {} found in string: {:?}", set.label(), text),
            ));
        }

        let map = self.parameters_mut(set);
        for (name, value) in &matched {
            if let Some(param) = map.get_mut(name) {
                param.value = (*value).to_string();
            }
        }
        self.mark_dirty(set);
        self.redraw_pending = true;
        Ok(matched.len())
    }

    /// Applies an inbound record addressed to this sensor.
    ///
    /// Returns the status reported by the remote side, if any. A record
    /// reporting `offline` carries no values and is not applied.
    pub fn accept(&mut self, metadata: &Metadata) -> Result<Option<SensorStatus>, SensorError> {
        let reported = metadata.status.as_deref().and_then(|text| {
            let status = SensorStatus::from_report(text);
            if status.is_none() {
                log::warn!("Sensor {}: ignoring unknown reported status {:?}", self.id, text);
            }
            status
        });
        if reported == Some(SensorStatus::Offline) {
            return Ok(reported);
        }
        self.update(&metadata.payload)?;
        Ok(reported)
    }

    /// Basic communication header, `?type=<KIND>&id=<ID>`.
    pub fn header(&self) -> String {
        encode_header(self.kind.as_str(), &self.id)
    }

    /// Configuration message: header plus every configuration parameter.
    pub fn encode(&self) -> String {
        encode_record(
            self.kind.as_str(),
            &self.id,
            self.configs
                .iter()
                .map(|(name, param)| (name.as_str(), param.value.as_str())),
        )
    }

    // --- Error & Status ---

    /// Replaces the held error; the status follows it.
    ///
    /// A non-warning error moves the sensor to `Error`, anything else to `Ok`.
    pub fn set_error(&mut self, error: Option<SensorError>) {
        self.status = match &error {
            Some(err) if !err.is_warning() => SensorStatus::Error,
            _ => SensorStatus::Ok,
        };
        self.last_error = error;
    }

    /// Applies a status, e.g. one reported by the remote sensor.
    pub fn set_status(&mut self, status: SensorStatus) {
        match status {
            SensorStatus::Ok => self.set_error(None),
            SensorStatus::Error => self.set_error(Some(SensorError::new(
                ErrorKind::RemoteFault,
                "Sensor::set_status",
                format!("Sensor {} reported an error", self.id),
            ))),
            SensorStatus::Offline => {
                self.last_error = Some(SensorError::warning(
                    "Sensor::set_status",
                    format!("Sensor {} is offline", self.id),
                ));
                self.status = SensorStatus::Offline;
            }
        }
    }

    /// Settles the outcome of an operation: errors are logged and kept as
    /// `last_error`, success clears a previously held error.
    pub fn settle<T>(&mut self, result: Result<T, SensorError>) -> Option<T> {
        match result {
            Ok(value) => {
                if self.last_error.is_some() {
                    self.set_error(None);
                }
                Some(value)
            }
            Err(err) => {
                err.log();
                self.set_error(Some(err));
                None
            }
        }
    }

    /// `configure` with the error kept on the sensor. Returns true on success.
    pub fn apply_configuration(&mut self, text: &str) -> bool {
        let result = self.configure(text);
        self.settle(result).is_some()
    }

    /// `update` with the error kept on the sensor. Returns true on success.
    pub fn apply_update(&mut self, text: &str) -> bool {
        let result = self.update(text);
        self.settle(result).is_some()
    }

    /// `accept` with the error kept on the sensor, then the reported status applied.
    pub fn deliver(&mut self, metadata: &Metadata) -> bool {
        let result = self.accept(metadata);
        match self.settle(result) {
            Some(reported) => {
                if let Some(status) = reported {
                    self.set_status(status);
                }
                true
            }
            None => false,
        }
    }

    /// Logs the sensor report line by line.
    pub fn print(&self) {
        for line in self.to_string().lines() {
            log::info!("{}", line);
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sensor UID: {}", self.id)?;
        writeln!(f, "\tSensor Type: {}", self.kind)?;
        writeln!(f, "\tSensor Description: {}", self.description())?;
        writeln!(f, "\tSensor Status: {}", self.status)?;
        writeln!(f, "\tSensor Error: {}", self.error_message())?;
        writeln!(f, "\tSensor Configurations:")?;
        for (name, param) in &self.configs {
            writeln!(f, "\t\t{}: {} {}", name, param.value, param.unit)?;
        }
        writeln!(f, "\tSensor Values:")?;
        for (name, param) in &self.values {
            writeln!(f, "\t\t{}: {} {}", name, param.value, param.unit)?;
        }
        Ok(())
    }
}
