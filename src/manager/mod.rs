// src/manager/mod.rs

// Handshake descriptor parsing
pub mod descriptor;

pub use descriptor::{parse_descriptor, DescriptorEntry, DEFAULT_FLEET};

use crate::common::{
    config::{ManagerConfig, DISCOVERY_REQUEST},
    error::SensorError,
    hal_traits::Transport,
    metadata::{decode, Metadata},
};
use crate::sensor::{NoView, Sensor, SensorKind, SensorView};

use alloc::vec::Vec;

/// What happened to an inbound message handed to [`SensorManager::route`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RouteOutcome {
    /// Applied to the addressed sensor.
    Delivered,
    /// The addressed sensor refused the payload; the error is held by the sensor.
    Rejected,
    /// Text could not be decoded.
    Malformed,
    /// Decoded, but without identifier or payload.
    Invalid,
    /// No sensor with the decoded identifier.
    UnknownSensor,
}

/// Registry owning the sensor fleet, the transport and the view.
///
/// Sensors are kept in insertion order and identifiers are unique: the first
/// sensor registered under an identifier wins.
#[derive(Debug)]
pub struct SensorManager<T, V = NoView>
where
    T: Transport,
    V: SensorView,
{
    transport: T,
    view: V,
    config: ManagerConfig,
    sensors: Vec<Sensor>,
}

impl<T: Transport> SensorManager<T> {
    pub fn new(transport: T) -> Self {
        SensorManager::with_view(transport, NoView)
    }
}

impl<T, V> SensorManager<T, V>
where
    T: Transport,
    V: SensorView,
{
    pub fn with_view(transport: T, view: V) -> Self {
        SensorManager {
            transport,
            view,
            config: ManagerConfig::default(),
            sensors: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Initialises the transport. Call once before any traffic.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.transport
            .init()
            .map_err(|e| SensorError::transport("SensorManager::init", &e))
    }

    // --- Accessors ---

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Releases the registry, returning the transport and the view.
    pub fn into_parts(self) -> (T, V) {
        (self.transport, self.view)
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Sensors in insertion order.
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Sensor> {
        self.sensors.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|sensor| sensor.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Sensor> {
        self.sensors.iter_mut().find(|sensor| sensor.id() == id)
    }

    // --- Building ---

    /// Adds a sensor and runs its construct hook.
    ///
    /// Returns false (and drops `sensor`) if the identifier is already taken.
    pub fn insert(&mut self, mut sensor: Sensor) -> bool {
        if self.contains(sensor.id()) {
            log::warn!(
                "Sensor {} already registered, ignoring duplicate {}",
                sensor.id(),
                sensor.kind()
            );
            return false;
        }
        sensor.reconstruct(&mut self.view);
        self.sensors.push(sensor);
        true
    }

    fn create(&mut self, id: &str, kind: SensorKind) -> Result<bool, SensorError> {
        let sensor = Sensor::new(id, kind)?;
        Ok(self.insert(sensor))
    }

    /// Replaces the fleet with the built-in default list.
    pub fn build_default(&mut self) -> Result<usize, SensorError> {
        self.reset_all();
        for (id, kind) in DEFAULT_FLEET {
            self.create(id, *kind)?;
        }
        log::info!("Built default fleet of {} sensors", self.sensors.len());
        Ok(self.sensors.len())
    }

    /// Replaces the fleet with the sensors listed in a handshake descriptor.
    ///
    /// Unknown kinds and duplicate identifiers are skipped. A missing sentinel
    /// or a sensor that cannot be constructed aborts the build.
    pub fn build(&mut self, descriptor: &str) -> Result<usize, SensorError> {
        self.reset_all();
        for entry in parse_descriptor(descriptor)? {
            self.create(&entry.id, entry.kind)?;
        }
        log::info!("Built fleet of {} sensors from descriptor", self.sensors.len());
        Ok(self.sensors.len())
    }

    /// Asks the remote side for its descriptor and builds the fleet from it.
    pub fn handshake(&mut self) -> Result<usize, SensorError> {
        self.transport
            .send(DISCOVERY_REQUEST)
            .map_err(|e| SensorError::transport("SensorManager::handshake", &e))?;
        let descriptor = self
            .transport
            .receive()
            .map_err(|e| SensorError::transport("SensorManager::handshake", &e))?;
        log::debug!("Handshake descriptor: {:?}", descriptor);
        self.build(&descriptor)
    }

    // --- Routing ---

    /// Delivers an inbound value message to the addressed sensor.
    ///
    /// Never fails: malformed or unaddressable messages are logged and dropped.
    pub fn route(&mut self, text: &str) -> RouteOutcome {
        match self.addressed(text) {
            Ok((sensor, metadata)) => {
                if sensor.deliver(&metadata) {
                    RouteOutcome::Delivered
                } else {
                    RouteOutcome::Rejected
                }
            }
            Err(outcome) => outcome,
        }
    }

    /// Delivers an inbound configuration message to the addressed sensor.
    pub fn route_config(&mut self, text: &str) -> RouteOutcome {
        match self.addressed(text) {
            Ok((sensor, metadata)) => {
                if let Some(kind) = metadata.kind() {
                    if !kind.eq_ignore_ascii_case(sensor.kind().as_str()) {
                        let warning = SensorError::warning(
                            "SensorManager::route_config",
                            alloc::format!(
                                "Configuration for {} addressed to {} sensor {}, dropping",
                                kind,
                                sensor.kind(),
                                sensor.id()
                            ),
                        );
                        sensor.settle::<()>(Err(warning));
                        return RouteOutcome::Rejected;
                    }
                }
                if sensor.apply_configuration(&metadata.payload) {
                    RouteOutcome::Delivered
                } else {
                    RouteOutcome::Rejected
                }
            }
            Err(outcome) => outcome,
        }
    }

    fn addressed(
        &mut self,
        text: &str,
    ) -> Result<(&mut Sensor, Metadata), RouteOutcome> {
        let metadata = decode(text).map_err(|err| {
            log::warn!("Dropping message: {}", err);
            RouteOutcome::Malformed
        })?;
        if !metadata.is_valid() {
            log::warn!("Dropping message without identifier or payload: {:?}", text);
            return Err(RouteOutcome::Invalid);
        }
        match self.sensors.iter_mut().find(|s| s.id() == metadata.identifier) {
            Some(sensor) => Ok((sensor, metadata)),
            None => {
                log::warn!("Dropping message for unknown sensor {}", metadata.identifier);
                Err(RouteOutcome::UnknownSensor)
            }
        }
    }

    /// Receives one message and routes it. `Ok(None)` when nothing arrived.
    pub fn poll(&mut self) -> Result<Option<RouteOutcome>, SensorError> {
        let text = self
            .transport
            .receive()
            .map_err(|e| SensorError::transport("SensorManager::poll", &e))?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.route(&text)))
    }

    // --- Per-Sensor Operations ---

    /// Synchronises one sensor. False if it is unknown or the sync failed.
    pub fn sync(&mut self, id: &str) -> bool {
        let policy = self.config.value_sync;
        match self.sensors.iter_mut().find(|s| s.id() == id) {
            Some(sensor) => sensor.sync_with(&mut self.transport, policy),
            None => {
                log::warn!("Cannot sync unknown sensor {}", id);
                false
            }
        }
    }

    /// Logs the report of one sensor. False if it is unknown.
    pub fn print(&self, id: &str) -> bool {
        match self.get(id) {
            Some(sensor) => {
                sensor.print();
                true
            }
            None => {
                log::warn!("Cannot print unknown sensor {}", id);
                false
            }
        }
    }

    // --- Bulk Operations ---
    // Each sensor settles its own failure; one failing sensor never stops the rest.

    /// Returns the number of sensors that synchronised successfully.
    pub fn synchronize_all(&mut self) -> usize {
        let policy = self.config.value_sync;
        let mut synced = 0;
        for sensor in &mut self.sensors {
            if sensor.sync_with(&mut self.transport, policy) {
                synced += 1;
            }
        }
        synced
    }

    pub fn print_all(&self) {
        for sensor in &self.sensors {
            sensor.print();
        }
    }

    /// Draws every sensor with a pending redraw. Returns the number drawn.
    pub fn redraw_all(&mut self) -> usize {
        let mut drawn = 0;
        for sensor in &mut self.sensors {
            if sensor.redraw(&mut self.view) {
                drawn += 1;
            }
        }
        drawn
    }

    /// Re-runs the construct hook of every sensor.
    pub fn reconstruct_all(&mut self) {
        for sensor in &mut self.sensors {
            sensor.reconstruct(&mut self.view);
        }
    }

    /// Releases every sensor together with its error chain.
    pub fn reset_all(&mut self) {
        if !self.sensors.is_empty() {
            log::debug!("Releasing {} sensors", self.sensors.len());
        }
        self.sensors.clear();
    }
}

impl<'a, T: Transport, V: SensorView> IntoIterator for &'a SensorManager<T, V> {
    type Item = &'a Sensor;
    type IntoIter = core::slice::Iter<'a, Sensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sensors.iter()
    }
}
