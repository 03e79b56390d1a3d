// src/sensor/sync.rs

use super::{Sensor, SensorStatus};
use crate::common::{
    config::ValueSync,
    error::{ErrorKind, SensorError},
    hal_traits::Transport,
    metadata::decode,
};

impl Sensor {
    /// Two-phase synchronisation with the remote sensor.
    ///
    /// Pushes the configuration if it is dirty, then (per `policy`) requests
    /// fresh values. Returns the status the remote side reported, if any.
    /// A response addressed to another sensor is dropped and yields `Ok(None)`.
    pub fn synchronize<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        policy: ValueSync,
    ) -> Result<Option<SensorStatus>, SensorError> {
        if self.configs_dirty {
            self.sync_configs(transport)?;
        }
        match policy {
            ValueSync::OnDirty if !self.values_dirty => Ok(None),
            _ => self.sync_values(transport),
        }
    }

    fn sync_configs<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), SensorError> {
        let message = self.encode();
        log::debug!("Sensor {}: pushing configuration {}", self.id, message);
        transport
            .send(&message)
            .map_err(|e| SensorError::transport("Sensor::sync_configs", &e))?;
        self.configs_dirty = false;
        Ok(())
    }

    fn sync_values<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<SensorStatus>, SensorError> {
        transport
            .send(&self.header())
            .map_err(|e| SensorError::transport("Sensor::sync_values", &e))?;
        let response = transport
            .receive()
            .map_err(|e| SensorError::transport("Sensor::sync_values", &e))?;

        let metadata = decode(&response).map_err(|cause| {
            SensorError::wrap(
                ErrorKind::MalformedRequest,
                "Sensor::sync_values",
                "Invalid update response",
                cause,
            )
        })?;

        if !metadata.is_valid_for(&self.id) {
            log::debug!(
                "Sensor {}: discarding response for {:?}",
                self.id,
                metadata.identifier
            );
            return Ok(None);
        }

        let reported = self.accept(&metadata)?;
        self.values_dirty = false;
        Ok(reported)
    }

    /// `synchronize` with the outcome settled on the sensor. Returns true on success.
    pub fn sync_with<T: Transport + ?Sized>(&mut self, transport: &mut T, policy: ValueSync) -> bool {
        let result = self.synchronize(transport, policy);
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
}
