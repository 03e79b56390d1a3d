// src/sensor/view.rs

use super::{Sensor, SensorKind};
use crate::common::error::SensorError;

/// Presentation hooks, one pair per sensor kind.
///
/// `construct_*` runs once when a sensor joins a manager (and again on
/// reconstruct); `draw_*` runs when a sensor has changes pending display.
/// Every hook defaults to a no-op.
pub trait SensorView {
    fn construct_adc(&mut self, _sensor: &Sensor) -> Result<(), SensorError> {
        Ok(())
    }

    fn construct_th(&mut self, _sensor: &Sensor) -> Result<(), SensorError> {
        Ok(())
    }

    fn draw_adc(&mut self, _sensor: &Sensor) -> Result<(), SensorError> {
        Ok(())
    }

    fn draw_th(&mut self, _sensor: &Sensor) -> Result<(), SensorError> {
        Ok(())
    }
}

/// View without any presentation.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoView;

impl SensorView for NoView {}

impl<V: SensorView + ?Sized> SensorView for &mut V {
    fn construct_adc(&mut self, sensor: &Sensor) -> Result<(), SensorError> {
        (**self).construct_adc(sensor)
    }

    fn construct_th(&mut self, sensor: &Sensor) -> Result<(), SensorError> {
        (**self).construct_th(sensor)
    }

    fn draw_adc(&mut self, sensor: &Sensor) -> Result<(), SensorError> {
        (**self).draw_adc(sensor)
    }

    fn draw_th(&mut self, sensor: &Sensor) -> Result<(), SensorError> {
        (**self).draw_th(sensor)
    }
}

impl Sensor {
    /// Runs the construct hook of this sensor's kind.
    pub fn construct<V: SensorView + ?Sized>(&mut self, view: &mut V) -> Result<(), SensorError> {
        match self.kind {
            SensorKind::Adc => view.construct_adc(self)?,
            SensorKind::Th => view.construct_th(self)?,
        }
        self.redraw_pending = true;
        Ok(())
    }

    /// Runs the draw hook if a redraw is pending. Returns whether it ran.
    pub fn draw<V: SensorView + ?Sized>(&mut self, view: &mut V) -> Result<bool, SensorError> {
        if !self.redraw_pending {
            return Ok(false);
        }
        match self.kind {
            SensorKind::Adc => view.draw_adc(self)?,
            SensorKind::Th => view.draw_th(self)?,
        }
        self.redraw_pending = false;
        Ok(true)
    }

    /// `draw` with a failure kept on the sensor.
    pub fn redraw<V: SensorView + ?Sized>(&mut self, view: &mut V) -> bool {
        let result = self.draw(view);
        self.settle(result).unwrap_or(false)
    }

    /// `construct` with a failure kept on the sensor.
    pub fn reconstruct<V: SensorView + ?Sized>(&mut self, view: &mut V) -> bool {
        let result = self.construct(view);
        self.settle(result).is_some()
    }
}
