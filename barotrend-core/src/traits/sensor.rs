//! Barometric sensor provider
//!
//! Reads follow the `nb` convention used across embedded-hal drivers:
//!
//! ```text
//! Ok(value)                   reading available
//! Err(WouldBlock)             conversion still in progress, ask next tick
//! Err(Other(SensorFault))     the sensor misbehaved
//! ```

use thiserror_no_std::Error;

/// Sensor-side failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// Bus transaction failed
    #[error("sensor bus error")]
    Bus,
    /// Device answered with data that cannot be a reading
    #[error("sensor returned invalid data")]
    InvalidData,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorFault {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Bus => defmt::write!(fmt, "sensor bus error"),
            Self::InvalidData => defmt::write!(fmt, "sensor returned invalid data"),
        }
    }
}

/// Combined temperature and pressure sensor
pub trait BarometricSensor {
    /// Probe and configure the device, `false` if it did not answer
    fn start(&mut self) -> bool;

    /// Temperature in °C
    fn read_temperature(&mut self) -> nb::Result<f32, SensorFault>;

    /// Station pressure in hPa
    fn read_pressure(&mut self) -> nb::Result<f32, SensorFault>;
}
