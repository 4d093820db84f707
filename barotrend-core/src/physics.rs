//! Barometric reductions
//!
//! A station reading is the pressure at the sensor's altitude. Weather maps and
//! forecasts use the equivalent pressure at sea level, which removes the
//! altitude dependency so readings from different sites compare directly:
//!
//! ```text
//! P_sea = P_local / (1 − L·h / (T + L·h + 273.15))^5.257
//!
//! L = 0.0065 K/m temperature lapse rate
//! h = site altitude (m)
//! T = air temperature at the site (°C)
//! ```

use crate::constants::physics::{
    BAROMETRIC_EXPONENT, CELSIUS_TO_KELVIN_OFFSET, FAHRENHEIT_OFFSET, FAHRENHEIT_PER_CELSIUS,
    TEMPERATURE_LAPSE_RATE_K_PER_M,
};

/// Equivalent sea-level pressure (hPa) for a local reading
///
/// At altitude zero this returns the local pressure unchanged.
pub fn sea_level_pressure(local_hpa: f32, temperature_c: f32, altitude_m: f32) -> f32 {
    let lapse = f64::from(altitude_m) * TEMPERATURE_LAPSE_RATE_K_PER_M;
    let kelvin = f64::from(temperature_c) + lapse + CELSIUS_TO_KELVIN_OFFSET;
    let ratio = 1.0 - lapse / kelvin;

    (f64::from(local_hpa) / libm::pow(ratio, BAROMETRIC_EXPONENT)) as f32
}

/// `F = 32 + 9·C/5`
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    (FAHRENHEIT_OFFSET + FAHRENHEIT_PER_CELSIUS * f64::from(celsius)) as f32
}
