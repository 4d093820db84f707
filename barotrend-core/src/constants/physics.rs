//! Physical Constants for Barometric Reduction
//!
//! Values used to reduce station pressure to its sea-level equivalent and to
//! convert between temperature scales.

// ===== BAROMETRIC FORMULA =====

/// Standard temperature lapse rate in the troposphere (K/m).
///
/// Temperature falls roughly 6.5 K per kilometre of altitude.
///
/// Source: International Standard Atmosphere (ISA)
pub const TEMPERATURE_LAPSE_RATE_K_PER_M: f64 = 0.0065;

/// Exponent of the hypsometric reduction to sea level.
///
/// Equal to g·M / (R·L) for dry air, rounded as the reduction is
/// conventionally published.
///
/// Source: Keisan sea-level pressure calculator (CASIO)
pub const BAROMETRIC_EXPONENT: f64 = 5.257;

/// Offset between Celsius and Kelvin.
///
/// Source: NIST Special Publication 330 (2019)
pub const CELSIUS_TO_KELVIN_OFFSET: f64 = 273.15;

// ===== UNIT CONVERSION =====

/// Fahrenheit offset at 0 °C.
pub const FAHRENHEIT_OFFSET: f64 = 32.0;

/// Fahrenheit degrees per Celsius degree.
pub const FAHRENHEIT_PER_CELSIUS: f64 = 9.0 / 5.0;

// ===== REFERENCE SITE =====

/// Altitude of the reference installation above sea level (m).
///
/// Deployments must measure and configure their own value.
pub const DEFAULT_SITE_ALTITUDE_M: f32 = 338.0;
