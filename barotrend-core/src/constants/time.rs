//! Time-Related Constants
//!
//! Deadlines and intervals of the reference device, all in milliseconds.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

// ===== DEADLINES =====

/// Time allowed for the network link to report connected (milliseconds).
///
/// Expiry raises `LinkStartFailure`.
pub const LINK_START_TIMEOUT_MS: u64 = 30 * MS_PER_SECOND;

/// Time allowed for a broker session to open or close (milliseconds).
///
/// Expiry raises `BrokerConnectFailure` or `BrokerDisconnectFailure`.
pub const BROKER_SESSION_TIMEOUT_MS: u64 = 30 * MS_PER_SECOND;

/// Warm-up time after the sensor is started (milliseconds).
pub const SENSOR_STABILISATION_MS: u64 = 500;

/// Time allowed for a sensor conversion once a read starts (milliseconds).
///
/// A BMP280 conversion at the highest oversampling takes under 50 ms. Expiry
/// raises `SensorMalfunction`.
pub const SENSOR_READ_TIMEOUT_MS: u64 = 2 * MS_PER_SECOND;

// ===== PERIODIC INTERVALS =====

/// Interval between sensor reads (milliseconds).
///
/// The trend estimate needs six equally spaced observations over at least an
/// hour, so production devices read every 10 minutes. Shorter intervals give
/// an answer, but not necessarily a meaningful one.
pub const SENSOR_SCAN_INTERVAL_MS: u64 = 10 * MS_PER_MINUTE;

/// Interval between device status reports (milliseconds).
pub const STATUS_REPORT_INTERVAL_MS: u64 = 5 * MS_PER_MINUTE;
