//! Constants for the Barotrend Core
//!
//! Every numeric value the state machines and algorithms depend on is defined
//! here with its unit and origin, grouped by domain:
//! - **Physics**: barometric reduction and unit conversion
//! - **Time**: deadlines and periodic intervals of the reference device
//! - **Buffers**: fixed capacities of queues, windows and strings
//! - **Statistics**: trend window size and its coupled critical value
//!
//! ## Usage Guidelines
//!
//! 1. Use these constants instead of magic numbers
//! 2. Include the unit in the name (`_MS`, `_HPA`, `_M`)
//! 3. Coupled constants (window size and critical value) change together

/// Physical constants for barometric reduction and unit conversion.
pub mod physics;

/// Deadlines and periodic intervals.
pub mod time;

/// Fixed capacities for queues, windows and bounded strings.
pub mod buffers;

/// Trend detection window and hypothesis test parameters.
pub mod statistics;

pub use physics::{CELSIUS_TO_KELVIN_OFFSET, BAROMETRIC_EXPONENT, TEMPERATURE_LAPSE_RATE_K_PER_M};

pub use time::{
    LINK_START_TIMEOUT_MS, BROKER_SESSION_TIMEOUT_MS, SENSOR_STABILISATION_MS,
    SENSOR_SCAN_INTERVAL_MS, STATUS_REPORT_INTERVAL_MS,
};

pub use buffers::{TELEMETRY_QUEUE_CAPACITY, MAX_TOPIC_LEN, MAX_PAYLOAD_LEN};

pub use statistics::{TREND_WINDOW_SIZE, TREND_CRITICAL_T_VALUE};
