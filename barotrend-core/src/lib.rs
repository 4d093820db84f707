//! Control core for a barometric telemetry device
//!
//! Samples a pressure/temperature sensor, classifies the short-term pressure
//! trend, and delivers readings to a message broker over a link that comes
//! and goes, while keeping a remote update channel available.
//!
//! Key constraints:
//! - Runs on a microcontroller with tens of KB of free heap (ESP8266 class)
//! - No heap allocation: every buffer is fixed-size
//! - Single-threaded and cooperative: nothing blocks a scheduler tick
//! - Any fatal condition ends the run; recovery is a full restart
//!
//! ```no_run
//! use barotrend_core::trend::{Trend, TrendDetector};
//! use barotrend_core::physics::sea_level_pressure;
//!
//! let mut detector = TrendDetector::new();
//! let sea_level = sea_level_pressure(975.3, 18.0, 338.0);
//!
//! match detector.classify(f64::from(sea_level)) {
//!     Trend::Training => {}, // fewer than six readings so far
//!     trend => println!("pressure is {}", trend),
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod machines;
pub mod physics;
pub mod queue;
pub mod scheduler;
pub mod supervisor;
pub mod telemetry;
pub mod time;
pub mod traits;
pub mod trend;

// Public API
pub use config::DeviceConfig;
pub use context::AppContext;
pub use errors::{Component, FatalCondition, FatalError, FatalResult};
pub use queue::TelemetryQueue;
pub use scheduler::{Hardware, Scheduler, Snapshot};
pub use supervisor::{RecordingSupervisor, Supervisor};
pub use telemetry::TelemetryMessage;
pub use trend::{Trend, TrendDetector};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
