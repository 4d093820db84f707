//! Fatal Conditions and Local Error Types
//!
//! ## Design Philosophy
//!
//! Errors in the device core are binary. Either a failure is impossible by
//! construction, or it is **fatal**: the component that detects it reports a
//! [`FatalError`] straight away, the scheduler hands it to the
//! [`Supervisor`](crate::supervisor::Supervisor), and the host restarts the
//! device from scratch. There is no local retry beyond the deadline-bounded
//! waits already built into the state machines.
//!
//! On an unattended, memory-constrained device a clean restart is a more
//! dependable recovery than accumulated fallback logic, so nothing here tries
//! to degrade gracefully.
//!
//! ## Memory Layout
//!
//! Fatal errors are `Copy` and travel through the scheduler by value:
//! ```text
//! FatalError size = 2 bytes
//! ├── condition: 1 byte (repr(u8) ordinal)
//! └── component: 1 byte
//! ```
//!
//! ## Condition Codes
//!
//! The ordinals are stable and shared with the diagnostics tooling, so a code
//! read off a serial console maps to the same condition across firmware
//! revisions. Codes 0, 1 and 63 are reserved (no error, external reboot and
//! normal reboot respectively).
//!
//! ```rust
//! use barotrend_core::errors::{Component, FatalCondition};
//!
//! let fatal = FatalCondition::BrokerConnectFailure.raised_by(Component::TelemetryTransport);
//! assert_eq!(fatal.condition.code(), 9);
//! assert_eq!(fatal.condition.description(), "connect MQTT");
//! ```

use core::fmt;
use thiserror_no_std::Error;

/// Result type for state machine steps
pub type FatalResult<T = ()> = Result<T, FatalError>;

/// Every unrecoverable condition the core can raise
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FatalCondition {
    /// Network link did not come up before its deadline
    #[error("link start")]
    LinkStartFailure = 2,

    /// Remote update rejected the client's credentials
    #[error("update auth")]
    UpdateAuthFailure = 3,

    /// Remote update could not begin writing the image
    #[error("update begin")]
    UpdateBeginFailure = 4,

    /// Remote update could not reach the uploading host
    #[error("update connect")]
    UpdateConnectFailure = 5,

    /// Remote update transfer broke off mid-image
    #[error("update receive")]
    UpdateReceiveFailure = 6,

    /// Remote update could not finalise the image
    #[error("update end")]
    UpdateEndFailure = 7,

    /// Remote update failed for a reason the provider did not classify
    #[error("update other")]
    UpdateOtherFailure = 8,

    /// Broker session was not established before its deadline
    #[error("connect MQTT")]
    BrokerConnectFailure = 9,

    /// Broker refused or dropped a publish
    #[error("publish MQTT")]
    BrokerPublishFailure = 10,

    /// Broker session did not close before its deadline
    #[error("disconnect MQTT")]
    BrokerDisconnectFailure = 11,

    /// Telemetry queue was full when a producer pushed
    #[error("queue push")]
    QueuePushFailure = 12,

    /// Telemetry queue was empty when the transport popped
    #[error("queue pop")]
    QueuePopFailure = 13,

    /// Sensor did not answer its start sequence
    #[error("sensor did not start")]
    SensorStartFailure = 14,

    /// Sensor returned an invalid or sentinel reading
    #[error("sensor malfunction")]
    SensorMalfunction = 15,

    /// A producer could not fit its topic or payload into a bounded buffer
    #[error("message overflow")]
    MessageOverflow = 16,
}

impl FatalCondition {
    /// Stable numeric code for this condition
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Short human-readable description, as written to diagnostics
    pub const fn description(&self) -> &'static str {
        match self {
            Self::LinkStartFailure => "link start",
            Self::UpdateAuthFailure => "update auth",
            Self::UpdateBeginFailure => "update begin",
            Self::UpdateConnectFailure => "update connect",
            Self::UpdateReceiveFailure => "update receive",
            Self::UpdateEndFailure => "update end",
            Self::UpdateOtherFailure => "update other",
            Self::BrokerConnectFailure => "connect MQTT",
            Self::BrokerPublishFailure => "publish MQTT",
            Self::BrokerDisconnectFailure => "disconnect MQTT",
            Self::QueuePushFailure => "queue push",
            Self::QueuePopFailure => "queue pop",
            Self::SensorStartFailure => "sensor did not start",
            Self::SensorMalfunction => "sensor malfunction",
            Self::MessageOverflow => "message overflow",
        }
    }

    /// Whether the condition came from the remote update channel
    ///
    /// Lets operators tell update-channel failures apart from telemetry ones.
    pub const fn is_update_failure(&self) -> bool {
        matches!(
            self,
            Self::UpdateAuthFailure
                | Self::UpdateBeginFailure
                | Self::UpdateConnectFailure
                | Self::UpdateReceiveFailure
                | Self::UpdateEndFailure
                | Self::UpdateOtherFailure
        )
    }

    /// Attach the identity of the reporting component
    pub const fn raised_by(self, component: Component) -> FatalError {
        FatalError {
            condition: self,
            component,
        }
    }
}

/// Identity of the component that raised a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Component {
    /// Network link machine
    NetworkLink = 0,
    /// Remote update service
    RemoteUpdate = 1,
    /// Sensor sampler
    SensorSampler = 2,
    /// Status reporter
    StatusReporter = 3,
    /// Telemetry transport
    TelemetryTransport = 4,
}

impl Component {
    /// Name used in diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NetworkLink => "network-link",
            Self::RemoteUpdate => "remote-update",
            Self::SensorSampler => "sensor-sampler",
            Self::StatusReporter => "status-reporter",
            Self::TelemetryTransport => "telemetry-transport",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fatal condition plus the component that reported it
///
/// Terminal: consumed exactly once by the supervisor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("fatal error(\"{condition}\", {component})")]
pub struct FatalError {
    /// What went wrong
    pub condition: FatalCondition,
    /// Who noticed
    pub component: Component,
}

/// Bounded queue failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Push attempted with every slot occupied
    #[error("queue full ({capacity} messages)")]
    Full {
        /// Fixed capacity of the queue
        capacity: usize,
    },

    /// Pop attempted on an empty queue
    #[error("queue empty")]
    Empty,
}

/// Telemetry message construction failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// Topic does not fit the bounded topic buffer
    #[error("topic exceeds {max} bytes")]
    TopicTooLong {
        /// Topic capacity in bytes
        max: usize,
    },

    /// Payload does not fit the bounded payload buffer
    #[error("payload exceeds {max} bytes")]
    PayloadTooLong {
        /// Payload capacity in bytes
        max: usize,
    },
}

/// Configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A string setting does not fit its fixed-capacity field
    #[error("{field} exceeds {max} bytes")]
    FieldTooLong {
        /// Setting name
        field: &'static str,
        /// Field capacity in bytes
        max: usize,
    },

    /// A mandatory string setting is empty
    #[error("{field} must not be empty")]
    MissingField {
        /// Setting name
        field: &'static str,
    },

    /// A numeric setting is outside its accepted range
    #[error("{field} is invalid: {reason}")]
    InvalidValue {
        /// Setting name
        field: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// The configuration document could not be parsed
    #[error("parse error at line {line}, column {column}")]
    Parse {
        /// 1-based line of the offending token
        line: usize,
        /// 1-based column of the offending token
        column: usize,
    },

    /// The configuration file could not be read
    #[error("configuration file unreadable")]
    Unreadable,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FatalCondition {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} ({})", self.description(), self.code())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Component {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FatalError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "fatal error(\"{}\", {})",
            self.condition.description(),
            self.component.name()
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for QueueError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Full { capacity } => defmt::write!(fmt, "queue full ({} messages)", capacity),
            Self::Empty => defmt::write!(fmt, "queue empty"),
        }
    }
}
