//! Collaborator Capabilities
//!
//! The core never touches hardware or network stacks itself. Everything it
//! needs from the outside world is a small trait, implemented by the host
//! firmware (or by mocks in tests):
//!
//! - [`link`] - network link bring-up and identity
//! - [`update`] - remote firmware-update channel
//! - [`broker`] - message broker session and publish
//! - [`sensor`] - barometric sensor with non-blocking reads
//! - [`platform`] - system info and the [`Platform`] bundle tying them together
//!
//! ## Design Philosophy
//!
//! Every call is non-blocking. Long operations are split into a request
//! (`connect`, `disconnect`) and a status query (`status`, `connected`) that
//! the state machines poll against a deadline. Sensor reads use `nb::Result`:
//! `WouldBlock` means "ask again next tick".
//!
//! Static dispatch throughout: the scheduler is generic over a [`Platform`],
//! so a device build monomorphizes to direct calls.

pub mod broker;
pub mod link;
pub mod platform;
pub mod sensor;
pub mod update;

pub use broker::BrokerClient;
pub use link::{Credentials, LinkStatus, NetworkLink};
pub use platform::{Platform, SystemInfo};
pub use sensor::{BarometricSensor, SensorFault};
pub use update::{UpdateError, UpdateProvider};

pub use crate::time::TimeSource;
