//! Cooperative State Machines
//!
//! ## Overview
//!
//! Each machine owns one state enum and at most one armed deadline timer, and
//! exposes a single non-blocking `step`. Waiting is never done in place: a
//! machine that has nothing to do yet returns and checks again on the next
//! tick.
//!
//! ```text
//!                          ┌──────────────────┐
//!                          │ NetworkLink      │  gate: is_ready()
//!                          └────────┬─────────┘
//!             ┌─────────────────────┼──────────────────────┐
//!             ↓                     ↓                      ↓
//!   ┌───────────────────┐  ┌─────────────────┐   ┌────────────────────┐
//!   │ RemoteUpdate      │  │ StatusReporter  │   │ TelemetryTransport │
//!   └───────────────────┘  └────────┬────────┘   └─────────▲──────────┘
//!                                   │ enqueue              │ dequeue
//!   ┌───────────────────┐           ↓                      │
//!   │ SensorSampler     │──────→ TelemetryQueue ───────────┘
//!   └───────────────────┘ enqueue
//! ```
//!
//! Every `step` returns `FatalResult`; an `Err` ends the run and is handed to
//! the supervisor by the [`Scheduler`](crate::scheduler::Scheduler).

pub mod link;
pub mod sampler;
pub mod status;
pub mod transport;
pub mod update;

pub use link::{LinkState, NetworkLinkMachine};
pub use sampler::{Reading, SamplerState, SensorSampler};
pub use status::StatusReporter;
pub use transport::{TelemetryTransport, TransportState, TransportStats};
pub use update::{RemoteUpdateService, UpdateState};
