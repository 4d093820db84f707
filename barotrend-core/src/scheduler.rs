//! Cooperative Scheduler
//!
//! ## Overview
//!
//! The scheduler owns the hardware collaborators, the application context and
//! the machines, and steps every machine once per [`tick`](Scheduler::tick)
//! in dependency order:
//!
//! ```text
//! tick ──→ link ──→ update ──→ sampler ──→ status ──→ transport
//!            │         │          │           │            │
//!            └─────────┴──────────┴─────┬─────┴────────────┘
//!                                       │ Err(FatalError)
//!                                       ↓
//!                        log, Supervisor::escalate, halt
//! ```
//!
//! The first fatal error stops the run. It is escalated exactly once, and every
//! later tick returns the same error without touching any machine, so nothing
//! is drained or published after escalation. The host is expected to restart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut scheduler = Scheduler::<Esp8266>::new(hardware, config)?;
//! loop {
//!     if scheduler.tick().is_err() {
//!         break;
//!     }
//! }
//! ```

use crate::config::DeviceConfig;
use crate::context::AppContext;
use crate::errors::{ConfigError, FatalError, FatalResult};
use crate::machines::{
    LinkState, NetworkLinkMachine, RemoteUpdateService, SamplerState, SensorSampler,
    StatusReporter, TelemetryTransport, TransportState, TransportStats, UpdateState,
};
use crate::queue::QueueStats;
use crate::supervisor::Supervisor;
use crate::time::{Instant, TimeSource};
use crate::traits::Platform;

/// Collaborator instances for one device
pub struct Hardware<P: Platform> {
    /// Network station interface
    pub link: P::Link,
    /// Remote update listener
    pub updater: P::Updater,
    /// Message broker client
    pub broker: P::Broker,
    /// Barometric sensor
    pub sensor: P::Sensor,
    /// Free-memory source for status reports
    pub system: P::System,
    /// Monotonic millisecond clock
    pub clock: P::Clock,
    /// Receives the halting condition
    pub supervisor: P::Supervisor,
}

/// Point-in-time view of the scheduler for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Link machine state
    pub link: LinkState,
    /// Update service state
    pub update: UpdateState,
    /// Sampler machine state
    pub sampler: SamplerState,
    /// Transport machine state
    pub transport: TransportState,
    /// Messages waiting for the transport
    pub queue_depth: usize,
    /// Queue counters
    pub queue_stats: QueueStats,
    /// Publication counters
    pub transport_stats: TransportStats,
    /// Status reports queued since boot
    pub status_reports: u32,
    /// Completed sensor reads since boot
    pub sensor_readings: u32,
    /// Condition that halted the scheduler, if any
    pub halted: Option<FatalError>,
}

/// Steps every machine once per tick
pub struct Scheduler<P: Platform> {
    hardware: Hardware<P>,
    context: AppContext,
    link: NetworkLinkMachine,
    update: RemoteUpdateService,
    sampler: SensorSampler,
    status: StatusReporter,
    transport: TelemetryTransport,
    halted: Option<FatalError>,
}

impl<P: Platform> Scheduler<P> {
    /// Build a scheduler for a validated configuration
    pub fn new(hardware: Hardware<P>, config: DeviceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log_info!(
            "barotrend core {} starting as {}",
            crate::VERSION,
            config.client_id.as_str()
        );

        Ok(Self {
            hardware,
            context: AppContext::new(config),
            link: NetworkLinkMachine::new(),
            update: RemoteUpdateService::new(),
            sampler: SensorSampler::new(),
            status: StatusReporter::new(),
            transport: TelemetryTransport::new(),
            halted: None,
        })
    }

    /// Step every machine once
    ///
    /// Returns the halting error on the tick that fails and on every tick
    /// after it.
    pub fn tick(&mut self) -> FatalResult {
        if let Some(error) = self.halted {
            return Err(error);
        }

        let now = self.hardware.clock.now();
        if let Err(error) = self.step_machines(now) {
            log_error!("{} - requesting restart", error);
            self.hardware.supervisor.escalate(error);
            self.halted = Some(error);
            return Err(error);
        }

        Ok(())
    }

    fn step_machines(&mut self, now: Instant) -> FatalResult {
        let hardware = &mut self.hardware;
        let context = &mut self.context;

        self.link.step(&mut hardware.link, &context.config, now)?;
        let link_ready = self.link.is_ready();

        self.update
            .step(&mut hardware.updater, &context.config, link_ready)?;
        self.sampler.step(&mut hardware.sensor, context, now)?;
        self.status.step(
            &hardware.link,
            &hardware.system,
            context,
            link_ready,
            now,
        )?;
        self.transport
            .step(&mut hardware.broker, context, link_ready, now)?;

        Ok(())
    }

    /// Whether a fatal condition has stopped the run
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Condition that halted the run, if any
    pub fn halted(&self) -> Option<FatalError> {
        self.halted
    }

    /// Platform collaborators
    pub fn hardware(&self) -> &Hardware<P> {
        &self.hardware
    }

    /// Mutable access for hosts that drive the collaborators directly
    pub fn hardware_mut(&mut self) -> &mut Hardware<P> {
        &mut self.hardware
    }

    /// Shared configuration, queue and trend state
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Point-in-time view of every machine
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            link: self.link.state(),
            update: self.update.state(),
            sampler: self.sampler.state(),
            transport: self.transport.state(),
            queue_depth: self.context.queue.len(),
            queue_stats: self.context.queue.stats(),
            transport_stats: self.transport.stats(),
            status_reports: self.status.reports(),
            sensor_readings: self.sampler.readings(),
            halted: self.halted,
        }
    }
}
