//! Telemetry Transport
//!
//! ## Overview
//!
//! Drains the telemetry queue to the message broker in sessions. A session is
//! opened only when there is something to send, carries one message per tick
//! until the queue is empty, and is then closed again:
//!
//! ```text
//!                queue non-empty                   not connected
//!   ┌──────┐    and link ready    ┌──────────────┐  (connect, 30 s) ┌─────────────┐
//!   │ Idle │─────────────────────→│ CheckSession │─────────────────→│ WaitSession │──30 s──→ BrokerConnectFailure
//!   └──────┘                      └──────────────┘                  └─────────────┘
//!      ↑                                 │ connected                       │ connected
//!      │                                 ↓                                 │
//!      │                          ┌──────────────┐←────────────────────────┘
//!      │                          │   Transmit   │──┐ pop + publish, one per tick
//!      │                          └──────────────┘←─┘
//!      │                                 │ queue empty
//!      │                                 ↓
//!      │   already closed        ┌───────────────┐   (disconnect, 30 s)  ┌──────────────┐
//!      ├─────────────────────────│ StartTeardown │──────────────────────→│ WaitTeardown │──30 s──→ BrokerDisconnectFailure
//!      │                         └───────────────┘                       └──────────────┘
//!      └─────────────────────────────────────────────────────────────────────────┘ closed
//! ```
//!
//! ## Delivery
//!
//! Messages are published at-most-once. A refused publish is fatal; nothing
//! is re-queued.
//!
//! ## Session Keep-alive
//!
//! Before every step, an established session is serviced with
//! [`BrokerClient::poll`], whatever state the machine is in.

use crate::context::AppContext;
use crate::errors::{Component, FatalCondition, FatalError, FatalResult};
use crate::telemetry::QoS;
use crate::time::{DeadlineTimer, Instant};
use crate::traits::BrokerClient;

/// Transport machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing to send
    Idle,
    /// Decide whether a session must be opened
    CheckSession,
    /// Session requested, deadline armed
    WaitSession,
    /// Publishing queued messages
    Transmit,
    /// Queue drained, close the session
    StartTeardown,
    /// Close requested, deadline armed
    WaitTeardown,
}

impl TransportState {
    /// Name used in transition logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckSession => "check-session",
            Self::WaitSession => "wait-session",
            Self::Transmit => "transmit",
            Self::StartTeardown => "start-teardown",
            Self::WaitTeardown => "wait-teardown",
        }
    }
}

/// Publication counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Messages accepted by the broker
    pub published: u32,
    /// Sessions that ended back in `Idle`
    pub sessions: u32,
}

/// Moves queued telemetry to the broker
#[derive(Debug, Clone)]
pub struct TelemetryTransport {
    state: TransportState,
    timer: DeadlineTimer,
    stats: TransportStats,
}

impl TelemetryTransport {
    /// Transport with no broker session
    pub const fn new() -> Self {
        Self {
            state: TransportState::Idle,
            timer: DeadlineTimer::new(),
            stats: TransportStats {
                published: 0,
                sessions: 0,
            },
        }
    }

    /// Current state
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Delivery counters since boot
    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    /// Advance one step
    pub fn step<B: BrokerClient>(
        &mut self,
        broker: &mut B,
        context: &mut AppContext,
        link_ready: bool,
        now: Instant,
    ) -> FatalResult {
        if broker.connected() {
            broker.poll();
        }

        match self.state {
            TransportState::Idle => {
                if link_ready && !context.queue.is_empty() {
                    self.transition(TransportState::CheckSession);
                }
            }

            TransportState::CheckSession => {
                if broker.connected() {
                    self.transition(TransportState::Transmit);
                    return Ok(());
                }

                let config = &context.config;
                log_info!(
                    "opening broker session with {}:{} as {}",
                    config.broker.host.as_str(),
                    config.broker.port,
                    config.client_id.as_str()
                );
                broker.connect(&config.broker.host, config.broker.port, &config.client_id);
                self.timer
                    .start(now, context.config.timing.broker_session_timeout());
                self.transition(TransportState::WaitSession);
            }

            TransportState::WaitSession => {
                if broker.connected() {
                    self.timer.stop();
                    self.transition(TransportState::Transmit);
                } else if self.timer.is_expired(now) {
                    log_warn!("broker session not established before its deadline");
                    return Err(self.fatal(FatalCondition::BrokerConnectFailure));
                }
            }

            TransportState::Transmit => {
                if context.queue.is_empty() {
                    self.transition(TransportState::StartTeardown);
                    return Ok(());
                }

                let message = context
                    .queue
                    .dequeue()
                    .map_err(|_| self.fatal(FatalCondition::QueuePopFailure))?;

                if !broker.publish(
                    message.topic(),
                    message.payload(),
                    message.retain(),
                    QoS::AtMostOnce,
                ) {
                    log_warn!("broker refused {}", message.topic());
                    return Err(self.fatal(FatalCondition::BrokerPublishFailure));
                }

                self.stats.published = self.stats.published.saturating_add(1);
                log_debug!("published {}", message.topic());
            }

            TransportState::StartTeardown => {
                if !broker.connected() {
                    self.finish_session();
                    return Ok(());
                }

                broker.disconnect();
                self.timer
                    .start(now, context.config.timing.broker_session_timeout());
                self.transition(TransportState::WaitTeardown);
            }

            TransportState::WaitTeardown => {
                if !broker.connected() {
                    self.timer.stop();
                    self.finish_session();
                } else if self.timer.is_expired(now) {
                    log_warn!("broker session did not close before its deadline");
                    return Err(self.fatal(FatalCondition::BrokerDisconnectFailure));
                }
            }
        }

        Ok(())
    }

    fn finish_session(&mut self) {
        self.stats.sessions = self.stats.sessions.saturating_add(1);
        log_info!(
            "broker session closed ({} messages published so far)",
            self.stats.published
        );
        self.transition(TransportState::Idle);
    }

    fn fatal(&self, condition: FatalCondition) -> FatalError {
        condition.raised_by(Component::TelemetryTransport)
    }

    fn transition(&mut self, next: TransportState) {
        log_debug!(
            "telemetry-transport: {} -> {}",
            self.state.as_str(),
            next.as_str()
        );
        self.state = next;
    }
}

impl Default for TelemetryTransport {
    fn default() -> Self {
        Self::new()
    }
}
