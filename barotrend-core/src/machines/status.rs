//! Periodic device status report
//!
//! While the link is `Ready`, queue one status message immediately and then
//! once per status interval. The timer starts unarmed, and an unarmed timer
//! reads as expired, so the first report goes out on the first ready tick.

use crate::context::AppContext;
use crate::errors::{Component, FatalCondition, FatalResult, MessageError};
use crate::telemetry::{status_payload, StatusReport, TelemetryMessage, TopicScheme};
use crate::time::{uptime_secs, DeadlineTimer, Instant};
use crate::traits::{NetworkLink, SystemInfo};

/// Queues the periodic status message
#[derive(Debug, Clone, Default)]
pub struct StatusReporter {
    timer: DeadlineTimer,
    reports: u32,
}

impl StatusReporter {
    /// Reporter whose first report is due immediately
    pub const fn new() -> Self {
        Self {
            timer: DeadlineTimer::new(),
            reports: 0,
        }
    }

    /// Reports queued since boot
    pub fn reports(&self) -> u32 {
        self.reports
    }

    /// Advance one step
    pub fn step<L: NetworkLink, Y: SystemInfo>(
        &mut self,
        link: &L,
        system: &Y,
        context: &mut AppContext,
        link_ready: bool,
        now: Instant,
    ) -> FatalResult {
        if !link_ready || !self.timer.is_expired(now) {
            return Ok(());
        }

        self.timer.start(now, context.config.timing.status_interval());

        let report = StatusReport {
            ssid: link.ssid(),
            mac: link.mac_address(),
            ip: link.current_address(),
            free_heap: system.free_memory(),
            uptime_secs: uptime_secs(now),
        };

        let message = build_message(context, &report)
            .map_err(|_| FatalCondition::MessageOverflow.raised_by(Component::StatusReporter))?;

        context.enqueue(Component::StatusReporter, message)?;
        self.reports = self.reports.saturating_add(1);
        Ok(())
    }
}

fn build_message(context: &AppContext, report: &StatusReport<'_>) -> Result<TelemetryMessage, MessageError> {
    let config = &context.config;
    let topic = TopicScheme::new(&config.broker.topic_prefix, &config.client_id).status()?;
    Ok(TelemetryMessage::from_parts(topic, status_payload(report)?, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::traits::{Credentials, LinkStatus};

    struct StaticLink;

    impl NetworkLink for StaticLink {
        fn connect(&mut self, _credentials: &Credentials<'_>) {}
        fn status(&self) -> LinkStatus {
            LinkStatus::Connected
        }
        fn disconnect(&mut self) {}
        fn set_persistence(&mut self, _persistent: bool) {}
        fn set_client_identifier(&mut self, _name: &str) -> bool {
            true
        }
        fn current_address(&self) -> &str {
            "192.168.1.20"
        }
        fn ssid(&self) -> &str {
            "HomeNet"
        }
        fn mac_address(&self) -> &str {
            "AA:BB:CC:DD:EE:FF"
        }
    }

    struct FixedHeap(u32);

    impl SystemInfo for FixedHeap {
        fn free_memory(&self) -> u32 {
            self.0
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_ticks(ms)
    }

    #[test]
    fn first_ready_tick_reports_immediately() {
        let mut reporter = StatusReporter::new();
        let mut context = AppContext::new(DeviceConfig::default());

        reporter
            .step(&StaticLink, &FixedHeap(23456), &mut context, false, at(1_000))
            .unwrap();
        assert!(context.queue.is_empty());

        reporter
            .step(&StaticLink, &FixedHeap(23456), &mut context, true, at(300_000))
            .unwrap();
        let message = context.queue.dequeue().unwrap();
        assert_eq!(message.topic(), "home/sketch/status");
        assert_eq!(
            message.payload(),
            "{\"ssid\":\"HomeNet\",\"mac\":\"AA:BB:CC:DD:EE:FF\",\"ip\":\"192.168.1.20\",\"heap\":23456,\"upTime\":300}"
        );
    }

    #[test]
    fn reports_once_per_interval() {
        let mut reporter = StatusReporter::new();
        let mut context = AppContext::new(DeviceConfig::default());
        let heap = FixedHeap(1);

        reporter.step(&StaticLink, &heap, &mut context, true, at(0)).unwrap();
        reporter.step(&StaticLink, &heap, &mut context, true, at(299_999)).unwrap();
        assert_eq!(reporter.reports(), 1);

        reporter.step(&StaticLink, &heap, &mut context, true, at(300_000)).unwrap();
        assert_eq!(reporter.reports(), 2);
        assert_eq!(context.queue.len(), 2);
    }
}
