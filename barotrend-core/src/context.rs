//! Application context
//!
//! The shared data every machine may touch, gathered in one owned value and
//! lent to each step function in turn. Machine state does not live here; each
//! machine owns its own.

use crate::config::DeviceConfig;
use crate::errors::{Component, FatalCondition, FatalResult};
use crate::queue::DefaultTelemetryQueue;
use crate::telemetry::TelemetryMessage;
use crate::trend::TrendDetector;

/// Process-wide state shared between machines
#[derive(Debug)]
pub struct AppContext {
    /// Deployment settings, fixed after start
    pub config: DeviceConfig,
    /// Pending telemetry, drained only by the transport
    pub queue: DefaultTelemetryQueue,
    /// Sea-level pressure trend window
    pub trend: TrendDetector,
}

impl AppContext {
    /// Empty queue and untrained detector for `config`
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            queue: DefaultTelemetryQueue::new(),
            trend: TrendDetector::new(),
        }
    }

    /// Push a message, escalating a full queue as `QueuePushFailure`
    pub fn enqueue(&mut self, producer: Component, message: TelemetryMessage) -> FatalResult {
        match self.queue.enqueue(message) {
            Ok(()) => {
                log_debug!(
                    "{} queued telemetry ({} pending)",
                    producer.name(),
                    self.queue.len()
                );
                Ok(())
            }
            Err(_) => {
                log_warn!(
                    "{} could not queue telemetry: queue full",
                    producer.name()
                );
                Err(FatalCondition::QueuePushFailure.raised_by(producer))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_queue_is_fatal_for_the_producer() {
        let mut context = AppContext::new(DeviceConfig::default());
        let message = TelemetryMessage::new("home/sketch/status", "{}", false).unwrap();

        for _ in 0..context.queue.capacity() {
            context.enqueue(Component::StatusReporter, message.clone()).unwrap();
        }

        let error = context
            .enqueue(Component::StatusReporter, message)
            .unwrap_err();
        assert_eq!(error.condition, FatalCondition::QueuePushFailure);
        assert_eq!(error.component, Component::StatusReporter);
        assert_eq!(context.queue.len(), context.queue.capacity());
    }
}
