//! Fatal condition escalation
//!
//! The core never restarts itself. When a machine reports a [`FatalError`] the
//! scheduler hands it to the host's [`Supervisor`] exactly once and stops
//! running machines. A device supervisor typically records the condition for
//! the next boot (RTC memory, flash) and resets the chip.

use crate::errors::FatalError;

/// Receives the fatal condition that halted the scheduler
pub trait Supervisor {
    /// Record the condition and arrange a restart
    fn escalate(&mut self, error: FatalError);
}

/// Supervisor that only remembers what it was told
///
/// Useful on hosts where the process exit is handled elsewhere, and in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingSupervisor {
    last: Option<FatalError>,
    escalations: u32,
}

impl RecordingSupervisor {
    /// Supervisor with nothing recorded
    pub const fn new() -> Self {
        Self {
            last: None,
            escalations: 0,
        }
    }

    /// Most recent escalated condition
    pub fn last(&self) -> Option<FatalError> {
        self.last
    }

    /// Number of escalations received
    pub fn escalations(&self) -> u32 {
        self.escalations
    }
}

impl Supervisor for RecordingSupervisor {
    fn escalate(&mut self, error: FatalError) {
        self.last = Some(error);
        self.escalations = self.escalations.saturating_add(1);
    }
}
