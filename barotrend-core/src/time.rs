//! Time management for the device core
//!
//! All waiting in the core is expressed as deadline polling: a machine arms a
//! one-shot [`DeadlineTimer`], returns, and checks `is_expired` on later ticks.
//! Time comes from a [`TimeSource`] supplied by the host:
//! - [`SystemClock`] - monotonic clock backed by `std::time::Instant`
//! - [`ManualClock`] - explicitly advanced clock for tests and simulation
//! - anything else implementing the trait (hardware timer, RTOS tick)
//!
//! Instants and durations are `fugit` millisecond types, so intervals read as
//! units at the call site (`Duration::from_ticks(30_000)` is 30 s).

/// Monotonic instant with millisecond resolution (epoch = device boot)
pub type Instant = fugit::TimerInstantU64<1_000>;

/// Millisecond duration
pub type Duration = fugit::MillisDurationU64;

/// Source of monotonic time for the scheduler
pub trait TimeSource {
    /// Milliseconds since boot
    fn now(&self) -> Instant;
}

/// One-shot deadline timer
///
/// Mirrors the behaviour the state machines rely on:
/// - `start` (re)arms the timer relative to `now`
/// - once expired, it stays expired until re-armed
/// - a timer that was never armed (or was stopped) reads as expired, which
///   lets a periodic producer fire on its very first poll
///
/// At most one deadline is held at a time; re-arming replaces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeadlineTimer {
    deadline: Option<Instant>,
}

impl DeadlineTimer {
    /// Create an unarmed timer
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to expire `timeout` after `now`
    pub fn start(&mut self, now: Instant, timeout: Duration) {
        let ticks = now.ticks().saturating_add(timeout.ticks());
        self.deadline = Some(Instant::from_ticks(ticks));
    }

    /// Disarm the timer
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is currently held
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the deadline has passed (unarmed timers are expired)
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now.ticks() >= deadline.ticks(),
            None => true,
        }
    }

    /// Time left before expiry, `None` when unarmed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| Duration::from_ticks(deadline.ticks().saturating_sub(now.ticks())))
    }
}

/// Whole seconds elapsed since boot
pub fn uptime_secs(now: Instant) -> u64 {
    now.ticks() / 1_000
}

/// Explicitly advanced clock for tests and simulation
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    /// Clock reading `now_ms`
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    /// Jump to `now_ms`
    pub fn set(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.now_ms)
    }
}

/// Monotonic clock starting at zero when created (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    boot: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Clock counting from construction
    pub fn new() -> Self {
        Self {
            boot: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Instant {
        let elapsed = self.boot.elapsed().as_millis();
        Instant::from_ticks(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}
