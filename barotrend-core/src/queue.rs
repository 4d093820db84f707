//! Bounded Telemetry Queue
//!
//! ## Overview
//!
//! A strictly FIFO, fixed-capacity queue that decouples the producers (sensor
//! sampler, status reporter) from the transport that publishes to the broker.
//! Producers push whenever they have something to report; the transport drains
//! one message per session.
//!
//! ```text
//!  SensorSampler ──┐
//!                  ├──→ [ m0 | m1 | m2 | .. | m9 ] ──→ TelemetryTransport
//!  StatusReporter ─┘      ↑ front             back
//! ```
//!
//! ## Overflow Policy
//!
//! Nothing is ever dropped silently. A push onto a full queue fails with
//! [`QueueError::Full`] and leaves the queue untouched; the caller escalates
//! it as a fatal condition. A pop from an empty queue fails the same way.
//!
//! Storage is a `heapless::Deque`, so the whole queue lives inline in the
//! application context with no allocation:
//! ```text
//! TelemetryQueue<10> size ≈ 10 * size_of::<TelemetryMessage>() + 24 bytes
//! ```
//!
//! The queue is single-threaded: the scheduler owns it and lends it to one
//! machine at a time. No atomics are needed.

use heapless::Deque;

use crate::constants::buffers::TELEMETRY_QUEUE_CAPACITY;
use crate::errors::QueueError;
use crate::telemetry::TelemetryMessage;

/// Queue sized for the device build
pub type DefaultTelemetryQueue = TelemetryQueue<TELEMETRY_QUEUE_CAPACITY>;

/// Fixed-capacity FIFO of pending telemetry
#[derive(Debug)]
pub struct TelemetryQueue<const N: usize> {
    messages: Deque<TelemetryMessage, N>,
    stats: QueueStats,
}

/// Queue health counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Messages accepted
    pub pushed: u32,
    /// Messages handed to the transport
    pub popped: u32,
    /// Pushes refused because the queue was full
    pub rejected: u32,
    /// Deepest the queue has been
    pub max_depth: u32,
}

impl<const N: usize> TelemetryQueue<N> {
    /// Empty queue
    pub const fn new() -> Self {
        Self {
            messages: Deque::new(),
            stats: QueueStats {
                pushed: 0,
                popped: 0,
                rejected: 0,
                max_depth: 0,
            },
        }
    }

    /// Append a message at the back
    ///
    /// A full queue rejects the message and is not modified.
    pub fn enqueue(&mut self, message: TelemetryMessage) -> Result<(), QueueError> {
        if self.messages.push_back(message).is_err() {
            self.stats.rejected = self.stats.rejected.saturating_add(1);
            return Err(QueueError::Full { capacity: N });
        }

        self.stats.pushed = self.stats.pushed.saturating_add(1);
        let depth = self.messages.len() as u32;
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }
        Ok(())
    }

    /// Remove and return the oldest message
    pub fn dequeue(&mut self) -> Result<TelemetryMessage, QueueError> {
        let message = self.messages.pop_front().ok_or(QueueError::Empty)?;
        self.stats.popped = self.stats.popped.saturating_add(1);
        Ok(message)
    }

    /// Oldest message without removing it
    pub fn peek(&self) -> Option<&TelemetryMessage> {
        self.messages.front()
    }

    /// Whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether the next enqueue fails
    pub fn is_full(&self) -> bool {
        self.messages.is_full()
    }

    /// Messages waiting
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Maximum messages held
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Traffic counters since boot
    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}

impl<const N: usize> Default for TelemetryQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(n: usize) -> TelemetryMessage {
        TelemetryMessage::new(&format!("home/sketch/test/{}", n), "{}", false).unwrap()
    }

    #[test]
    fn fifo_order() {
        let mut queue = TelemetryQueue::<4>::new();
        queue.enqueue(message(1)).unwrap();
        queue.enqueue(message(2)).unwrap();

        assert_eq!(queue.dequeue().unwrap().topic(), "home/sketch/test/1");
        assert_eq!(queue.dequeue().unwrap().topic(), "home/sketch/test/2");
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_rejects_without_mutation() {
        let mut queue = TelemetryQueue::<2>::new();
        queue.enqueue(message(1)).unwrap();
        queue.enqueue(message(2)).unwrap();
        assert!(queue.is_full());

        assert_eq!(
            queue.enqueue(message(3)),
            Err(QueueError::Full { capacity: 2 })
        );
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().unwrap().topic(), "home/sketch/test/1");
        assert_eq!(queue.stats().rejected, 1);
    }

    #[test]
    fn empty_dequeue_fails() {
        let mut queue = TelemetryQueue::<2>::new();
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
    }

    #[test]
    fn stats_track_depth() {
        let mut queue = DefaultTelemetryQueue::new();
        for n in 0..3 {
            queue.enqueue(message(n)).unwrap();
        }
        queue.dequeue().unwrap();

        let stats = queue.stats();
        assert_eq!(stats.pushed, 3);
        assert_eq!(stats.popped, 1);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(queue.capacity(), 10);
    }
}
