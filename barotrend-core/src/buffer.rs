//! Sliding observation window
//!
//! Keeps the most recent `N` values in a fixed array. The number of valid
//! values grows until it reaches `N`; after that each push overwrites the
//! oldest. Iteration runs oldest to newest, so a value's iteration index is its
//! position in the window (the regression abscissa for the trend detector).
//!
//! Unlike the telemetry queue, a full window is not an error.
//!
//! ```text
//! after pushes a..h into SlidingWindow<6>:
//!
//!   slots  [ g  h  c  d  e  f ]
//!                  ↑ oldest
//!   iter   c d e f g h
//! ```
//!
//! ```rust
//! use barotrend_core::buffer::SlidingWindow;
//!
//! let mut window: SlidingWindow<3> = SlidingWindow::new();
//! for reading in [1.0, 2.0, 3.0, 4.0] {
//!     window.push(reading);
//! }
//!
//! let values: Vec<f64> = window.iter().copied().collect();
//! assert_eq!(values, vec![2.0, 3.0, 4.0]);
//! ```

use core::iter::Chain;
use core::slice::Iter;

/// Fixed-capacity window of readings that evicts its oldest value when full
#[derive(Debug, Clone)]
pub struct SlidingWindow<const N: usize> {
    slots: [f64; N],
    /// Slot holding the oldest value once full; next write otherwise
    head: usize,
    filled: usize,
}

impl<const N: usize> SlidingWindow<N> {
    /// Empty window
    pub const fn new() -> Self {
        Self {
            slots: [0.0; N],
            head: 0,
            filled: 0,
        }
    }

    /// Record a value, evicting the oldest when full
    pub fn push(&mut self, value: f64) {
        if N == 0 {
            return;
        }

        if self.filled < N {
            self.slots[self.filled] = value;
            self.filled += 1;
        } else {
            self.slots[self.head] = value;
            self.head = (self.head + 1) % N;
        }
    }

    /// Values currently held
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Whether nothing has been pushed since the last reset
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Whether the next push evicts
    pub fn is_full(&self) -> bool {
        self.filled == N
    }

    /// Newest value
    pub fn latest(&self) -> Option<f64> {
        match self.filled {
            0 => None,
            n if n < N => Some(self.slots[n - 1]),
            _ => Some(self.slots[(self.head + N - 1) % N]),
        }
    }

    /// Values oldest first
    pub fn iter(&self) -> Chain<Iter<'_, f64>, Iter<'_, f64>> {
        if self.filled < N {
            self.slots[..self.filled].iter().chain(self.slots[..0].iter())
        } else {
            let (wrapped, oldest) = self.slots.split_at(self.head);
            oldest.iter().chain(wrapped.iter())
        }
    }

    /// Forget every value
    pub fn reset(&mut self) {
        self.head = 0;
        self.filled = 0;
    }
}

impl<const N: usize> Default for SlidingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}
