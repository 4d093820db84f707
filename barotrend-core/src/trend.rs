//! Streaming Pressure Trend Detection
//!
//! ## Overview
//!
//! Barometric pressure readings are noisy; a single delta between two samples
//! says little. The detector keeps the last `N` observations (one hour of
//! 10-minute samples with `N = 6`) and asks a statistical question instead:
//! *is the slope of the best-fit line through the window distinguishable from
//! zero?*
//!
//! ## Algorithm
//!
//! ### Step 1: Least-squares fit
//!
//! Observation `i` (oldest first) is the point `(x = i, y = pressure)`:
//!
//! ```text
//! slope     b₁ = (Σx·Σy − n·Σxy) / ((Σx)² − n·Σx²)
//! intercept b₀ = (Σy − b₁·Σx) / n
//! SSE          = Σ (y − (b₀ + b₁·x))²
//! ```
//!
//! ### Step 2: Two-tailed t-test on the slope
//!
//! ```text
//! H0: β₁ = 0        H1: β₁ ≠ 0        α = 0.05,  ν = n − 2
//!
//! t = | b₁ / ( sqrt(SSE / (n − 2)) / sqrt(Σx² − (Σx)² / n) ) |
//!
//! reject H0 when t > t_critical   (invt(0.025, 4) = 2.776445105 for n = 6)
//! ```
//!
//! Rejecting H0 yields `Rising` or `Falling` by the sign of the slope,
//! otherwise `Steady`. Until the window is full the answer is `Training`.
//!
//! ### Degenerate fit
//!
//! When every point lies exactly on the line, SSE is zero and the statistic is
//! unbounded. A flat window is `Steady`; any other perfect line is classified
//! by the sign of its slope.
//!
//! ## Coupled Constants
//!
//! The window size and the critical value go together. Changing `N` means
//! recomputing the critical value for `ν = N − 2` and passing it through
//! [`TrendDetector::with_critical_value`].
//!
//! ```rust
//! use barotrend_core::trend::{Trend, TrendDetector};
//!
//! let mut detector = TrendDetector::new();
//! let mut trend = Trend::Training;
//! for pressure in [1000.0, 1002.0, 1004.0, 1006.0, 1008.0, 1010.0] {
//!     trend = detector.classify(pressure);
//! }
//! assert_eq!(trend, Trend::Rising);
//! ```

use core::fmt;

use crate::buffer::SlidingWindow;
use crate::constants::statistics::{TREND_CRITICAL_T_VALUE, TREND_WINDOW_SIZE};

/// Short-term pressure tendency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    /// Window not yet full
    Training,
    /// Slope significantly negative
    Falling,
    /// Slope not distinguishable from zero
    Steady,
    /// Slope significantly positive
    Rising,
}

impl Trend {
    /// Token carried in the pressure payload
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Falling => "falling",
            Self::Steady => "steady",
            Self::Rising => "rising",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Trend {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

/// Regression figures for a full window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAnalysis {
    /// Change per observation in hPa
    pub slope: f64,
    /// Fitted value at the oldest observation in hPa
    pub intercept: f64,
    /// Residual sum of squares
    pub sse: f64,
    /// Absolute t-statistic for the slope, infinite for a perfect non-flat fit
    pub t_observed: f64,
}

/// Sliding-window trend classifier
///
/// The window lives for the process lifetime and is never persisted.
#[derive(Debug, Clone)]
pub struct TrendDetector<const N: usize = TREND_WINDOW_SIZE> {
    window: SlidingWindow<N>,
    critical_t: f64,
}

impl TrendDetector<TREND_WINDOW_SIZE> {
    /// Six-sample window with the matching 95% critical value
    pub const fn new() -> Self {
        Self {
            window: SlidingWindow::new(),
            critical_t: TREND_CRITICAL_T_VALUE,
        }
    }
}

impl Default for TrendDetector<TREND_WINDOW_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrendDetector<N> {
    /// Window of `N` with a caller-supplied critical value for `ν = N − 2`
    pub const fn with_critical_value(critical_t: f64) -> Self {
        Self {
            window: SlidingWindow::new(),
            critical_t,
        }
    }

    /// Add an observation and classify the updated window
    pub fn classify(&mut self, observation: f64) -> Trend {
        self.window.push(observation);

        let analysis = match self.analyze() {
            Some(analysis) => analysis,
            None => return Trend::Training,
        };

        if analysis.sse == 0.0 {
            return sign_of(analysis.slope);
        }

        if analysis.t_observed > self.critical_t {
            sign_of(analysis.slope)
        } else {
            Trend::Steady
        }
    }

    /// Regression over the current window, `None` while training
    pub fn analyze(&self) -> Option<TrendAnalysis> {
        // ν = N − 2 must be positive for the test to mean anything
        if !self.window.is_full() || N < 3 {
            return None;
        }

        let n = N as f64;
        let mut sum_x = 0.0;
        let mut sum_xx = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;

        for (i, &y) in self.window.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_xx += x * x;
            sum_y += y;
            sum_xy += x * y;
        }

        let slope = (sum_x * sum_y - n * sum_xy) / (sum_x * sum_x - n * sum_xx);
        let intercept = (sum_y - slope * sum_x) / n;

        let sse: f64 = self
            .window
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                let residual = y - (intercept + slope * i as f64);
                residual * residual
            })
            .sum();

        let t_observed = if sse == 0.0 {
            if slope == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            let standard_error =
                libm::sqrt(sse / (n - 2.0)) / libm::sqrt(sum_xx - sum_x * sum_x / n);
            libm::fabs(slope / standard_error)
        };

        Some(TrendAnalysis {
            slope,
            intercept,
            sse,
            t_observed,
        })
    }

    /// Observations held, up to `N`
    pub fn observations(&self) -> usize {
        self.window.len()
    }

    /// Whether the window is full
    pub fn is_trained(&self) -> bool {
        self.window.is_full()
    }

    /// Two-sided critical value of Student's t used by `classify`
    pub fn critical_value(&self) -> f64 {
        self.critical_t
    }
}

fn sign_of(slope: f64) -> Trend {
    if slope < 0.0 {
        Trend::Falling
    } else if slope > 0.0 {
        Trend::Rising
    } else {
        Trend::Steady
    }
}
