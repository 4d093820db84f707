//! Trend Detection Parameters
//!
//! The window size and the critical value are coupled: the critical value is
//! the two-tailed Student-t quantile for ν = N − 2 degrees of freedom. Changing
//! one requires recomputing the other outside the firmware:
//!
//! ```text
//! α = 0.05, ν = TREND_WINDOW_SIZE − 2 = 4
//!
//! Excel:      =T.INV(α/2, ν)      → -2.776445105
//! TI-Nspire:  invt(α/2, ν)        → -2.776445105
//! ```
//!
//! The critical value is the absolute value of that quantile.

/// Observations in the trend window.
///
/// At the production scan interval (10 minutes) the window spans one hour.
pub const TREND_WINDOW_SIZE: usize = 6;

/// Two-tailed critical t at 95% confidence for ν = 4.
pub const TREND_CRITICAL_T_VALUE: f64 = 2.776445105;
