//! Sentinel encoding for limits that can be switched off.
//!
//! Clients see a limit as two keys, `<x>_enabled` and `<x>`, while the store
//! keeps a single signed number where any negative value means "disabled".
//! [`Limit`] is the only place that knows about the raw encoding; everything
//! else talks in terms of `Limit::Disabled` and `Limit::Enabled(threshold)`.

use std::fmt;

/// Numeric types that can carry a sentinel-encoded limit.
pub trait Threshold: Copy + PartialOrd + fmt::Debug {
    /// The reserved value written to the store for a disabled limit.
    const DISABLED: Self;
    const ZERO: Self;
}

impl Threshold for f64 {
    const DISABLED: f64 = -1.0;
    const ZERO: f64 = 0.0;
}

impl Threshold for i64 {
    const DISABLED: i64 = -1;
    const ZERO: i64 = 0;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit<T> {
    Disabled,
    Enabled(T),
}

impl<T: Threshold> Limit<T> {
    /// Builds a limit from the client facing pair. The threshold is ignored
    /// when `enabled` is false.
    pub fn new(enabled: bool, threshold: T) -> Self {
        if enabled {
            Limit::Enabled(threshold)
        } else {
            Limit::Disabled
        }
    }
    /// Collapses the limit into the single stored number. Callers guarantee
    /// a non-negative threshold for enabled limits.
    pub fn encode(self) -> T {
        match self {
            Limit::Disabled => T::DISABLED,
            Limit::Enabled(threshold) => threshold,
        }
    }
    pub fn decode(stored: T) -> Self {
        if stored < T::ZERO {
            Limit::Disabled
        } else {
            Limit::Enabled(stored)
        }
    }
    pub fn is_enabled(&self) -> bool {
        matches!(self, Limit::Enabled(_))
    }
    pub fn threshold(&self) -> Option<T> {
        match self {
            Limit::Disabled => None,
            Limit::Enabled(threshold) => Some(*threshold),
        }
    }
    /// The `(<x>_enabled, <x>)` pair reported to clients. A disabled limit
    /// reports the raw sentinel as its magnitude.
    pub fn to_wire(self) -> (bool, T) {
        (self.is_enabled(), self.encode())
    }
}

impl<T: fmt::Display> fmt::Display for Limit<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Limit::Disabled => write!(f, "disabled"),
            Limit::Enabled(threshold) => write!(f, "{}", threshold),
        }
    }
}
