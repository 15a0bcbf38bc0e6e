//! # Booking Flow Testing
//!
//! Testing utilities for booking-flow reducers: a fluent Given/When/Then
//! harness, effect assertions, and deterministic fakes for the environment
//! traits (`Clock`, `KeyValueStore`).


/// Deterministic fakes for environment dependencies
pub mod mocks;

pub use reducer_test::{ReducerTest, assertions};

use chrono::{TimeZone, Utc};
use mocks::FixedClock;
use std::sync::Arc;

/// A fixed clock at a known weekday instant.
///
/// Wednesday 2026-03-04 12:00:00 UTC - a regular business day, so tests
/// exercising business hours get the Monday-Friday window by default.
///
/// # Panics
///
/// Never panics; the embedded timestamp is valid.
#[must_use]
#[allow(clippy::unwrap_used)] // constant timestamp is known-valid
pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap(),
    ))
}
