//! Deterministic fakes for the environment traits.

use booking_flow_core::environment::{Clock, KeyValueStore};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A clock pinned to an explicit instant, advanced manually by tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward.
    ///
    /// # Panics
    ///
    /// Panics if the clock mutex is poisoned.
    #[allow(clippy::unwrap_used)] // test fake
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    /// Repins the clock to an explicit instant.
    ///
    /// # Panics
    ///
    /// Panics if the clock mutex is poisoned.
    #[allow(clippy::unwrap_used)] // test fake
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for FixedClock {
    #[allow(clippy::unwrap_used)] // test fake
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// An in-memory `KeyValueStore`.
///
/// Stands in for both the long-lived and the session-scoped stores in
/// tests, and backs the session-scoped notification-send counter in the
/// demo binary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    #[allow(clippy::unwrap_used)] // test fake
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    #[allow(clippy::unwrap_used)] // test fake
    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
    }

    #[allow(clippy::unwrap_used)] // test fake
    fn delete(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// A store whose backing medium is broken: reads return nothing and
/// writes are dropped. Exercises the degrade-to-no-record contract.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn delete(&self, _key: &str) {}
}
