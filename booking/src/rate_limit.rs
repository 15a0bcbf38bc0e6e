//! Submission rate limiting and abuse heuristics.
//!
//! Two independent sliding-window counters persist through the
//! [`KeyValueStore`] seam: the booking-submission counter (long-lived
//! store) and the notification-send counter (session-scoped store). A
//! missing, corrupt, or unwritable record degrades to "no record yet";
//! the guard never fails a booking because its bookkeeping broke.

use booking_flow_core::environment::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Storage key for the booking-submission counter.
pub const SUBMISSION_COUNTER_KEY: &str = "appointment_rate_limit";

/// Storage key for the notification-send counter.
pub const SEND_COUNTER_KEY: &str = "email_rate_limit";

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Persisted counter state. Field names match the stored JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRecord {
    /// Submissions recorded in the current window
    pub count: u32,
    /// Epoch milliseconds of the window's first submission (0 = none)
    pub first_request_time: i64,
    /// Epoch milliseconds of the latest submission (0 = none)
    pub last_request_time: i64,
}

/// Tunable limits for the submission guard.
#[derive(Clone, Copy, Debug)]
pub struct SubmissionLimits {
    /// Minimum wall-clock form-fill time
    pub min_fill_time: Duration,
    /// Minimum spacing between two submissions
    pub min_interval: Duration,
    /// Cap inside the first hour of a window
    pub max_per_hour: u32,
    /// Cap inside a 24-hour window
    pub max_per_day: u32,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            min_fill_time: Duration::from_secs(5),
            min_interval: Duration::from_secs(30),
            max_per_hour: 5,
            max_per_day: 10,
        }
    }
}

/// Outcome of the pre-submission checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The submission may proceed
    Allowed,
    /// The submission is blocked
    Blocked {
        /// Human-readable reason, including any wait time
        message: String,
        /// Remaining wait where the block is time-bound
        retry_after: Option<Duration>,
    },
}

impl Verdict {
    /// Whether the submission may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    fn blocked(message: impl Into<String>) -> Self {
        Self::Blocked {
            message: message.into(),
            retry_after: None,
        }
    }

    fn blocked_for(message: impl Into<String>, retry_after: Duration) -> Self {
        Self::Blocked {
            message: message.into(),
            retry_after: Some(retry_after),
        }
    }
}

/// Whether a hidden honeypot field looks human (left empty).
#[must_use]
pub fn honeypot_is_human(value: &str) -> bool {
    value.trim().is_empty()
}

fn read_record(store: &dyn KeyValueStore, key: &str) -> RateLimitRecord {
    let Some(raw) = store.get(key) else {
        return RateLimitRecord::default();
    };
    match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(key, %error, "corrupt rate-limit record, treating as empty");
            RateLimitRecord::default()
        }
    }
}

fn write_record(store: &dyn KeyValueStore, key: &str, record: &RateLimitRecord) {
    match serde_json::to_string(record) {
        Ok(raw) => store.set(key, &raw),
        Err(error) => {
            tracing::warn!(key, %error, "failed to serialize rate-limit record");
        }
    }
}

/// The booking-submission guard.
///
/// `evaluate` applies the checks in a fixed order: form-fill time, minimum
/// interval, 24-hour window reset, daily cap, hourly cap. Only after an
/// `Allowed` verdict does the caller [`record`](Self::record) the
/// submission; read-modify-write of the counter is one logical step.
pub struct SubmissionGuard {
    store: Arc<dyn KeyValueStore>,
    limits: SubmissionLimits,
}

impl SubmissionGuard {
    /// Creates a guard with the default limits.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limits(store, SubmissionLimits::default())
    }

    /// Creates a guard with explicit limits.
    #[must_use]
    pub fn with_limits(store: Arc<dyn KeyValueStore>, limits: SubmissionLimits) -> Self {
        Self { store, limits }
    }

    /// Runs every pre-submission check in order.
    #[must_use]
    pub fn evaluate(&self, form_opened_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Verdict {
        // 1. a form filled faster than any human types is bot traffic
        let filled_for = form_opened_at.map(|opened| now.signed_duration_since(opened));
        let min_fill_ms = i64::try_from(self.limits.min_fill_time.as_millis()).unwrap_or(i64::MAX);
        if !filled_for.is_some_and(|d| d.num_milliseconds() >= min_fill_ms) {
            tracing::info!("submission blocked: form filled too quickly");
            return Verdict::blocked("Please take your time filling out the form.");
        }

        let record = read_record(self.store.as_ref(), SUBMISSION_COUNTER_KEY);
        let now_ms = now.timestamp_millis();

        // 2. minimum spacing since the previous submission
        let min_interval_ms =
            i64::try_from(self.limits.min_interval.as_millis()).unwrap_or(i64::MAX);
        if record.last_request_time > 0 {
            let since_last = now_ms - record.last_request_time;
            if since_last < min_interval_ms {
                let wait_secs = (min_interval_ms - since_last + 999) / 1000;
                tracing::info!(wait_secs, "submission blocked: minimum interval");
                return Verdict::blocked_for(
                    format!(
                        "Please wait {wait_secs} seconds before submitting another appointment."
                    ),
                    Duration::from_secs(wait_secs.unsigned_abs()),
                );
            }
        }

        // 3. a window older than a day starts over
        if record.first_request_time > 0 && now_ms - record.first_request_time > DAY_MS {
            self.store.delete(SUBMISSION_COUNTER_KEY);
            return Verdict::Allowed;
        }

        // 4. daily cap
        if record.count >= self.limits.max_per_day {
            tracing::info!(count = record.count, "submission blocked: daily cap");
            return Verdict::blocked(
                "You have reached the maximum number of appointments for today. \
                 Please try again tomorrow.",
            );
        }

        // 5. hourly cap, only while the window is younger than an hour
        if record.first_request_time > 0 && now_ms - record.first_request_time < HOUR_MS {
            if record.count >= self.limits.max_per_hour {
                let elapsed = now_ms - record.first_request_time;
                let wait_mins = (HOUR_MS - elapsed + 59_999) / 60_000;
                tracing::info!(wait_mins, "submission blocked: hourly cap");
                return Verdict::blocked_for(
                    format!("Too many appointment requests. Please wait {wait_mins} minutes."),
                    Duration::from_secs(wait_mins.unsigned_abs() * 60),
                );
            }
        }

        Verdict::Allowed
    }

    /// Records an allowed submission: bumps the count, stamps the last
    /// request time, and starts the window if none is open.
    pub fn record(&self, now: DateTime<Utc>) {
        let now_ms = now.timestamp_millis();
        let mut record = read_record(self.store.as_ref(), SUBMISSION_COUNTER_KEY);

        if record.first_request_time > 0 && now_ms - record.first_request_time > DAY_MS {
            self.store.delete(SUBMISSION_COUNTER_KEY);
            record = RateLimitRecord::default();
        }

        let updated = RateLimitRecord {
            count: record.count + 1,
            first_request_time: if record.first_request_time > 0 {
                record.first_request_time
            } else {
                now_ms
            },
            last_request_time: now_ms,
        };
        write_record(self.store.as_ref(), SUBMISSION_COUNTER_KEY, &updated);
    }
}

/// The notification-send window: at most `max_per_window` sends per rolling
/// `window`. Checked by the dispatcher before each individual send;
/// overflow suppresses that send only, never the submission.
pub struct SendWindow {
    store: Arc<dyn KeyValueStore>,
    max_per_window: u32,
    window: Duration,
}

impl SendWindow {
    /// Creates the default 3-per-minute window.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            max_per_window: 3,
            window: Duration::from_secs(60),
        }
    }

    /// Whether another send fits in the current window.
    #[must_use]
    pub fn can_send(&self, now: DateTime<Utc>) -> bool {
        let record = read_record(self.store.as_ref(), SEND_COUNTER_KEY);
        let now_ms = now.timestamp_millis();
        let window_ms = i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX);

        if record.count >= self.max_per_window
            && now_ms - record.first_request_time < window_ms
        {
            tracing::info!(count = record.count, "notification send suppressed");
            return false;
        }

        if record.first_request_time > 0 && now_ms - record.first_request_time > window_ms {
            self.store.delete(SEND_COUNTER_KEY);
        }

        true
    }

    /// Records a completed send.
    pub fn record_send(&self, now: DateTime<Utc>) {
        let now_ms = now.timestamp_millis();
        let record = read_record(self.store.as_ref(), SEND_COUNTER_KEY);

        let updated = RateLimitRecord {
            count: record.count + 1,
            first_request_time: if record.first_request_time > 0 {
                record.first_request_time
            } else {
                now_ms
            },
            last_request_time: now_ms,
        };
        write_record(self.store.as_ref(), SEND_COUNTER_KEY, &updated);
    }
}
