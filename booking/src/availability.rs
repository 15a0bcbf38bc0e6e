//! The availability engine.
//!
//! Turns a calendar date, the business-hours table, the blocked-date list,
//! and the cumulative selected-service duration into the ordered sequence
//! of bookable time slots. Pure and idempotent: identical inputs always
//! produce the identical sequence, and a changed input replaces the whole
//! sequence rather than patching it.

use crate::types::TimeSlot;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};

/// Slot grid interval, in minutes.
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Opening window for one weekday, in minutes of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoursWindow {
    /// Opening time in minutes since midnight
    pub open_minutes: u32,
    /// Closing time in minutes since midnight
    pub close_minutes: u32,
}

/// Business hours as a weekday-indexed configuration table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessHours {
    // indexed by Weekday::num_days_from_sunday()
    windows: [Option<HoursWindow>; 7],
}

impl BusinessHours {
    /// Builds a table from per-weekday windows (Sunday first).
    ///
    /// Windows are clamped to a calendar day and dropped when inverted, so
    /// the table can never describe an unrepresentable time.
    #[must_use]
    pub fn new(windows: [Option<HoursWindow>; 7]) -> Self {
        let windows = windows.map(|w| {
            w.filter(|w| w.open_minutes < w.close_minutes && w.close_minutes <= MINUTES_PER_DAY)
        });
        Self { windows }
    }

    /// The opening window for `weekday`, or `None` when closed.
    #[must_use]
    pub fn window(&self, weekday: Weekday) -> Option<HoursWindow> {
        self.windows[weekday.num_days_from_sunday() as usize]
    }
}

impl Default for BusinessHours {
    /// The salon's hours: closed Sunday, 10:00-17:00 Saturday,
    /// 10:00-19:00 Monday through Friday.
    fn default() -> Self {
        const WEEKDAY: Option<HoursWindow> = Some(HoursWindow {
            open_minutes: 10 * 60,
            close_minutes: 19 * 60,
        });
        const SATURDAY: Option<HoursWindow> = Some(HoursWindow {
            open_minutes: 10 * 60,
            close_minutes: 17 * 60,
        });
        Self::new([
            None, // Sunday
            WEEKDAY, WEEKDAY, WEEKDAY, WEEKDAY, WEEKDAY, SATURDAY,
        ])
    }
}

/// Business hours plus the blocked-date list.
#[derive(Clone, Debug, Default)]
pub struct BusinessCalendar {
    /// Weekday opening windows
    pub hours: BusinessHours,
    /// Dates closed regardless of weekday, compared by calendar day
    pub blocked_dates: Vec<NaiveDate>,
}

impl BusinessCalendar {
    /// Whether `date` appears in the blocked-date list.
    #[must_use]
    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    /// The opening window applying to `date`: the weekday window unless the
    /// date is blocked.
    #[must_use]
    pub fn window_for(&self, date: NaiveDate) -> Option<HoursWindow> {
        if self.is_blocked(date) {
            return None;
        }
        self.hours.window(date.weekday())
    }
}

fn time_of_day(minutes: u32) -> NaiveTime {
    // windows are clamped to < 24h by BusinessHours::new
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Computes the ordered slot sequence for `date`.
///
/// Every 30-minute grid start from open (inclusive) to close (exclusive)
/// appears, in ascending order, flagged available unless:
///
/// - `total_duration_minutes > 0` and the appointment would run past the
///   closing time (reaching close exactly is fine, one minute over is not), or
/// - `date` is today and the slot does not start strictly after `now`.
///
/// A closed weekday or blocked date yields an empty sequence. With no
/// services selected (`total_duration_minutes == 0`) only the overflow
/// check is disabled; the past-time check still applies.
#[must_use]
pub fn compute_slots(
    calendar: &BusinessCalendar,
    date: NaiveDate,
    total_duration_minutes: u32,
    now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let Some(window) = calendar.window_for(date) else {
        tracing::debug!(%date, "closed or blocked; no slots");
        return Vec::new();
    };

    let today = now.date_naive();
    let mut slots = Vec::new();
    let mut start_minutes = window.open_minutes;

    while start_minutes < window.close_minutes {
        let start = time_of_day(start_minutes);
        let mut available = true;

        if total_duration_minutes > 0
            && start_minutes + total_duration_minutes > window.close_minutes
        {
            available = false;
        }

        if available && date == today {
            available = date.and_time(start) > now.naive_utc();
        }

        slots.push(TimeSlot { start, available });
        start_minutes += SLOT_INTERVAL_MINUTES;
    }

    slots
}

/// Whether a calendar date can be opened for booking at all: not in the
/// past, not a closed weekday, not blocked.
#[must_use]
pub fn is_date_selectable(calendar: &BusinessCalendar, date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && calendar.window_for(date).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn calendar() -> BusinessCalendar {
        BusinessCalendar::default()
    }

    // a quiet moment long before any tested date
    fn far_past_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn sunday_yields_no_slots() {
        let sunday = date(2026, 3, 8);
        assert!(compute_slots(&calendar(), sunday, 0, far_past_now()).is_empty());
        assert!(compute_slots(&calendar(), sunday, 240, far_past_now()).is_empty());
    }

    #[test]
    fn saturday_spans_ten_to_sixteen_thirty() {
        let saturday = date(2026, 3, 7);
        let slots = compute_slots(&calendar(), saturday, 0, far_past_now());

        assert_eq!(slots.len(), 15);
        assert_eq!(slots[0].start, hm(10, 0));
        assert_eq!(slots[14].start, hm(16, 30));
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn weekday_spans_ten_to_eighteen_thirty() {
        let wednesday = date(2026, 3, 4);
        let slots = compute_slots(&calendar(), wednesday, 0, far_past_now());
        assert_eq!(slots.len(), 18);
        assert_eq!(slots[17].start, hm(18, 30));
    }

    #[test]
    fn overflow_disables_late_slots_but_reaching_close_is_fine() {
        let wednesday = date(2026, 3, 4);

        // 130 minutes against a 19:00 close: 16:30 ends 18:40 and stays
        // bookable; 17:00 ends 19:10, one past the close, and does not.
        let slots = compute_slots(&calendar(), wednesday, 130, far_past_now());
        let availability: Vec<(NaiveTime, bool)> =
            slots.iter().map(|s| (s.start, s.available)).collect();

        assert!(availability.contains(&(hm(16, 30), true)));
        assert!(availability.contains(&(hm(17, 0), false)));
        assert!(availability.contains(&(hm(17, 30), false)));
        assert!(availability.contains(&(hm(18, 30), false)));

        // exactly reaching close: 120 minutes at 17:00 ends 19:00 sharp
        let slots = compute_slots(&calendar(), wednesday, 120, far_past_now());
        assert!(
            slots
                .iter()
                .any(|s| s.start == hm(17, 0) && s.available)
        );
        assert!(
            slots
                .iter()
                .any(|s| s.start == hm(17, 30) && !s.available)
        );
    }

    #[test]
    fn zero_duration_disables_only_the_overflow_check() {
        let wednesday = date(2026, 3, 4);
        let mid_afternoon = Utc.with_ymd_and_hms(2026, 3, 4, 14, 10, 0).unwrap();

        let slots = compute_slots(&calendar(), wednesday, 0, mid_afternoon);
        // past-time exclusion still applies on the same day
        assert!(
            slots
                .iter()
                .any(|s| s.start == hm(14, 0) && !s.available)
        );
        assert!(
            slots
                .iter()
                .any(|s| s.start == hm(14, 30) && s.available)
        );
        // late slots stay available with nothing selected
        assert!(
            slots
                .iter()
                .any(|s| s.start == hm(18, 30) && s.available)
        );
    }

    #[test]
    fn same_day_slot_must_start_strictly_after_now() {
        let wednesday = date(2026, 3, 4);
        let exactly_two = Utc.with_ymd_and_hms(2026, 3, 4, 14, 0, 0).unwrap();

        let slots = compute_slots(&calendar(), wednesday, 0, exactly_two);
        assert!(
            slots
                .iter()
                .any(|s| s.start == hm(14, 0) && !s.available)
        );
    }

    #[test]
    fn blocked_date_yields_no_slots_even_in_hours() {
        let mut calendar = calendar();
        let wednesday = date(2026, 3, 4);
        calendar.blocked_dates.push(wednesday);

        assert!(compute_slots(&calendar, wednesday, 0, far_past_now()).is_empty());
    }

    #[test]
    fn compute_slots_is_idempotent() {
        let saturday = date(2026, 3, 7);
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 11, 5, 0).unwrap();

        let first = compute_slots(&calendar(), saturday, 90, now);
        let second = compute_slots(&calendar(), saturday, 90, now);
        assert_eq!(first, second);
    }

    #[test]
    fn date_selectability_applies_floor_and_calendar() {
        let today = date(2026, 3, 4);
        let cal = {
            let mut c = calendar();
            c.blocked_dates.push(date(2026, 3, 6));
            c
        };

        assert!(is_date_selectable(&cal, today, today));
        assert!(!is_date_selectable(&cal, date(2026, 3, 3), today)); // past
        assert!(!is_date_selectable(&cal, date(2026, 3, 8), today)); // Sunday
        assert!(!is_date_selectable(&cal, date(2026, 3, 6), today)); // blocked
        assert!(is_date_selectable(&cal, date(2026, 3, 5), today));
    }

    #[test]
    fn inverted_windows_are_dropped() {
        let hours = BusinessHours::new([
            Some(HoursWindow {
                open_minutes: 18 * 60,
                close_minutes: 9 * 60,
            }),
            None,
            None,
            None,
            None,
            None,
            None,
        ]);
        assert_eq!(hours.window(Weekday::Sun), None);
    }

    proptest! {
        #[test]
        fn slot_sequences_are_strictly_ascending(
            day_offset in 0u32..60,
            duration in 0u32..300,
        ) {
            let base = date(2026, 3, 1);
            let d = base + chrono::Duration::days(i64::from(day_offset));
            let slots = compute_slots(&calendar(), d, duration, far_past_now());

            for pair in slots.windows(2) {
                prop_assert!(pair[0].start < pair[1].start);
            }
        }

        #[test]
        fn grid_is_thirty_minutes(day_offset in 0u32..60) {
            let base = date(2026, 3, 1);
            let d = base + chrono::Duration::days(i64::from(day_offset));
            let slots = compute_slots(&calendar(), d, 0, far_past_now());

            for pair in slots.windows(2) {
                let gap = pair[1].start.signed_duration_since(pair[0].start);
                prop_assert_eq!(gap, chrono::Duration::minutes(30));
            }
        }
    }
}
