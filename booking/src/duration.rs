//! Parsers for the catalog's human-formatted duration and price strings.
//!
//! Catalog entries carry durations like `"2h 30m"` and prices like `"$70"`.
//! Parsing is deliberately lenient: the first `<int>h` token and the first
//! `<int>m` token are honored wherever they appear, a missing token
//! contributes zero, and unparseable input degrades to zero instead of
//! failing. The zero fallback is inherited behavior the rest of the
//! workflow relies on; `lenient_by_contract` below pins it.

use chrono::{Duration, NaiveTime};

/// Total minutes encoded in a human duration string.
///
/// `"2h 30m"` → 150, `"45m"` → 45, `"3h"` → 180, `""` and garbage → 0.
/// Only the first hour token and the first minute token count.
#[must_use]
pub fn parse_duration_minutes(text: &str) -> u32 {
    let mut hours: Option<u32> = None;
    let mut minutes: Option<u32> = None;
    let mut pending: Option<u32> = None;

    for ch in text.chars() {
        if let Some(digit) = ch.to_digit(10) {
            pending = Some(
                pending
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(digit),
            );
        } else if ch == 'h' {
            if let Some(value) = pending.take() {
                hours.get_or_insert(value);
            }
        } else if ch == 'm' {
            if let Some(value) = pending.take() {
                minutes.get_or_insert(value);
            }
        } else {
            // any other character breaks a number-unit pair
            pending = None;
        }
    }

    hours
        .unwrap_or(0)
        .saturating_mul(60)
        .saturating_add(minutes.unwrap_or(0))
}

/// Whole dollars encoded in a currency string.
///
/// Strips a leading `$` and reads the leading integer; anything else
/// degrades to 0.
#[must_use]
pub fn parse_price_dollars(text: &str) -> u32 {
    let stripped = text.replacen('$', "", 1);
    let digits: String = stripped
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Formats minutes back into the catalog's duration shape:
/// `150` → `"2h 30m"`, `180` → `"3h"`, `45` → `"45m"`.
#[must_use]
pub fn format_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{minutes}m")
    }
}

/// Appointment end time shown next to a chosen slot.
#[must_use]
pub fn estimated_end_time(start: NaiveTime, total_minutes: u32) -> NaiveTime {
    start + Duration::minutes(i64::from(total_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_combined_tokens() {
        assert_eq!(parse_duration_minutes("2h 30m"), 150);
        assert_eq!(parse_duration_minutes("1h 15m"), 75);
    }

    #[test]
    fn parses_single_tokens() {
        assert_eq!(parse_duration_minutes("45m"), 45);
        assert_eq!(parse_duration_minutes("3h"), 180);
        assert_eq!(parse_duration_minutes("30m"), 30);
    }

    #[test]
    fn tokens_parse_in_either_order() {
        assert_eq!(parse_duration_minutes("30m 2h"), 150);
        assert_eq!(parse_duration_minutes("2h30m"), 150);
    }

    #[test]
    fn only_first_token_of_each_unit_counts() {
        assert_eq!(parse_duration_minutes("1h 2h"), 60);
        assert_eq!(parse_duration_minutes("10m 20m"), 10);
    }

    // The zero fallback for malformed input is inherited behavior: the
    // catalog is trusted, so a bad string silently books a zero-length
    // service rather than erroring. Pinned here on purpose.
    #[test]
    fn lenient_by_contract() {
        assert_eq!(parse_duration_minutes(""), 0);
        assert_eq!(parse_duration_minutes("garbage"), 0);
        assert_eq!(parse_duration_minutes("30 minutes"), 0);
        assert_eq!(parse_duration_minutes("h m"), 0);
    }

    #[test]
    fn price_parsing() {
        assert_eq!(parse_price_dollars("$100"), 100);
        assert_eq!(parse_price_dollars("$15"), 15);
        assert_eq!(parse_price_dollars("20"), 20);
        assert_eq!(parse_price_dollars("free"), 0);
        assert_eq!(parse_price_dollars(""), 0);
    }

    #[test]
    fn formats_round_trip_catalog_shapes() {
        assert_eq!(format_minutes(150), "2h 30m");
        assert_eq!(format_minutes(180), "3h");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(0), "0m");
    }

    #[test]
    fn end_time_advances_by_total() {
        let start = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert_eq!(
            estimated_end_time(start, 130),
            NaiveTime::from_hms_opt(19, 10, 0).unwrap()
        );
    }

    proptest! {
        #[test]
        fn formatted_durations_parse_back(hours in 0u32..24, minutes in 0u32..60) {
            let total = hours * 60 + minutes;
            prop_assert_eq!(parse_duration_minutes(&format_minutes(total)), total);
        }

        #[test]
        fn token_order_is_irrelevant(hours in 1u32..24, minutes in 1u32..60) {
            let forward = format!("{hours}h {minutes}m");
            let backward = format!("{minutes}m {hours}h");
            prop_assert_eq!(
                parse_duration_minutes(&forward),
                parse_duration_minutes(&backward)
            );
        }

        #[test]
        fn never_panics_on_arbitrary_input(text in ".*") {
            let _ = parse_duration_minutes(&text);
            let _ = parse_price_dollars(&text);
        }
    }
}
