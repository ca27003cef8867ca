use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::domain::models::booking::Booking;

const OPENING_HOUR: u32 = 9;
const LAST_START_HOUR: u32 = 17;
const CLOSING_HOUR: u32 = 18;

/// Longest booking that fits between opening and closing time.
pub const MAX_DURATION_MIN: i64 = ((CLOSING_HOUR - OPENING_HOUR) * 60) as i64;

/// Local start times of the booking grid: on the hour from 09:00 to 17:00 and
/// on the half hour from 09:30 to 16:30.
pub fn slot_grid() -> Vec<NaiveTime> {
    let mut grid = Vec::new();
    for hour in OPENING_HOUR..=LAST_START_HOUR {
        if let Some(t) = NaiveTime::from_hms_opt(hour, 0, 0) {
            grid.push(t);
        }
        if hour < LAST_START_HOUR
            && let Some(t) = NaiveTime::from_hms_opt(hour, 30, 0) {
            grid.push(t);
        }
    }
    grid
}

/// UTC bounds of a local calendar day.
pub fn day_bounds(tz: Tz, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()?;
    let end = tz.from_local_datetime(&date.and_hms_opt(23, 59, 59)?).latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Bookable start times (RFC 3339, UTC) for one resource on `date`.
///
/// A slot is kept when it starts after `now`, ends by closing time and does
/// not overlap any non-cancelled booking in `existing_bookings`.
pub fn calculate_slots(
    tz: Tz,
    date: NaiveDate,
    duration_min: i64,
    existing_bookings: &[Booking],
    now: DateTime<Utc>,
) -> Vec<String> {
    if duration_min <= 0 {
        return Vec::new();
    }
    let Some(length) = Duration::try_minutes(duration_min) else {
        return Vec::new();
    };

    let Some(closing) = date.and_hms_opt(CLOSING_HOUR, 0, 0)
        .and_then(|c| tz.from_local_datetime(&c).earliest())
        .map(|c| c.with_timezone(&Utc))
    else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    for time in slot_grid() {
        // skipped by a DST jump
        let Some(start) = tz.from_local_datetime(&date.and_time(time)).earliest() else {
            continue;
        };
        let start = start.with_timezone(&Utc);
        let Some(end) = start.checked_add_signed(length) else {
            continue;
        };

        if start <= now || end > closing {
            continue;
        }
        if existing_bookings.iter().any(|b| b.overlaps(start, end)) {
            continue;
        }
        slots.push(start.to_rfc3339());
    }
    slots
}
