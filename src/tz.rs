use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::calc::SlotError;
use crate::model::Ms;

/// Returned by `format_in_timezone` instead of a corrupted string.
pub const FORMAT_SENTINEL: &str = "--:--";

/// Widest DST gap we roll forward across (minutes). Real-world gaps are
/// 30–120 minutes; anything unresolved past this is a broken zone input.
const MAX_GAP_PROBE_MINUTES: i64 = 180;

/// Look up an IANA zone name.
pub fn lookup(tz_name: &str) -> Result<Tz, SlotError> {
    tz_name
        .parse::<Tz>()
        .map_err(|_| SlotError::InvalidTime(format!("unknown timezone \"{tz_name}\"")))
}

/// Strict 24-hour `HH:MM`. Rejects seconds, single-digit hours, and
/// out-of-range components.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, SlotError> {
    let bad = || SlotError::InvalidTime(format!("bad HH:MM \"{s}\""));
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(bad());
    }
    if !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || !bytes[3].is_ascii_digit()
        || !bytes[4].is_ascii_digit()
    {
        return Err(bad());
    }
    let hour = (bytes[0] - b'0') as u32 * 10 + (bytes[1] - b'0') as u32;
    let minute = (bytes[3] - b'0') as u32 * 10 + (bytes[4] - b'0') as u32;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)
}

/// ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, SlotError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidTime(format!("bad ISO date \"{s}\"")))
}

/// Weekday index 0–6, Sunday = 0, of a local calendar date.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// Resolve a facility-local wall-clock time to an absolute instant.
///
/// Ambiguous local times (fall-back overlap) take the earlier offset.
/// Non-existent local times (spring-forward gap) roll forward to the first
/// representable instant after the transition.
pub fn resolve_local(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<Ms, SlotError> {
    let naive = date.and_time(time);
    if let Some(ms) = resolve_naive(&naive, tz) {
        return Ok(ms);
    }
    let mut probe = naive;
    for _ in 0..MAX_GAP_PROBE_MINUTES {
        probe += Duration::minutes(1);
        if let Some(ms) = resolve_naive(&probe, tz) {
            return Ok(ms);
        }
    }
    Err(SlotError::InvalidTime(format!(
        "local time {naive} unresolvable in {tz}"
    )))
}

fn resolve_naive(naive: &NaiveDateTime, tz: Tz) -> Option<Ms> {
    match tz.from_local_datetime(naive) {
        chrono::LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        chrono::LocalResult::Ambiguous(earlier, _) => Some(earlier.timestamp_millis()),
        chrono::LocalResult::None => None,
    }
}

/// String-facing form of `resolve_local`: ISO date + `HH:MM` + zone name.
pub fn local_to_instant(date_str: &str, time_str: &str, tz_name: &str) -> Result<Ms, SlotError> {
    let date = parse_date(date_str)?;
    let time = parse_hhmm(time_str)?;
    let tz = lookup(tz_name)?;
    resolve_local(date, time, tz)
}

/// Weekday index 0–6 (Sunday = 0) of the instant's calendar date in the
/// target zone, not of any intermediate UTC date.
pub fn instant_to_local_weekday(instant: Ms, tz: Tz) -> Result<usize, SlotError> {
    let dt = tz
        .timestamp_millis_opt(instant)
        .single()
        .ok_or_else(|| SlotError::InvalidTime(format!("instant {instant} out of range")))?;
    Ok(dt.weekday().num_days_from_sunday() as usize)
}

/// Pure formatting in an arbitrary zone. Fails closed: unknown zone,
/// out-of-range instant, or a malformed pattern all yield the sentinel.
pub fn format_in_timezone(instant: Ms, tz_name: &str, pattern: &str) -> String {
    let Ok(tz) = lookup(tz_name) else {
        return FORMAT_SENTINEL.to_string();
    };
    let Some(dt) = tz.timestamp_millis_opt(instant).single() else {
        return FORMAT_SENTINEL.to_string();
    };
    // Validate before formatting: chrono renders bad specifiers as a
    // mid-string fmt error.
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return FORMAT_SENTINEL.to_string();
    }
    dt.format_with_items(items.into_iter()).to_string()
}
