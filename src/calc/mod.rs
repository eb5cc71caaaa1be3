mod capacity;
mod closures;
mod error;
mod hours;
mod slots;

pub use capacity::{SlotStatus, evaluate, overlap_count};
pub use closures::{ClosureKind, apply_closures, closure_match};
pub use error::SlotError;
pub use hours::resolve_hours;
pub use slots::generate;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::model::{
    AppointmentType, DaySlots, ExistingBooking, Facility, MS_PER_MINUTE, Organization, Slot,
    SlotQuery, Span,
};
use crate::observability;
use crate::store::{BookingStore, ConfigStore};
use crate::tz;

/// Widest date window a single query may cover.
const MAX_WINDOW_DAYS: u32 = 366;

/// Pure per-day pipeline: resolve hours, apply closures, enumerate
/// candidates, convert each to an instant, judge capacity. Slots come back
/// ordered by local start ascending.
///
/// Inputs are immutable snapshots; the caller re-validates capacity at
/// booking commit time.
pub fn compute_day(
    date: NaiveDate,
    org: &Organization,
    facility: &Facility,
    atype: &AppointmentType,
    interval_minutes: u32,
    bookings: &[ExistingBooking],
) -> Result<Vec<Slot>, SlotError> {
    let zone = tz::lookup(&facility.timezone)?;
    let weekday = tz::weekday_index(date);

    let resolved = hours::resolve_hours(
        weekday,
        &org.hours,
        &facility.hours,
        atype.hours_override.then_some(&atype.hours),
    );
    let closed_by_closure =
        closures::closure_match(date, &org.holidays, &facility.closures, &atype.blackouts)
            .is_some();
    let effective = closures::apply_closures(
        resolved,
        date,
        &org.holidays,
        &facility.closures,
        &atype.blackouts,
    );

    let candidates = slots::generate(&effective, interval_minutes, atype.duration_minutes)?;
    let duration_ms = atype.duration_minutes as i64 * MS_PER_MINUTE;

    let mut out = Vec::with_capacity(candidates.len());
    for local_time in candidates {
        let start = tz::resolve_local(date, local_time, zone)?;
        let candidate = Span::new(start, start + duration_ms);
        let status = capacity::evaluate(
            local_time,
            candidate,
            atype,
            &effective,
            closed_by_closure,
            bookings,
        );
        out.push(Slot {
            local_time,
            instant: start,
            available: status.available,
            remaining_capacity: status.remaining_capacity,
            reason: status.reason,
        });
    }

    debug!(
        %date,
        facility = %facility.id,
        appointment_type = %atype.id,
        slots = out.len(),
        open = effective.open,
        "computed day slots"
    );
    Ok(out)
}

/// Facility-local midnight-to-next-midnight as an instant span. A zone that
/// skips midnight on a transition day rolls forward like any other gap.
pub fn day_window(date: NaiveDate, zone: Tz) -> Result<Span, SlotError> {
    let start = tz::resolve_local(date, NaiveTime::MIN, zone)?;
    let next = date
        .succ_opt()
        .ok_or_else(|| SlotError::InvalidTime(format!("date overflow after {date}")))?;
    let end = tz::resolve_local(next, NaiveTime::MIN, zone)?;
    Ok(Span::new(start, end))
}

/// Front door: look up the three configuration entities, fetch the day's
/// bookings, delegate to `compute_day`.
///
/// A missing entity is `NotFound` and propagates. Defaults are only ever
/// guessed for missing *fields* inside an existing entity, never for a
/// missing entity.
pub fn day_slots(
    config: &dyn ConfigStore,
    bookings: &dyn BookingStore,
    query: &SlotQuery,
) -> Result<Vec<Slot>, SlotError> {
    let date = tz::parse_date(&query.date)?;

    let facility = config
        .facility(&query.tenant, query.facility_id)
        .ok_or(SlotError::NotFound(query.facility_id))?;
    let atype = config
        .appointment_type(&query.tenant, query.appointment_type_id)
        .ok_or(SlotError::NotFound(query.appointment_type_id))?;
    if atype.facility_id != facility.id {
        return Err(SlotError::NotFound(query.appointment_type_id));
    }
    let org = config
        .organization(&query.tenant, facility.organization_id)
        .ok_or(SlotError::NotFound(facility.organization_id))?;

    let zone = tz::lookup(&facility.timezone)?;
    let window = day_window(date, zone)?;
    let existing = bookings.bookings_overlapping(&query.tenant, facility.id, atype.id, &window);

    let out = compute_day(date, &org, &facility, &atype, query.interval_minutes, &existing)?;
    metrics::counter!(observability::DAYS_COMPUTED_TOTAL).increment(1);
    metrics::counter!(observability::SLOTS_GENERATED_TOTAL).increment(out.len() as u64);
    Ok(out)
}

/// `day_slots` with the local-recovery policy applied: a configuration
/// defect closes this one day instead of failing the caller's whole window.
fn day_slots_recovered(
    config: &dyn ConfigStore,
    bookings: &dyn BookingStore,
    query: &SlotQuery,
    date: NaiveDate,
) -> Result<Vec<Slot>, SlotError> {
    let q = SlotQuery {
        date: date.to_string(),
        ..query.clone()
    };
    match day_slots(config, bookings, &q) {
        Ok(slots) => Ok(slots),
        Err(SlotError::Configuration(msg)) => {
            warn!(%date, %msg, "configuration defect, treating day as closed");
            metrics::counter!(observability::CONFIG_DEFECTS_TOTAL).increment(1);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Compute every day from the query date through `until` (inclusive).
/// One bad appointment-type override cannot take down unrelated days.
pub fn compute_window(
    config: &dyn ConfigStore,
    bookings: &dyn BookingStore,
    query: &SlotQuery,
    until: &str,
) -> Result<Vec<DaySlots>, SlotError> {
    let from = tz::parse_date(&query.date)?;
    let to = tz::parse_date(until)?;
    if to < from {
        return Err(SlotError::InvalidTime(format!(
            "window end {to} before start {from}"
        )));
    }
    let span_days = (to - from).num_days() as u32 + 1;
    if span_days > MAX_WINDOW_DAYS {
        return Err(SlotError::Configuration(format!(
            "window of {span_days} days exceeds {MAX_WINDOW_DAYS}"
        )));
    }

    let mut out = Vec::with_capacity(span_days as usize);
    let mut day = from;
    loop {
        let slots = day_slots_recovered(config, bookings, query, day)?;
        out.push(DaySlots { date: day, slots });
        if day == to {
            break;
        }
        day = day
            .succ_opt()
            .ok_or_else(|| SlotError::InvalidTime(format!("date overflow after {day}")))?;
    }
    Ok(out)
}

/// Earliest available slot between the query date and `until` (inclusive).
/// Stops scanning at the first hit.
pub fn first_available(
    config: &dyn ConfigStore,
    bookings: &dyn BookingStore,
    query: &SlotQuery,
    until: &str,
) -> Result<Option<(NaiveDate, Slot)>, SlotError> {
    let from = tz::parse_date(&query.date)?;
    let to = tz::parse_date(until)?;
    if to < from {
        return Err(SlotError::InvalidTime(format!(
            "window end {to} before start {from}"
        )));
    }

    let span_days = (to - from).num_days() as u32 + 1;
    if span_days > MAX_WINDOW_DAYS {
        return Err(SlotError::Configuration(format!(
            "window of {span_days} days exceeds {MAX_WINDOW_DAYS}"
        )));
    }

    let mut day = from;
    loop {
        let slots = day_slots_recovered(config, bookings, query, day)?;
        if let Some(slot) = slots.into_iter().find(|s| s.available) {
            return Ok(Some((day, slot)));
        }
        if day == to {
            return Ok(None);
        }
        day = day
            .succ_opt()
            .ok_or_else(|| SlotError::InvalidTime(format!("date overflow after {day}")))?;
    }
}
