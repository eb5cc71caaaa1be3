use chrono::{Duration, NaiveTime};

use crate::model::{
    AppointmentType, EffectiveDayHours, ExistingBooking, MS_PER_MINUTE, Span, UnavailableReason,
};

/// Evaluator verdict for one candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub available: bool,
    pub remaining_capacity: u32,
    pub reason: Option<UnavailableReason>,
}

impl SlotStatus {
    fn blocked(reason: UnavailableReason) -> Self {
        Self {
            available: false,
            remaining_capacity: 0,
            reason: Some(reason),
        }
    }
}

/// Judge one candidate slot against hours, break, closure, and capacity.
///
/// `candidate` is the absolute `[start, start + duration)` range;
/// `local_time` is the same start on the facility's wall clock. Reason
/// precedence: closure, then hours, then break, then capacity.
pub fn evaluate(
    local_time: NaiveTime,
    candidate: Span,
    atype: &AppointmentType,
    hours: &EffectiveDayHours,
    closed_by_closure: bool,
    bookings: &[ExistingBooking],
) -> SlotStatus {
    if closed_by_closure {
        return SlotStatus::blocked(UnavailableReason::Closed);
    }
    if !fits_open_window(local_time, atype.duration_minutes, hours) {
        return SlotStatus::blocked(UnavailableReason::OutsideHours);
    }
    if intersects_break(local_time, atype.duration_minutes, hours) && !atype.may_span_break {
        return SlotStatus::blocked(UnavailableReason::BreakTime);
    }

    let overlap = overlap_count(&candidate, atype.buffer_minutes, bookings);
    let remaining = atype.max_concurrent.saturating_sub(overlap);
    if remaining == 0 {
        return SlotStatus::blocked(UnavailableReason::AtCapacity);
    }
    SlotStatus {
        available: true,
        remaining_capacity: remaining,
        reason: None,
    }
}

/// Bookings whose effective range (booked range plus buffer) strictly
/// overlaps the candidate. Touching endpoints do not count.
pub fn overlap_count(candidate: &Span, buffer_minutes: u32, bookings: &[ExistingBooking]) -> u32 {
    let buffer_ms = buffer_minutes as i64 * MS_PER_MINUTE;
    bookings
        .iter()
        .filter(|b| {
            let effective = Span::new(b.span.start, b.span.end + buffer_ms);
            effective.overlaps(candidate)
        })
        .count() as u32
}

fn fits_open_window(local_time: NaiveTime, duration_minutes: u32, hours: &EffectiveDayHours) -> bool {
    if !hours.open {
        return false;
    }
    let (local_end, wrap) =
        local_time.overflowing_add_signed(Duration::minutes(duration_minutes as i64));
    wrap == 0 && hours.start <= local_time && local_end <= hours.end
}

fn intersects_break(local_time: NaiveTime, duration_minutes: u32, hours: &EffectiveDayHours) -> bool {
    let Some((bs, be)) = hours.break_window() else {
        return false;
    };
    let (local_end, wrap) =
        local_time.overflowing_add_signed(Duration::minutes(duration_minutes as i64));
    if wrap != 0 {
        return false; // already rejected as outside the window
    }
    local_time < be && bs < local_end
}
