use chrono::{Duration, NaiveTime};

use crate::model::EffectiveDayHours;

use super::SlotError;

/// Supported stepping intervals.
const VALID_INTERVALS: [u32; 3] = [15, 30, 60];

/// Enumerate candidate slot start times within the effective open window.
///
/// Steps from `start` by `interval_minutes`. A candidate is kept only when
/// the full appointment duration fits before `end`, and never when the start
/// itself falls inside the break window. A booking may at most *span* the
/// break (the evaluator's concern), never begin during it.
pub fn generate(
    hours: &EffectiveDayHours,
    interval_minutes: u32,
    duration_minutes: u32,
) -> Result<Vec<NaiveTime>, SlotError> {
    if !VALID_INTERVALS.contains(&interval_minutes) {
        return Err(SlotError::Configuration(format!(
            "interval must be one of {VALID_INTERVALS:?} minutes, got {interval_minutes}"
        )));
    }
    if duration_minutes == 0 {
        return Err(SlotError::Configuration(
            "appointment duration must be positive".into(),
        ));
    }
    if !hours.open {
        return Ok(Vec::new());
    }

    let step = Duration::minutes(interval_minutes as i64);
    let duration = Duration::minutes(duration_minutes as i64);
    let mut out = Vec::new();
    let mut cur = hours.start;

    loop {
        // NaiveTime arithmetic wraps at midnight; a wrap means the slot or
        // the next step has left the day.
        let (slot_end, wrap) = cur.overflowing_add_signed(duration);
        if wrap != 0 || slot_end > hours.end {
            break;
        }
        let in_break = hours
            .break_window()
            .is_some_and(|(bs, be)| bs <= cur && cur < be);
        if !in_break {
            out.push(cur);
        }
        let (next, wrap) = cur.overflowing_add_signed(step);
        if wrap != 0 {
            break;
        }
        cur = next;
    }

    Ok(out)
}
