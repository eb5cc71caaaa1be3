use tracing::warn;

use crate::model::{EffectiveDayHours, WeekHours, WeekdayHours};
use crate::observability;

/// Merge org → facility → appointment-type hours for one weekday into a
/// complete effective record.
///
/// Field-by-field override: each `Some` field at a lower level replaces the
/// value inherited from above; unset fields carry forward. `type_week` is
/// `None` unless the appointment type's override flag is set. Absence of
/// configuration at every level means closed.
pub fn resolve_hours(
    weekday: usize,
    org_week: &WeekHours,
    facility_week: &WeekHours,
    type_week: Option<&WeekHours>,
) -> EffectiveDayHours {
    let mut merged = WeekdayHours::default();
    merge_layer(&mut merged, org_week[weekday].as_ref());
    merge_layer(&mut merged, facility_week[weekday].as_ref());
    if let Some(tw) = type_week {
        merge_layer(&mut merged, tw[weekday].as_ref());
    }
    sanitize(merged)
}

fn merge_layer(acc: &mut WeekdayHours, layer: Option<&WeekdayHours>) {
    let Some(layer) = layer else { return };
    if layer.open.is_some() {
        acc.open = layer.open;
    }
    if layer.start.is_some() {
        acc.start = layer.start;
    }
    if layer.end.is_some() {
        acc.end = layer.end;
    }
    if layer.break_start.is_some() {
        acc.break_start = layer.break_start;
    }
    if layer.break_end.is_some() {
        acc.break_end = layer.break_end;
    }
}

/// Turn the merged record into a complete `EffectiveDayHours`, recovering
/// shape defects locally: an unusable open window closes the day, an
/// unusable break is dropped while the day stays open.
fn sanitize(merged: WeekdayHours) -> EffectiveDayHours {
    if !merged.open.unwrap_or(false) {
        return EffectiveDayHours::closed();
    }
    let (Some(start), Some(end)) = (merged.start, merged.end) else {
        warn!(?merged, "open day without start/end, treating as closed");
        metrics::counter!(observability::CONFIG_DEFECTS_TOTAL).increment(1);
        return EffectiveDayHours::closed();
    };
    if start >= end {
        warn!(%start, %end, "open window is empty or inverted, treating as closed");
        metrics::counter!(observability::CONFIG_DEFECTS_TOTAL).increment(1);
        return EffectiveDayHours::closed();
    }

    let (break_start, break_end) = match (merged.break_start, merged.break_end) {
        (Some(bs), Some(be)) if bs < be && start <= bs && be <= end => (Some(bs), Some(be)),
        (None, None) => (None, None),
        (bs, be) => {
            // Half-specified or outside the open window: ignore the break
            // rather than closing the day.
            warn!(?bs, ?be, %start, %end, "unusable break window, ignoring");
            metrics::counter!(observability::CONFIG_DEFECTS_TOTAL).increment(1);
            (None, None)
        }
    };

    EffectiveDayHours {
        open: true,
        start,
        end,
        break_start,
        break_end,
    }
}
