use chrono::NaiveDate;

use crate::model::{DateRange, EffectiveDayHours};

/// Which level forced the day closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureKind {
    OrgHoliday,
    FacilityClosure,
    TypeBlackout,
}

/// First closure matching the date, checked top-down. Org holidays and type
/// blackouts are exact dates; facility closures are inclusive ranges.
pub fn closure_match(
    date: NaiveDate,
    org_holidays: &[NaiveDate],
    facility_closures: &[DateRange],
    type_blackouts: &[NaiveDate],
) -> Option<ClosureKind> {
    if org_holidays.contains(&date) {
        return Some(ClosureKind::OrgHoliday);
    }
    if facility_closures.iter().any(|r| r.contains(date)) {
        return Some(ClosureKind::FacilityClosure);
    }
    if type_blackouts.contains(&date) {
        return Some(ClosureKind::TypeBlackout);
    }
    None
}

/// Force the day closed on any closure match. Closures are final: no
/// lower-priority "open" setting survives them. Idempotent.
pub fn apply_closures(
    hours: EffectiveDayHours,
    date: NaiveDate,
    org_holidays: &[NaiveDate],
    facility_closures: &[DateRange],
    type_blackouts: &[NaiveDate],
) -> EffectiveDayHours {
    if closure_match(date, org_holidays, facility_closures, type_blackouts).is_some() {
        EffectiveDayHours::closed()
    } else {
        hours
    }
}
