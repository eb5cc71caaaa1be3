use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only instant type.
pub type Ms = i64;

pub const MS_PER_MINUTE: Ms = 60_000;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    /// Strict open-interval overlap: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

/// Inclusive calendar-date range (facility closures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// One weekday's raw hours at a single configuration level. Every field is
/// optional so a level can override a single field while inheriting the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayHours {
    pub open: Option<bool>,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl WeekdayHours {
    /// True when no field is set: the level has nothing to say for this day.
    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.break_start.is_none()
            && self.break_end.is_none()
    }
}

/// Weekly hours, indexed by weekday 0–6 with Sunday = 0.
pub type WeekHours = [Option<WeekdayHours>; 7];

/// Fully-merged hours for one (org, facility, type, weekday) combination.
/// Derived on every request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveDayHours {
    pub open: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl EffectiveDayHours {
    pub fn closed() -> Self {
        Self {
            open: false,
            start: NaiveTime::MIN,
            end: NaiveTime::MIN,
            break_start: None,
            break_end: None,
        }
    }

    /// Break window as a pair, only when both ends are present.
    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.break_start, self.break_end) {
            (Some(bs), Some(be)) => Some((bs, be)),
            _ => None,
        }
    }
}

// ── Configuration snapshots ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Ulid,
    pub hours: WeekHours,
    pub holidays: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: Ulid,
    pub organization_id: Ulid,
    /// IANA zone name, e.g. "America/New_York".
    pub timezone: String,
    pub hours: WeekHours,
    pub closures: Vec<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: Ulid,
    pub facility_id: Ulid,
    pub duration_minutes: u32,
    /// Dead time appended to each booking before the next can start.
    pub buffer_minutes: u32,
    /// Max concurrent bookings per slot (>= 1).
    pub max_concurrent: u32,
    /// Whether a booking's duration may span the facility break.
    pub may_span_break: bool,
    /// When false, `hours` is ignored and facility/org hours apply.
    pub hours_override: bool,
    pub hours: WeekHours,
    pub blackouts: Vec<NaiveDate>,
}

/// An already-confirmed booking, read-only input to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingBooking {
    pub id: Ulid,
    pub facility_id: Ulid,
    pub appointment_type_id: Ulid,
    pub span: Span,
}

// ── Calculator input / output ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuery {
    /// ISO-8601 calendar date in the facility's local zone.
    pub date: String,
    pub tenant: String,
    pub facility_id: Ulid,
    pub appointment_type_id: Ulid,
    pub interval_minutes: u32,
}

/// Why a slot cannot be booked. Part of the contract: callers render these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    OutsideHours,
    BreakTime,
    Closed,
    AtCapacity,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::OutsideHours => write!(f, "outside hours"),
            UnavailableReason::BreakTime => write!(f, "break time"),
            UnavailableReason::Closed => write!(f, "holiday/closure"),
            UnavailableReason::AtCapacity => write!(f, "at capacity"),
        }
    }
}

/// One candidate booking start within a day, annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub local_time: NaiveTime,
    pub instant: Ms,
    pub available: bool,
    pub remaining_capacity: u32,
    pub reason: Option<UnavailableReason>,
}

/// Per-day result for windowed queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}
