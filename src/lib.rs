//! Loading-dock appointment slot calculator.
//!
//! Given a calendar date, a facility, and an appointment type, produce the
//! bookable time slots for that day: hierarchical hours resolution,
//! holiday/closure suppression, DST-correct wall-clock conversion, break
//! exclusion, and overlap-counted capacity. Pure and stateless: all inputs
//! arrive as immutable snapshots, and booking commit-time re-validation is
//! the caller's job.

pub mod calc;
pub mod model;
pub mod observability;
pub mod store;
pub mod tz;

pub use calc::{
    SlotError, SlotStatus, compute_day, compute_window, day_slots, day_window, first_available,
};
pub use model::{
    AppointmentType, DateRange, DaySlots, EffectiveDayHours, ExistingBooking, Facility, Ms,
    Organization, Slot, SlotQuery, Span, UnavailableReason, WeekHours, WeekdayHours,
};
pub use store::{BookingStore, ConfigStore, MemoryBookings, MemoryConfig};
