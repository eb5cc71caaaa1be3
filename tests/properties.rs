use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use ulid::Ulid;

use dockslot::calc::{apply_closures, evaluate, generate, overlap_count, resolve_hours};
use dockslot::{
    AppointmentType, EffectiveDayHours, ExistingBooking, Facility, Organization, Span,
    UnavailableReason, WeekHours, WeekdayHours, compute_day,
};

const H: i64 = 3_600_000;
const M: i64 = 60_000;

fn t(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap()
}

fn atype(max_concurrent: u32, may_span_break: bool, duration_minutes: u32) -> AppointmentType {
    AppointmentType {
        id: Ulid::new(),
        facility_id: Ulid::new(),
        duration_minutes,
        buffer_minutes: 0,
        max_concurrent,
        may_span_break,
        hours_override: false,
        hours: Default::default(),
        blackouts: Vec::new(),
    }
}

fn booking(start: i64, end: i64) -> ExistingBooking {
    ExistingBooking {
        id: Ulid::new(),
        facility_id: Ulid::new(),
        appointment_type_id: Ulid::new(),
        span: Span::new(start, end),
    }
}

fn open_hours(start_min: u32, end_min: u32) -> EffectiveDayHours {
    EffectiveDayHours {
        open: true,
        start: t(start_min),
        end: t(end_min),
        break_start: None,
        break_end: None,
    }
}

prop_compose! {
    /// Random bookings loosely clustered around a 10:00–11:00 candidate.
    fn bookings_near_candidate(max_count: usize)
        (count in 0..max_count,
         starts in prop::collection::vec(6 * 60..14 * 60, max_count))
        -> Vec<ExistingBooking>
    {
        starts[..count]
            .iter()
            .map(|&m| booking(m as i64 * M, (m as i64 + 60) * M))
            .collect()
    }
}

proptest! {
    // Remaining capacity stays in [0, N] and never increases when one more
    // overlapping booking is added.
    #[test]
    fn capacity_monotonic_and_bounded(
        max_concurrent in 1u32..6,
        mut bookings in bookings_near_candidate(8),
    ) {
        let hours = open_hours(8 * 60, 17 * 60);
        let a = atype(max_concurrent, true, 60);
        let candidate = Span::new(10 * H, 11 * H);

        let before = evaluate(t(10 * 60), candidate, &a, &hours, false, &bookings);
        prop_assert!(before.remaining_capacity <= max_concurrent);

        bookings.push(booking(10 * H + 30 * M, 11 * H + 30 * M));
        let after = evaluate(t(10 * 60), candidate, &a, &hours, false, &bookings);

        prop_assert!(after.remaining_capacity <= before.remaining_capacity);
        prop_assert!(after.remaining_capacity <= max_concurrent);
    }

    // Overlap counting is insensitive to booking order.
    #[test]
    fn overlap_count_order_independent(mut bookings in bookings_near_candidate(8)) {
        let candidate = Span::new(10 * H, 11 * H);
        let forward = overlap_count(&candidate, 0, &bookings);
        bookings.reverse();
        prop_assert_eq!(overlap_count(&candidate, 0, &bookings), forward);
    }

    // Every generated slot fits entirely inside the open window.
    #[test]
    fn slots_fit_open_window(
        start_min in 0u32..12 * 60,
        len_min in 60u32..12 * 60,
        interval in prop::sample::select(vec![15u32, 30, 60]),
        duration in 15u32..120,
    ) {
        let end_min = (start_min + len_min).min(24 * 60 - 1);
        let hours = open_hours(start_min, end_min);
        let slots = generate(&hours, interval, duration).unwrap();
        for s in slots {
            prop_assert!(s >= hours.start);
            let end = s.overflowing_add_signed(chrono::Duration::minutes(duration as i64));
            prop_assert_eq!(end.1, 0);
            prop_assert!(end.0 <= hours.end);
        }
    }

    // No slot ever starts inside the break window.
    #[test]
    fn no_start_inside_break(
        interval in prop::sample::select(vec![15u32, 30, 60]),
        duration in 15u32..90,
        break_start in 10 * 60u32..13 * 60,
        break_len in 15u32..120,
    ) {
        let mut hours = open_hours(8 * 60, 17 * 60);
        hours.break_start = Some(t(break_start));
        hours.break_end = Some(t((break_start + break_len).min(17 * 60)));
        let (bs, be) = hours.break_window().unwrap();

        let slots = generate(&hours, interval, duration).unwrap();
        for s in slots {
            prop_assert!(!(bs <= s && s < be), "slot {s} starts inside break");
        }
    }

    // With may_span_break=false no break-crossing slot is available; with
    // it true the same setup leaves every generated slot bookable.
    #[test]
    fn break_span_toggle(duration in 30u32..120) {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(); // Monday
        let mut week: WeekHours = Default::default();
        week[1] = Some(WeekdayHours {
            open: Some(true),
            start: Some(t(8 * 60)),
            end: Some(t(17 * 60)),
            break_start: Some(t(12 * 60)),
            break_end: Some(t(13 * 60)),
        });
        let org = Organization { id: Ulid::new(), hours: week, holidays: Vec::new() };
        let facility = Facility {
            id: Ulid::new(),
            organization_id: org.id,
            timezone: "America/New_York".to_string(),
            hours: Default::default(),
            closures: Vec::new(),
        };
        let mut blocked = atype(1, false, duration);
        blocked.facility_id = facility.id;
        let mut allowed = blocked.clone();
        allowed.may_span_break = true;

        let strict = compute_day(date, &org, &facility, &blocked, 30, &[]).unwrap();
        for slot in &strict {
            let end = slot.local_time + chrono::Duration::minutes(duration as i64);
            let crosses = slot.local_time < t(13 * 60) && t(12 * 60) < end;
            if crosses {
                prop_assert!(!slot.available);
                prop_assert_eq!(slot.reason, Some(UnavailableReason::BreakTime));
            }
        }

        let relaxed = compute_day(date, &org, &facility, &allowed, 30, &[]).unwrap();
        prop_assert!(relaxed.iter().all(|s| s.available));
    }

    // Absence of configuration at every level means closed.
    #[test]
    fn unconfigured_is_closed(weekday in 0usize..7) {
        let empty: WeekHours = Default::default();
        let eff = resolve_hours(weekday, &empty, &empty, None);
        prop_assert!(!eff.open);
    }

    // A field set only at the appointment-type level always wins.
    #[test]
    fn type_level_field_wins(
        org_start in 0u32..12 * 60,
        fac_start in 0u32..12 * 60,
        typ_start in 0u32..12 * 60,
        weekday in 0usize..7,
    ) {
        let mk = |start: u32| {
            let mut week: WeekHours = Default::default();
            week[weekday] = Some(WeekdayHours {
                open: Some(true),
                start: Some(t(start)),
                end: Some(t(23 * 60)),
                break_start: None,
                break_end: None,
            });
            week
        };
        let eff = resolve_hours(weekday, &mk(org_start), &mk(fac_start), Some(&mk(typ_start)));
        prop_assert!(eff.open);
        prop_assert_eq!(eff.start, t(typ_start));
    }

    // Applying the closure filter twice changes nothing.
    #[test]
    fn closure_filter_idempotent(
        day_offset in 0i64..365,
        holiday_offsets in prop::collection::vec(0i64..365, 0..5),
    ) {
        let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let date = base + chrono::Duration::days(day_offset);
        let holidays: Vec<NaiveDate> = holiday_offsets
            .iter()
            .map(|&o| base + chrono::Duration::days(o))
            .collect();

        let hours = open_hours(8 * 60, 17 * 60);
        let once = apply_closures(hours, date, &holidays, &[], &[]);
        let twice = apply_closures(once, date, &holidays, &[], &[]);
        prop_assert_eq!(once, twice);
    }
}
