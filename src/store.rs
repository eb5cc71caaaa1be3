use dashmap::DashMap;
use ulid::Ulid;

use crate::model::{AppointmentType, ExistingBooking, Facility, Organization, Span};

// ── Consumed contracts ───────────────────────────────────────────

/// Configuration lookups, read-only from the calculator's perspective.
/// Implementations normalize whatever raw records they hold into the typed
/// snapshots before handing them out.
pub trait ConfigStore {
    fn organization(&self, tenant: &str, id: Ulid) -> Option<Organization>;
    fn facility(&self, tenant: &str, id: Ulid) -> Option<Facility>;
    fn appointment_type(&self, tenant: &str, id: Ulid) -> Option<AppointmentType>;
}

/// Booking lookups for overlap counting, read-only.
pub trait BookingStore {
    /// All bookings for the facility/appointment-type pair whose span
    /// overlaps the window.
    fn bookings_overlapping(
        &self,
        tenant: &str,
        facility_id: Ulid,
        appointment_type_id: Ulid,
        window: &Span,
    ) -> Vec<ExistingBooking>;
}

// ── In-memory implementations ────────────────────────────────────

#[derive(Default)]
struct TenantCatalog {
    organizations: DashMap<Ulid, Organization>,
    facilities: DashMap<Ulid, Facility>,
    appointment_types: DashMap<Ulid, AppointmentType>,
}

/// Tenant-scoped in-memory configuration store. Tenants are created lazily
/// on first insert and fully isolated from each other.
#[derive(Default)]
pub struct MemoryConfig {
    tenants: DashMap<String, TenantCatalog>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_organization(&self, tenant: &str, org: Organization) {
        self.tenants
            .entry(tenant.to_string())
            .or_default()
            .organizations
            .insert(org.id, org);
    }

    pub fn insert_facility(&self, tenant: &str, facility: Facility) {
        self.tenants
            .entry(tenant.to_string())
            .or_default()
            .facilities
            .insert(facility.id, facility);
    }

    pub fn insert_appointment_type(&self, tenant: &str, atype: AppointmentType) {
        self.tenants
            .entry(tenant.to_string())
            .or_default()
            .appointment_types
            .insert(atype.id, atype);
    }
}

impl ConfigStore for MemoryConfig {
    fn organization(&self, tenant: &str, id: Ulid) -> Option<Organization> {
        self.tenants
            .get(tenant)?
            .organizations
            .get(&id)
            .map(|e| e.value().clone())
    }

    fn facility(&self, tenant: &str, id: Ulid) -> Option<Facility> {
        self.tenants
            .get(tenant)?
            .facilities
            .get(&id)
            .map(|e| e.value().clone())
    }

    fn appointment_type(&self, tenant: &str, id: Ulid) -> Option<AppointmentType> {
        self.tenants
            .get(tenant)?
            .appointment_types
            .get(&id)
            .map(|e| e.value().clone())
    }
}

/// Tenant-scoped in-memory booking store, indexed by facility.
#[derive(Default)]
pub struct MemoryBookings {
    tenants: DashMap<String, DashMap<Ulid, Vec<ExistingBooking>>>,
}

impl MemoryBookings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tenant: &str, booking: ExistingBooking) {
        self.tenants
            .entry(tenant.to_string())
            .or_default()
            .entry(booking.facility_id)
            .or_default()
            .push(booking);
    }

    pub fn remove(&self, tenant: &str, booking_id: Ulid) -> Option<ExistingBooking> {
        let facilities = self.tenants.get(tenant)?;
        for mut entry in facilities.iter_mut() {
            if let Some(pos) = entry.value().iter().position(|b| b.id == booking_id) {
                return Some(entry.value_mut().remove(pos));
            }
        }
        None
    }
}

impl BookingStore for MemoryBookings {
    fn bookings_overlapping(
        &self,
        tenant: &str,
        facility_id: Ulid,
        appointment_type_id: Ulid,
        window: &Span,
    ) -> Vec<ExistingBooking> {
        let Some(facilities) = self.tenants.get(tenant) else {
            return Vec::new();
        };
        let Some(bookings) = facilities.get(&facility_id) else {
            return Vec::new();
        };
        bookings
            .iter()
            .filter(|b| b.appointment_type_id == appointment_type_id && b.span.overlaps(window))
            .copied()
            .collect()
    }
}
