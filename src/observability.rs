// ── Calculator metrics ──────────────────────────────────────────

/// Counter: day computations served.
pub const DAYS_COMPUTED_TOTAL: &str = "dockslot_days_computed_total";

/// Counter: candidate slots produced across all computations.
pub const SLOTS_GENERATED_TOTAL: &str = "dockslot_slots_generated_total";

/// Counter: configuration defects recovered locally (day closed or break
/// dropped) instead of failing the computation.
pub const CONFIG_DEFECTS_TOTAL: &str = "dockslot_config_defects_total";
