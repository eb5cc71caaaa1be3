use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Malformed date/time string or local time unresolvable in the zone.
    /// Never coerced into a wrong instant.
    InvalidTime(String),
    /// Structurally invalid hours or interval configuration.
    Configuration(String),
    /// Referenced organization/facility/appointment-type missing.
    NotFound(Ulid),
}

impl std::fmt::Display for SlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotError::InvalidTime(msg) => write!(f, "invalid time: {msg}"),
            SlotError::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            SlotError::NotFound(id) => write!(f, "not found: {id}"),
        }
    }
}

impl std::error::Error for SlotError {}
