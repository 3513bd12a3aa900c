//! Errors raised while translating a struct across the sandbox boundary.

/// A translation failure. These are always caused by a malformed sandbox side (bad tag, out of
/// bounds length, width mismatch) — never by the native side, which the bridge controls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarshalError {
    /// An event's `type_id` did not match any of the core event space's `[0..12]` tags.
    #[error("unknown event type id {0}")]
    UnknownEventType(u16),
    /// A sysex or stream payload exceeded its hard cap.
    #[error("payload of {len} bytes exceeds the {max} byte cap")]
    PayloadTooLarge { len: usize, max: usize },
    /// A cookie or other pointer-sized value did not fit in the sandbox's word width.
    #[error("host pointer does not fit in a {0}-bit sandbox word")]
    PointerWidth(u8),
    /// Reading or writing sandbox memory failed.
    #[error(transparent)]
    Instance(#[from] wclap_engine::InstanceError),
    /// A byte buffer read back from the sandbox was too short for the struct being decoded.
    #[error("truncated wire buffer: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}
