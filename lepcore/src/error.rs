use thiserror::Error;

/// Errors raised by the checked constructors of the core.
///
/// The per-event operations themselves never fail; misaligned inputs are
/// caller contract violations and are only caught by debug assertions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LepError {
    #[error("VID field {field} has level {value}, expected 0..=7")]
    FieldOutOfRange { field: usize, value: u8 },

    #[error("VID level {0} is out of range, expected 0..=7")]
    LevelOutOfRange(u8),
}
