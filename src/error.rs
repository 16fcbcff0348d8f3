//! Error types for the mDNIe control core.

/// Errors that can occur while driving the mDNIe engine.
#[derive(Debug, thiserror::Error)]
pub enum MdnieError {
    /// A setter received a value outside its domain.
    #[error("invalid {field} value {value} (valid range is 0..{max})")]
    InvalidRange {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Exclusive upper bound of the valid range.
        max: i64,
    },

    /// An operation that needs panel I/O ran while the panel is off.
    #[error("panel is disabled")]
    DeviceDisabled,

    /// The panel link reported a transfer failure.
    #[error("panel link error: {0}")]
    Io(#[from] std::io::Error),

    /// The calibration coordinate source is missing or unparseable.
    #[error("calibration coordinate unavailable")]
    CalibrationUnavailable,

    /// No tuning table matches the current device state.
    #[error("no tuning table selected")]
    NoTableSelected,

    /// A table carries an empty command sequence and cannot be written.
    #[error("table {name} has an empty command sequence")]
    IncompleteTable {
        /// Name of the rejected table.
        name: String,
    },

    /// A tuning override file name exceeds the supported length.
    #[error("tuning file name too long ({0} bytes)")]
    NameTooLong(usize),
}
