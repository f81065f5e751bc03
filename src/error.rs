//! Status taxonomy shared by the driver and the handler.

use core::fmt;

/// Reason a resource could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unavailable {
    /// Instance was already instantiated
    AlreadyInitialized,
    /// Instance has not been instantiated yet
    NotInitialized,
    /// Handler registry has no free slot
    RegistryFull,
    /// Another task is currently using the instance
    Busy,
}

/// Error returned by every fallible operation of this crate
///
/// The numeric codes are stable and mirror the status values exposed
/// to C callers of the board-support layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Failure without a more specific kind
    Generic,
    /// Operation did not complete in time
    Timeout,
    /// Resource is not available, see [`Unavailable`]
    ResourceUnavailable(Unavailable),
    /// Argument out of range
    InvalidParameter,
    /// Requested storage exceeds the compile-time capacity
    OutOfMemory,
    /// Operation is not allowed in interrupt context
    IsrContext,
}

impl LedError {
    /// Numeric status code, `0` is reserved for success
    pub const fn code(self) -> u8 {
        match self {
            Self::Generic => 1,
            Self::Timeout => 2,
            Self::ResourceUnavailable(_) => 3,
            Self::InvalidParameter => 4,
            Self::OutOfMemory => 5,
            Self::IsrContext => 6,
        }
    }

    /// Shorthand for [`LedError::ResourceUnavailable`]
    pub const fn unavailable(reason: Unavailable) -> Self {
        Self::ResourceUnavailable(reason)
    }
}

impl From<LedError> for u8 {
    fn from(err: LedError) -> Self {
        err.code()
    }
}

/// Converts an operation result into its numeric status code
pub fn status_code(result: Result<(), LedError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::AlreadyInitialized => "already initialized",
            Self::NotInitialized => "not initialized",
            Self::RegistryFull => "registry full",
            Self::Busy => "busy",
        };
        f.write_str(reason)
    }
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("generic error"),
            Self::Timeout => f.write_str("timeout"),
            Self::ResourceUnavailable(reason) => write!(f, "resource unavailable: {reason}"),
            Self::InvalidParameter => f.write_str("invalid parameter"),
            Self::OutOfMemory => f.write_str("out of memory"),
            Self::IsrContext => f.write_str("not allowed in ISR context"),
        }
    }
}

impl core::error::Error for LedError {}
