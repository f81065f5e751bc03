//! Capabilities consumed by the driver and the handler
//!
//! Hardware and RTOS services are injected as trait objects, so the core
//! never touches registers or kernel primitives directly. All traits take
//! `&self` and require `Sync`: drivers and handlers are shared between
//! tasks, and implementations provide their own interior mutability.

use crate::error::LedError;
use crate::queue::ControlRequest;

/// Switches a single physical LED
pub trait OnOff: Sync {
    /// Turn the LED on
    fn turn_on(&self) -> Result<(), LedError>;

    /// Turn the LED off
    fn turn_off(&self) -> Result<(), LedError>;
}

/// Millisecond time source
pub trait Time: Sync {
    /// Current time in milliseconds, wrapping at `u32::MAX`
    fn get_time_ms(&self) -> Result<u32, LedError>;
}

/// Blocking delay provided by the scheduler
pub trait Delay: Sync {
    /// Block the calling task for at least `duration_ms` milliseconds
    fn delay_ms(&self, duration_ms: u32) -> Result<(), LedError>;

    /// Returns `true` when called from interrupt context
    ///
    /// Blocking control is refused in that case.
    fn in_isr_context(&self) -> bool {
        false
    }
}

/// Mutual exclusion between tasks
///
/// Calls are used in strict `enter`/`exit` pairs and are never nested by
/// this crate. Prefer [`CriticalGuard`] over calling them directly.
pub trait CriticalSection: Sync {
    /// Block other tasks from entering until [`CriticalSection::exit`]
    fn enter(&self) -> Result<(), LedError>;

    /// Leave a section entered with [`CriticalSection::enter`]
    fn exit(&self) -> Result<(), LedError>;
}

/// Message queue reserved for asynchronous control
pub trait Queue: Sync {
    /// Prepare the queue to hold up to `depth` requests
    fn create(&self, depth: usize) -> Result<(), LedError>;

    /// Enqueue a request, waiting at most `timeout_ms`
    fn put(&self, request: ControlRequest, timeout_ms: u32) -> Result<(), LedError>;

    /// Dequeue a request, waiting at most `timeout_ms`
    fn get(&self, timeout_ms: u32) -> Result<ControlRequest, LedError>;

    /// Release the queue
    fn delete(&self) -> Result<(), LedError>;
}

/// Scoped critical section
///
/// Entering happens on construction. [`CriticalGuard::exit`] leaves the
/// section and reports the result; a guard dropped without `exit` (early
/// return, `?`) still leaves the section and discards the status.
pub struct CriticalGuard<'a> {
    section: Option<&'a dyn CriticalSection>,
}

impl<'a> CriticalGuard<'a> {
    /// Enter `section`, or create a no-op guard when there is none
    pub fn enter(section: Option<&'a dyn CriticalSection>) -> Result<Self, LedError> {
        if let Some(section) = section {
            section.enter()?;
        }
        Ok(Self { section })
    }

    /// Leave the critical section
    pub fn exit(mut self) -> Result<(), LedError> {
        match self.section.take() {
            Some(section) => section.exit(),
            None => Ok(()),
        }
    }
}

impl Drop for CriticalGuard<'_> {
    fn drop(&mut self) {
        if let Some(section) = self.section.take() {
            let _ = section.exit();
        }
    }
}
