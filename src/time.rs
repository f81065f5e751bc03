//! Time and delay capabilities backed by `embassy-time`.
//!
//! Requires an embassy time driver to be linked in (the target HAL or the
//! `std` driver on the host).

use embassy_time::{Duration, Instant, block_for};

use crate::capability::{Delay, Time};
use crate::error::LedError;

/// Millisecond clock reading [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Time for EmbassyClock {
    #[allow(clippy::cast_possible_truncation)]
    fn get_time_ms(&self) -> Result<u32, LedError> {
        // wraps after ~49 days of uptime
        Ok(Instant::now().as_millis() as u32)
    }
}

/// Busy-waiting delay on the embassy clock
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyDelay;

impl Delay for EmbassyDelay {
    fn delay_ms(&self, duration_ms: u32) -> Result<(), LedError> {
        block_for(Duration::from_millis(u64::from(duration_ms)));
        Ok(())
    }
}
