//! Blink parameters and the duty-cycle sequence.

use crate::capability::{Delay, OnOff};
use crate::error::LedError;

/// Longest accepted blink period
pub const MAX_PERIOD_MS: u32 = 10_000;

/// Largest accepted number of blink cycles per control call
pub const MAX_COUNT: u32 = 1_000;

/// Duty bucket that keeps the LED off
pub const DUTY_OFF: u8 = 0;

/// Duty bucket that keeps the LED on
pub const DUTY_FULL: u8 = 10;

/// Period applied by driver instantiation
pub const DEFAULT_PERIOD_MS: u32 = 1_000;

/// What a control call does with the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkMode {
    /// Turn off once
    Off,
    /// Turn on once
    On,
    /// Run the blink sequence
    Blink,
}

/// Validated blink configuration of a single LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkParams {
    period_ms: u32,
    count: u32,
    duty: u8,
}

impl BlinkParams {
    /// Zero-valued parameters of a driver that was never instantiated
    pub const ZERO: Self = Self {
        period_ms: 0,
        count: 0,
        duty: DUTY_OFF,
    };

    /// Parameters applied on instantiation: 1 s period, no cycles, LED off
    pub const DEFAULT: Self = Self {
        period_ms: DEFAULT_PERIOD_MS,
        count: 0,
        duty: DUTY_OFF,
    };

    /// Create validated parameters
    ///
    /// Fails with [`LedError::InvalidParameter`] if any value is out of range.
    pub fn new(period_ms: u32, count: u32, duty: u32) -> Result<Self, LedError> {
        let duty = match u8::try_from(duty) {
            Ok(duty) if duty <= DUTY_FULL => duty,
            _ => return Err(LedError::InvalidParameter),
        };
        if period_ms > MAX_PERIOD_MS || count > MAX_COUNT {
            return Err(LedError::InvalidParameter);
        }
        Ok(Self {
            period_ms,
            count,
            duty,
        })
    }

    pub const fn period_ms(self) -> u32 {
        self.period_ms
    }

    pub const fn count(self) -> u32 {
        self.count
    }

    /// Duty bucket, 0..=10
    pub const fn duty(self) -> u8 {
        self.duty
    }

    /// Duty cycle in percent
    pub const fn duty_percent(self) -> u8 {
        self.duty * 10
    }

    pub const fn mode(self) -> BlinkMode {
        match self.duty {
            DUTY_OFF => BlinkMode::Off,
            DUTY_FULL => BlinkMode::On,
            _ => BlinkMode::Blink,
        }
    }

    /// Time the LED stays on in each cycle
    pub const fn on_time_ms(self) -> u32 {
        // duty <= 10 and period <= 10_000, the product fits in u32
        self.duty as u32 * self.period_ms / DUTY_FULL as u32
    }

    /// Time the LED stays off in each cycle
    pub const fn off_time_ms(self) -> u32 {
        self.period_ms - self.on_time_ms()
    }

    /// Total time a blink sequence with these parameters blocks the caller
    pub const fn sequence_ms(self) -> u32 {
        match self.mode() {
            BlinkMode::Blink => self.count * self.period_ms,
            BlinkMode::Off | BlinkMode::On => 0,
        }
    }
}

impl Default for BlinkParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Apply `params` to the LED
///
/// Blocks for [`BlinkParams::sequence_ms`]. The first failing capability
/// call aborts the sequence and its error is returned.
pub(crate) fn execute(
    switch: &dyn OnOff,
    delay: &dyn Delay,
    params: BlinkParams,
) -> Result<(), LedError> {
    match params.mode() {
        BlinkMode::Off => switch.turn_off(),
        BlinkMode::On => switch.turn_on(),
        BlinkMode::Blink => {
            let on_time = params.on_time_ms();
            let off_time = params.off_time_ms();
            for _ in 0..params.count() {
                switch.turn_on()?;
                delay.delay_ms(on_time)?;
                switch.turn_off()?;
                delay.delay_ms(off_time)?;
            }
            Ok(())
        }
    }
}
