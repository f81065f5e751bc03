//! Single LED driver
//!
//! A driver binds one [`OnOff`] capability and executes blink requests on it.
//! It starts zero-valued (so it can live in a `static`) and becomes usable
//! only after [`LedDriver::instantiate`] succeeded.

use core::cell::RefCell;

use critical_section::Mutex;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::blink::{self, BlinkParams};
use crate::capability::{Delay, OnOff};
use crate::error::{LedError, Unavailable};

struct DriverState<'a> {
    initialized: bool,
    /// Set while instantiation or a control call is running
    busy: bool,
    params: BlinkParams,
    switch: Option<&'a dyn OnOff>,
}

/// Driver of a single blinking LED
pub struct LedDriver<'a> {
    state: Mutex<RefCell<DriverState<'a>>>,
}

impl<'a> LedDriver<'a> {
    /// Create a driver in the not-initialized state
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(DriverState {
                initialized: false,
                busy: false,
                params: BlinkParams::ZERO,
                switch: None,
            })),
        }
    }

    /// Bind `switch` to this driver and turn the LED off
    ///
    /// On success the driver holds [`BlinkParams::DEFAULT`]. If turning the
    /// LED off fails, the switch is unbound again and the driver stays
    /// not-initialized.
    pub fn instantiate(&self, switch: &'a dyn OnOff) -> Result<(), LedError> {
        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            if state.initialized {
                return Err(LedError::unavailable(Unavailable::AlreadyInitialized));
            }
            if state.busy {
                return Err(LedError::unavailable(Unavailable::Busy));
            }
            state.switch = Some(switch);
            state.params = BlinkParams::DEFAULT;
            state.busy = true;
            Ok(())
        })?;

        let result = switch.turn_off();

        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            state.busy = false;
            if result.is_ok() {
                state.initialized = true;
            } else {
                state.switch = None;
                state.params = BlinkParams::ZERO;
            }
        });

        #[cfg(feature = "esp32-log")]
        if let Err(err) = result {
            println!("[LedDriver.instantiate] turning LED off failed: {}", err);
        }

        result
    }

    /// Configure the LED and execute the request
    ///
    /// Duty `0` turns the LED off and duty `10` turns it on, each with a single
    /// call. Any other duty runs `count` blink cycles of `period_ms`, blocking
    /// the caller on `delay` for the whole sequence.
    ///
    /// Validation happens before anything is stored: a rejected request
    /// leaves the previous parameters untouched. A second control call on the
    /// same driver while a sequence is running fails with
    /// [`Unavailable::Busy`].
    pub fn control(
        &self,
        delay: &dyn Delay,
        period_ms: u32,
        count: u32,
        duty: u32,
    ) -> Result<(), LedError> {
        let (switch, params) = critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            let switch = match state.switch {
                Some(switch) if state.initialized => switch,
                _ => return Err(LedError::unavailable(Unavailable::NotInitialized)),
            };
            if delay.in_isr_context() {
                return Err(LedError::IsrContext);
            }
            let params = BlinkParams::new(period_ms, count, duty)?;
            if state.busy {
                return Err(LedError::unavailable(Unavailable::Busy));
            }
            state.params = params;
            state.busy = true;
            Ok((switch, params))
        })
        .inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!(
                "[LedDriver.control] rejected period:{} count:{} duty:{}: {}",
                period_ms, count, duty, _err
            );
        })?;

        let _claim = BusyClaim { driver: self };
        blink::execute(switch, delay, params)
    }

    /// Check if the driver was instantiated
    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).borrow().initialized)
    }

    /// Check if a control call is running on this driver
    pub fn is_busy(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).borrow().busy)
    }

    /// Parameters of the last accepted request
    pub fn params(&self) -> BlinkParams {
        critical_section::with(|cs| self.state.borrow(cs).borrow().params)
    }
}

impl Default for LedDriver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the busy flag of a driver when the control call returns
struct BusyClaim<'d, 'a> {
    driver: &'d LedDriver<'a>,
}

impl Drop for BusyClaim<'_, '_> {
    fn drop(&mut self) {
        critical_section::with(|cs| {
            self.driver.state.borrow(cs).borrow_mut().busy = false;
        });
    }
}
