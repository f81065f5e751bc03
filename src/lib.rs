#![no_std]

pub mod blink;
pub mod capability;
pub mod driver;
pub mod error;
pub mod hal;
pub mod handler;
pub mod queue;
pub mod time;

pub use blink::{
    BlinkMode, BlinkParams, DEFAULT_PERIOD_MS, DUTY_FULL, DUTY_OFF, MAX_COUNT, MAX_PERIOD_MS,
};
pub use capability::{CriticalGuard, CriticalSection, Delay, OnOff, Queue, Time};
pub use driver::LedDriver;
pub use error::{LedError, Unavailable, status_code};
pub use hal::{HalDelay, PinSwitch, Polarity, SmartLedSwitch};
pub use handler::{DEFAULT_REGISTRY_CAPACITY, LedHandler, Profile};
pub use queue::{ControlRequest, StaticQueue};
pub use time::{EmbassyClock, EmbassyDelay};
