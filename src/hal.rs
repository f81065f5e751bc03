//! Capability adapters over `embedded-hal` and `smart-leds` peripherals.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use smart_leds::{RGB8, SmartLedsWrite};

use crate::capability::{Delay, OnOff};
use crate::error::LedError;

/// Pin level that lights the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// LED is wired between the pin and ground
    ActiveHigh,
    /// LED is wired between the supply and the pin
    ActiveLow,
}

/// LED on a GPIO output pin
pub struct PinSwitch<P> {
    pin: Mutex<RefCell<P>>,
    polarity: Polarity,
}

impl<P: OutputPin + Send> PinSwitch<P> {
    pub const fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin: Mutex::new(RefCell::new(pin)),
            polarity,
        }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin.into_inner().into_inner()
    }

    fn drive(&self, lit: bool) -> Result<(), LedError> {
        let high = lit == (self.polarity == Polarity::ActiveHigh);
        critical_section::with(|cs| {
            let mut pin = self.pin.borrow(cs).borrow_mut();
            let result = if high { pin.set_high() } else { pin.set_low() };
            result.map_err(|_| LedError::Generic)
        })
    }
}

impl<P: OutputPin + Send> OnOff for PinSwitch<P> {
    fn turn_on(&self) -> Result<(), LedError> {
        self.drive(true)
    }

    fn turn_off(&self) -> Result<(), LedError> {
        self.drive(false)
    }
}

/// Single addressable LED (WS2812 and friends)
///
/// Turning on writes the configured color, turning off writes black.
pub struct SmartLedSwitch<W> {
    writer: Mutex<RefCell<W>>,
    color: RGB8,
}

impl<W> SmartLedSwitch<W>
where
    W: SmartLedsWrite<Color = RGB8> + Send,
{
    pub const fn new(writer: W, color: RGB8) -> Self {
        Self {
            writer: Mutex::new(RefCell::new(writer)),
            color,
        }
    }

    /// Color written when the LED is turned on
    pub const fn color(&self) -> RGB8 {
        self.color
    }

    /// Give the writer back
    pub fn release(self) -> W {
        self.writer.into_inner().into_inner()
    }

    fn write(&self, color: RGB8) -> Result<(), LedError> {
        critical_section::with(|cs| {
            self.writer
                .borrow(cs)
                .borrow_mut()
                .write(core::iter::once(color))
                .map_err(|_| LedError::Generic)
        })
    }
}

impl<W> OnOff for SmartLedSwitch<W>
where
    W: SmartLedsWrite<Color = RGB8> + Send,
{
    fn turn_on(&self) -> Result<(), LedError> {
        self.write(self.color)
    }

    fn turn_off(&self) -> Result<(), LedError> {
        self.write(RGB8::default())
    }
}

/// Blocking delay on a HAL timer
///
/// The timer is taken out of the adapter for the duration of a delay, so
/// interrupts stay enabled while waiting. A second task asking for a delay
/// at the same time spins until the timer is handed back, so one adapter can
/// serve every driver of a handler.
pub struct HalDelay<D> {
    timer: Mutex<Cell<Option<D>>>,
    isr_probe: Option<fn() -> bool>,
}

impl<D: DelayNs + Send> HalDelay<D> {
    pub const fn new(timer: D) -> Self {
        Self {
            timer: Mutex::new(Cell::new(Some(timer))),
            isr_probe: None,
        }
    }

    /// Use `probe` to detect interrupt context
    ///
    /// On Cortex-M this is typically a check of the active vector.
    #[must_use]
    pub fn with_isr_probe(mut self, probe: fn() -> bool) -> Self {
        self.isr_probe = Some(probe);
        self
    }
}

impl<D: DelayNs + Send> Delay for HalDelay<D> {
    fn delay_ms(&self, duration_ms: u32) -> Result<(), LedError> {
        let mut timer = loop {
            if let Some(timer) = critical_section::with(|cs| self.timer.borrow(cs).take()) {
                break timer;
            }
            core::hint::spin_loop();
        };
        timer.delay_ms(duration_ms);
        critical_section::with(|cs| self.timer.borrow(cs).set(Some(timer)));
        Ok(())
    }

    fn in_isr_context(&self) -> bool {
        self.isr_probe.is_some_and(|probe| probe())
    }
}
