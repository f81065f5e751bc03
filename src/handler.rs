//! LED handler
//!
//! Owns the shared RTOS services and a bounded registry of [`LedDriver`]s.
//! Registration is serialized through the injected critical section; control
//! requests are validated here and executed by the driver with the injected
//! delay.

use core::cell::RefCell;
use core::ptr;

use critical_section::Mutex;
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::capability::{CriticalGuard, CriticalSection, Delay, Queue, Time};
use crate::driver::LedDriver;
use crate::error::{LedError, Unavailable};
use crate::queue::ControlRequest;

/// Registry capacity used when none is given
pub const DEFAULT_REGISTRY_CAPACITY: usize = 10;

/// Set of services a handler was instantiated with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Profile {
    /// Time, delay, queue and critical section provided by an RTOS
    Rtos,
    /// Blocking delay only, registry guarded by the global critical section
    BareMetal,
}

#[derive(Clone, Copy)]
struct Services<'a> {
    profile: Profile,
    delay: &'a dyn Delay,
    time: Option<&'a dyn Time>,
    queue: Option<&'a dyn Queue>,
    critical_section: Option<&'a dyn CriticalSection>,
}

struct HandlerState<'a, const N: usize> {
    /// `Some` once the handler is initialized
    services: Option<Services<'a>>,
    registry: Vec<&'a LedDriver<'a>, N>,
}

/// Handler of up to `N` LED drivers
///
/// The handler does not own the drivers, it keeps references to them in
/// registration order. Drivers cannot be removed.
pub struct LedHandler<'a, const N: usize = DEFAULT_REGISTRY_CAPACITY> {
    state: Mutex<RefCell<HandlerState<'a, N>>>,
}

impl<'a, const N: usize> LedHandler<'a, N> {
    /// Create a handler in the not-initialized state
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(HandlerState {
                services: None,
                registry: Vec::new(),
            })),
        }
    }

    /// Instantiate the handler with the full set of RTOS services
    pub fn instantiate(
        &self,
        time: &'a dyn Time,
        delay: &'a dyn Delay,
        queue: &'a dyn Queue,
        critical_section: &'a dyn CriticalSection,
    ) -> Result<(), LedError> {
        self.setup(Services {
            profile: Profile::Rtos,
            delay,
            time: Some(time),
            queue: Some(queue),
            critical_section: Some(critical_section),
        })
    }

    /// Instantiate the handler without an RTOS
    ///
    /// Only a blocking delay is needed. Registration is still serialized by
    /// the global `critical-section` implementation.
    pub fn instantiate_bare_metal(&self, delay: &'a dyn Delay) -> Result<(), LedError> {
        self.setup(Services {
            profile: Profile::BareMetal,
            delay,
            time: None,
            queue: None,
            critical_section: None,
        })
    }

    fn setup(&self, services: Services<'a>) -> Result<(), LedError> {
        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            if state.services.is_some() {
                return Err(LedError::unavailable(Unavailable::AlreadyInitialized));
            }
            state.registry.clear();
            state.services = Some(services);
            Ok(())
        })
    }

    /// Append an instantiated driver to the registry
    ///
    /// The capacity check and the append run inside the injected critical
    /// section, which is left on every path. If leaving it fails the driver
    /// is not registered.
    pub fn register(&self, driver: &'a LedDriver<'a>) -> Result<(), LedError> {
        let services = self.services()?;
        if !driver.is_initialized() {
            return Err(LedError::InvalidParameter);
        }

        let guard = CriticalGuard::enter(services.critical_section)?;
        critical_section::with(|cs| {
            let mut state = self.state.borrow(cs).borrow_mut();
            if state.registry.push(driver).is_err() {
                #[cfg(feature = "esp32-log")]
                println!("[LedHandler.register] registry full ({} drivers)", N);
                return Err(LedError::unavailable(Unavailable::RegistryFull));
            }
            // a failed exit undoes the append, the registry is unchanged on error
            guard.exit().inspect_err(|_| {
                state.registry.pop();

                #[cfg(feature = "esp32-log")]
                println!("[LedHandler.register] critical section exit failed");
            })
        })
    }

    /// Control `driver` through this handler
    ///
    /// The driver does not have to be registered. See [`LedDriver::control`].
    pub fn control(
        &self,
        driver: &LedDriver<'_>,
        period_ms: u32,
        count: u32,
        duty: u32,
    ) -> Result<(), LedError> {
        let services = self.services()?;
        driver.control(services.delay, period_ms, count, duty)
    }

    /// Control the driver registered at `slot`
    pub fn control_slot(
        &self,
        slot: usize,
        period_ms: u32,
        count: u32,
        duty: u32,
    ) -> Result<(), LedError> {
        let services = self.services()?;
        let driver = self.driver(slot).ok_or(LedError::InvalidParameter)?;
        driver.control(services.delay, period_ms, count, duty)
    }

    /// Execute a queued control request
    pub fn dispatch(&self, request: &ControlRequest) -> Result<(), LedError> {
        self.control_slot(
            usize::from(request.slot),
            request.period_ms,
            request.count,
            request.duty,
        )
    }

    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).borrow().services.is_some())
    }

    /// Services profile, `None` before instantiation
    pub fn profile(&self) -> Option<Profile> {
        self.services().ok().map(|services| services.profile)
    }

    /// Injected time source
    pub fn time(&self) -> Option<&'a dyn Time> {
        self.services().ok().and_then(|services| services.time)
    }

    /// Injected message queue
    pub fn queue(&self) -> Option<&'a dyn Queue> {
        self.services().ok().and_then(|services| services.queue)
    }

    /// Number of registered drivers
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.state.borrow(cs).borrow().registry.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Driver registered at `slot`
    pub fn driver(&self, slot: usize) -> Option<&'a LedDriver<'a>> {
        critical_section::with(|cs| self.state.borrow(cs).borrow().registry.get(slot).copied())
    }

    /// Copy of the registry in registration order
    pub fn drivers(&self) -> Vec<&'a LedDriver<'a>, N> {
        critical_section::with(|cs| self.state.borrow(cs).borrow().registry.clone())
    }

    /// Check if this exact driver instance is registered
    pub fn is_registered(&self, driver: &LedDriver<'_>) -> bool {
        let target: *const LedDriver<'_> = driver;
        critical_section::with(|cs| {
            self.state
                .borrow(cs)
                .borrow()
                .registry
                .iter()
                .any(|registered| ptr::addr_eq(*registered, target))
        })
    }

    fn services(&self) -> Result<Services<'a>, LedError> {
        critical_section::with(|cs| self.state.borrow(cs).borrow().services)
            .ok_or(LedError::unavailable(Unavailable::NotInitialized))
    }
}

impl<const N: usize> Default for LedHandler<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
