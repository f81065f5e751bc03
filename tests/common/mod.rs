#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use bsp_led::{ControlRequest, CriticalSection, Delay, LedDriver, LedError, OnOff, Queue, Time};

/// Capability call observed by a [`Recorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    On(usize),
    Off(usize),
    Delay(u32),
    Enter,
    Exit,
}

/// Shared, ordered log of capability calls
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, event: Event) -> usize {
        self.events().iter().filter(|seen| **seen == event).count()
    }
}

pub struct MockSwitch<'r> {
    pub id: usize,
    recorder: &'r Recorder,
    pub fail_next_on: AtomicBool,
    pub fail_next_off: AtomicBool,
}

impl<'r> MockSwitch<'r> {
    pub fn new(id: usize, recorder: &'r Recorder) -> Self {
        Self {
            id,
            recorder,
            fail_next_on: AtomicBool::new(false),
            fail_next_off: AtomicBool::new(false),
        }
    }
}

impl OnOff for MockSwitch<'_> {
    fn turn_on(&self) -> Result<(), LedError> {
        if self.fail_next_on.swap(false, Ordering::SeqCst) {
            return Err(LedError::Generic);
        }
        self.recorder.push(Event::On(self.id));
        Ok(())
    }

    fn turn_off(&self) -> Result<(), LedError> {
        if self.fail_next_off.swap(false, Ordering::SeqCst) {
            return Err(LedError::Generic);
        }
        self.recorder.push(Event::Off(self.id));
        Ok(())
    }
}

pub struct MockDelay<'r> {
    recorder: &'r Recorder,
    pub isr: AtomicBool,
}

impl<'r> MockDelay<'r> {
    pub fn new(recorder: &'r Recorder) -> Self {
        Self {
            recorder,
            isr: AtomicBool::new(false),
        }
    }
}

impl Delay for MockDelay<'_> {
    fn delay_ms(&self, duration_ms: u32) -> Result<(), LedError> {
        self.recorder.push(Event::Delay(duration_ms));
        Ok(())
    }

    fn in_isr_context(&self) -> bool {
        self.isr.load(Ordering::SeqCst)
    }
}

pub struct MockCriticalSection<'r> {
    recorder: &'r Recorder,
    pub fail_enter: AtomicBool,
    pub fail_exit: AtomicBool,
}

impl<'r> MockCriticalSection<'r> {
    pub fn new(recorder: &'r Recorder) -> Self {
        Self {
            recorder,
            fail_enter: AtomicBool::new(false),
            fail_exit: AtomicBool::new(false),
        }
    }
}

impl CriticalSection for MockCriticalSection<'_> {
    fn enter(&self) -> Result<(), LedError> {
        if self.fail_enter.load(Ordering::SeqCst) {
            return Err(LedError::Timeout);
        }
        self.recorder.push(Event::Enter);
        Ok(())
    }

    fn exit(&self) -> Result<(), LedError> {
        self.recorder.push(Event::Exit);
        if self.fail_exit.load(Ordering::SeqCst) {
            return Err(LedError::Generic);
        }
        Ok(())
    }
}

pub struct FixedClock(pub u32);

impl Time for FixedClock {
    fn get_time_ms(&self) -> Result<u32, LedError> {
        Ok(self.0)
    }
}

/// Queue that refuses everything, the core never touches it
pub struct NullQueue;

impl Queue for NullQueue {
    fn create(&self, _depth: usize) -> Result<(), LedError> {
        Err(LedError::Generic)
    }

    fn put(&self, _request: ControlRequest, _timeout_ms: u32) -> Result<(), LedError> {
        Err(LedError::Generic)
    }

    fn get(&self, _timeout_ms: u32) -> Result<ControlRequest, LedError> {
        Err(LedError::Generic)
    }

    fn delete(&self) -> Result<(), LedError> {
        Err(LedError::Generic)
    }
}

/// Delay that tries to control `driver` again while a sequence is running
pub struct ReentrantDelay<'d, 'a> {
    pub driver: &'d LedDriver<'a>,
    pub nested: Mutex<Vec<Result<(), LedError>>>,
}

impl Delay for ReentrantDelay<'_, '_> {
    fn delay_ms(&self, _duration_ms: u32) -> Result<(), LedError> {
        let result = self.driver.control(&NoDelay, 1000, 1, 10);
        self.nested.lock().unwrap().push(result);
        Ok(())
    }
}

pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_ms(&self, _duration_ms: u32) -> Result<(), LedError> {
        Ok(())
    }
}
