//! Portable control-request queue for `no_std` environments.
//!
//! A bounded multi-producer queue built on `critical-section` and
//! `heapless::Deque`, implementing the [`Queue`] capability for targets
//! without an RTOS message queue. Operations never block: a full or empty
//! queue is reported as [`LedError::Timeout`] right away.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::capability::Queue;
use crate::error::{LedError, Unavailable};

/// Request to control the driver registered at `slot`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRequest {
    /// Registry slot of the target driver
    pub slot: u8,
    pub period_ms: u32,
    pub count: u32,
    pub duty: u32,
}

struct QueueState<const SIZE: usize> {
    /// Accepted depth, `None` until created
    depth: Option<usize>,
    requests: Deque<ControlRequest, SIZE>,
}

/// Statically sized request queue
///
/// `SIZE` is the storage capacity; `create` may ask for any depth up to it.
pub struct StaticQueue<const SIZE: usize> {
    inner: Mutex<RefCell<QueueState<SIZE>>>,
}

impl<const SIZE: usize> StaticQueue<SIZE> {
    /// Create a queue that still has to be created with [`Queue::create`]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(QueueState {
                depth: None,
                requests: Deque::new(),
            })),
        }
    }

    /// Number of pending requests
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().requests.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for StaticQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> Queue for StaticQueue<SIZE> {
    fn create(&self, depth: usize) -> Result<(), LedError> {
        if depth == 0 {
            return Err(LedError::InvalidParameter);
        }
        if depth > SIZE {
            return Err(LedError::OutOfMemory);
        }
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            if queue.depth.is_some() {
                return Err(LedError::unavailable(Unavailable::AlreadyInitialized));
            }
            queue.depth = Some(depth);
            Ok(())
        })
    }

    fn put(&self, request: ControlRequest, _timeout_ms: u32) -> Result<(), LedError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let depth = queue
                .depth
                .ok_or(LedError::unavailable(Unavailable::NotInitialized))?;
            if queue.requests.len() >= depth {
                return Err(LedError::Timeout);
            }
            queue
                .requests
                .push_back(request)
                .map_err(|_| LedError::Timeout)
        })
    }

    fn get(&self, _timeout_ms: u32) -> Result<ControlRequest, LedError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            if queue.depth.is_none() {
                return Err(LedError::unavailable(Unavailable::NotInitialized));
            }
            queue.requests.pop_front().ok_or(LedError::Timeout)
        })
    }

    fn delete(&self) -> Result<(), LedError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            if queue.depth.take().is_none() {
                return Err(LedError::unavailable(Unavailable::NotInitialized));
            }
            queue.requests.clear();
            Ok(())
        })
    }
}
