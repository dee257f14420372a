//! Interrupt-safe shared state
//!
//! Encoder decoder state is written from the platform's edge-notification
//! context and read from the owning context. [`CriticalState`] wraps that
//! state in a critical-section blocking mutex so the two contexts, and the
//! two channel subscriptions of an X4-mode encoder, can never interleave a
//! read-modify-write.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Critical-section synchronized state.
///
/// The critical section ensures atomic access even in interrupt contexts. On
/// host tests the `critical-section` std implementation provides the same
/// guarantee between threads.
pub struct CriticalState<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<T>>,
}

impl<T> CriticalState<T> {
    /// Creates a new `CriticalState` wrapping the given value.
    ///
    /// This is a const fn, allowing static initialization.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Access state immutably.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    /// Access state mutably.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_state_read() {
        let state = CriticalState::new(42u32);
        assert_eq!(state.with(|v| *v), 42);
    }

    #[test]
    fn test_critical_state_write() {
        let state = CriticalState::new(0u32);
        state.with_mut(|v| *v = 100);
        assert_eq!(state.with(|v| *v), 100);
    }

    #[test]
    fn test_critical_state_closure_return_value() {
        let state = CriticalState::new(7i32);
        let doubled = state.with_mut(|v| {
            *v *= 2;
            *v
        });
        assert_eq!(doubled, 14);
    }

    #[test]
    fn test_critical_state_serializes_threads() {
        use std::sync::Arc;

        let state = Arc::new(CriticalState::new(0u64));
        let mut handles = std::vec::Vec::new();
        for _ in 0..4 {
            let state = Arc::clone(&state);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1_000 {
                    state.with_mut(|v| *v += 1);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.with(|v| *v), 4_000);
    }
}
