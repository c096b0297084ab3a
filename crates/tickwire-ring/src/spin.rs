//! Busy-wait wrappers over the wait-free ring operations.
//!
//! These spin until the operation succeeds and therefore burn a core
//! while waiting. They sit outside the wait-free contract; the feed
//! handler's hot path never calls them.

use crate::SpscRing;

/// Enqueue, spinning until a slot frees up (producer only).
pub fn push<T: Copy + Default, const N: usize>(ring: &SpscRing<T, N>, mut value: T) {
    loop {
        match ring.try_enqueue(value) {
            Ok(()) => return,
            Err(v) => value = v,
        }
        std::hint::spin_loop();
    }
}

/// Dequeue, spinning until a record arrives (consumer only).
pub fn pop<T: Copy + Default, const N: usize>(ring: &SpscRing<T, N>) -> T {
    loop {
        if let Some(value) = ring.try_dequeue() {
            return value;
        }
        std::hint::spin_loop();
    }
}
