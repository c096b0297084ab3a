//! Bounded SPSC ring over a power-of-two slot array.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

/// Lock-free single-producer single-consumer bounded ring.
///
/// `N` must be a power of two; the ring holds at most `N - 1` items
/// because one slot stays empty to distinguish empty from full.
/// Indices stay in `[0, N)` and advance with a mask, so wrap-around
/// is uniform.
///
/// Memory ordering: the producer publishes the slot write before the
/// new head (release store on `head`), and the consumer acquires
/// `head` before reading the slot. Fullness and emptiness checks
/// load the opposite index with acquire so each side sees the
/// other's latest published advancement.
///
/// # Thread contract
///
/// All operations take `&self`; the ring is [`Sync`] so it can sit in
/// an `Arc` between two threads. The contract is single-producer
/// single-consumer: at any time at most one thread calls the producer
/// operations ([`try_enqueue`](Self::try_enqueue)) and at most one
/// thread calls the consumer operations
/// ([`try_dequeue`](Self::try_dequeue), [`peek`](Self::peek)).
/// Concurrent calls within the same role race on the role's index and
/// are undefined behavior.
///
/// # Example
///
/// ```rust
/// use tickwire_ring::SpscRing;
///
/// let ring: SpscRing<u64, 8> = SpscRing::new();
/// assert!(ring.try_enqueue(7).is_ok());
/// assert_eq!(ring.try_dequeue(), Some(7));
/// assert_eq!(ring.try_dequeue(), None);
/// ```
pub struct SpscRing<T, const N: usize> {
    /// Slot storage; index `i` is owned by the producer from the
    /// moment `head == i` until the release store that publishes it,
    /// and by the consumer from that store until `tail` passes it.
    slots: Box<[UnsafeCell<T>]>,
    /// Producer index: written by the producer only
    head: CachePadded<AtomicUsize>,
    /// Consumer index: written by the consumer only
    tail: CachePadded<AtomicUsize>,
}

// The ring hands values across threads by copy; sharing the ring is
// safe under the SPSC role contract documented on the type.
unsafe impl<T: Send + Copy, const N: usize> Send for SpscRing<T, N> {}
unsafe impl<T: Send + Copy, const N: usize> Sync for SpscRing<T, N> {}

impl<T: Copy + Default, const N: usize> SpscRing<T, N> {
    const CAPACITY_OK: () = assert!(
        N > 1 && N.is_power_of_two(),
        "ring capacity must be a power of two greater than one"
    );

    /// Create an empty ring. Capacity is checked at compile time.
    #[must_use]
    pub fn new() -> Self {
        let () = Self::CAPACITY_OK;
        let slots = (0..N)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            slots,
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    #[inline]
    const fn advance(index: usize) -> usize {
        (index + 1) & (N - 1)
    }

    /// Try to enqueue a value (producer only).
    ///
    /// Wait-free. On a full ring the value is handed back in `Err` and
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` iff the ring is full at observation time.
    #[inline]
    pub fn try_enqueue(&self, value: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = Self::advance(head);

        // Full when advancing head would collide with tail. Acquire
        // pairs with the consumer's release store of tail.
        if next == self.tail.load(Ordering::Acquire) {
            return Err(value);
        }

        // SAFETY: slot `head` is not visible to the consumer until the
        // release store below, and no other producer exists.
        unsafe {
            *self.slots[head].get() = value;
        }

        // Publish the slot write before the new head.
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Try to dequeue the front value (consumer only).
    ///
    /// Wait-free. Returns `None` iff the ring is empty at observation
    /// time.
    #[inline]
    pub fn try_dequeue(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);

        // Empty when tail has caught up with head. Acquire pairs with
        // the producer's release store of head.
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the acquire load above ordered the producer's slot
        // write before this read, and the producer will not reuse the
        // slot until tail advances past it.
        let value = unsafe { *self.slots[tail].get() };

        self.tail.store(Self::advance(tail), Ordering::Release);
        Some(value)
    }

    /// Copy the front value without removing it (consumer only).
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: as in `try_dequeue`; tail is not advanced so the
        // slot stays consumer-owned.
        Some(unsafe { *self.slots[tail].get() })
    }

    /// Whether the ring is empty. Snapshot only; may change
    /// immediately after return.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Whether the ring is full. Snapshot only.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        Self::advance(self.head.load(Ordering::Acquire)) == self.tail.load(Ordering::Acquire)
    }

    /// Approximate number of live records. Snapshot only.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail {
            head - tail
        } else {
            N - tail + head
        }
    }

    /// Slots still available to the producer. Snapshot only.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        N - 1 - self.len()
    }

    /// Total slot count. One slot is always kept empty, so at most
    /// `capacity() - 1` records are live at any instant.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: Copy + Default, const N: usize> Default for SpscRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_ring() {
        let ring: SpscRing<u64, 8> = SpscRing::new();
        assert!(ring.is_empty());
        assert!(!ring.is_full());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.available(), 7);
        assert_eq!(ring.capacity(), 8);
        assert_eq!(ring.try_dequeue(), None);
        assert_eq!(ring.peek(), None);
    }

    #[test]
    fn test_fifo_order() {
        let ring: SpscRing<u64, 16> = SpscRing::new();
        for i in 0..10 {
            ring.try_enqueue(i).unwrap();
        }
        for i in 0..10 {
            assert_eq!(ring.try_dequeue(), Some(i));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_full_ring_rejects_then_recovers() {
        // Capacity 8 holds at most 7 records
        let ring: SpscRing<u64, 8> = SpscRing::new();
        for i in 1..=7 {
            assert!(ring.try_enqueue(i).is_ok());
        }
        assert!(ring.is_full());
        assert_eq!(ring.try_enqueue(8), Err(8));

        assert_eq!(ring.try_dequeue(), Some(1));
        assert!(ring.try_enqueue(8).is_ok());

        let drained: Vec<u64> = std::iter::from_fn(|| ring.try_dequeue()).collect();
        assert_eq!(drained, vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let ring: SpscRing<u64, 8> = SpscRing::new();
        ring.try_enqueue(42).unwrap();
        assert_eq!(ring.peek(), Some(42));
        assert_eq!(ring.peek(), Some(42));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.try_dequeue(), Some(42));
    }

    #[test]
    fn test_wraparound_preserves_order() {
        let ring: SpscRing<u64, 8> = SpscRing::new();
        let mut next_out = 0u64;
        // Push/pop far past the capacity so indices wrap many times
        for i in 0..1_000u64 {
            ring.try_enqueue(i).unwrap();
            if i % 3 == 2 {
                for _ in 0..3 {
                    assert_eq!(ring.try_dequeue(), Some(next_out));
                    next_out += 1;
                }
            }
        }
        while let Some(v) = ring.try_dequeue() {
            assert_eq!(v, next_out);
            next_out += 1;
        }
        assert_eq!(next_out, 1_000);
    }

    #[test]
    fn test_concurrent_producer_consumer() {
        const COUNT: u64 = 1_000_000;
        let ring: Arc<SpscRing<u64, 65536>> = Arc::new(SpscRing::new());

        let producer = {
            let ring = Arc::clone(&ring);
            std::thread::spawn(move || {
                for i in 0..=COUNT {
                    while ring.try_enqueue(i).is_err() {
                        std::hint::spin_loop();
                    }
                }
            })
        };

        let consumer = {
            let ring = Arc::clone(&ring);
            std::thread::spawn(move || {
                let mut expected = 0u64;
                while expected <= COUNT {
                    if let Some(v) = ring.try_dequeue() {
                        assert_eq!(v, expected, "values must arrive exactly once, in order");
                        expected += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            })
        };

        producer.join().unwrap();
        consumer.join().unwrap();
        assert!(ring.is_empty());
    }
}
