//! EratBig: the large-prime crossing-off engine.
//!
//! Handles sieving primes larger than the segment size — each such prime
//! has at most one multiple per segment, so between the segment where it
//! last struck and the segment where it strikes next it must be parked
//! somewhere. `EratBig` parks it in a [`Bucket`] chained onto the
//! `lists_` slot for the segment where its next multiple falls, and
//! re-files it into a (possibly much later) slot every time `cross_off`
//! runs out its current multiple.
//!
//! This is the hottest, most intricate part of a segmented sieve: see
//! `DESIGN.md` for how the implementation here maps onto spec §4.4's
//! wheel-210 state machine and bucket/arena design.

use crate::bucket::{Bucket, BucketPool, WheelPrime};
use crate::error::Error;
use crate::wheel::{bit_for_residue30, first_wheel_multiplier, GAPS, WHEEL_SIZE};

/// One slot of the `lists_` ring: the head of a (possibly empty) chain of
/// buckets holding primes whose next multiple falls in that future
/// segment.
type ListSlot = Option<Box<Bucket>>;

pub struct EratBig {
    pool: BucketPool,
    /// Ring of `L` slots. `lists[(base_slot + i) % lists.len()]` is the
    /// list of primes striking `i` segments from now; slot 0 is always
    /// the current segment. `lists.len()` is a power of two so rotation
    /// is `(base_slot + i) & (len - 1)`, per spec §9's design note.
    lists: Vec<ListSlot>,
    base_slot: usize,
    /// Start of the whole sieve, rounded down to a multiple of 30 — bit 0
    /// of byte 0 of the very first segment represents this value's
    /// residue class.
    start: u64,
    /// Inclusive upper bound; primes whose next multiple would exceed
    /// this are dropped rather than re-filed.
    stop: u64,
    segment_bytes: usize,
    log2_segment_bytes: u32,
}

impl EratBig {
    /// `start`/`stop`: the sieve's overall bounds (start rounded down to a
    /// multiple of 30 by the caller). `segment_bytes`: power of two,
    /// validated by the caller. `max_sieving_prime`: upper bound on any
    /// prime ever added (normally `sqrt(stop)`), used to size `lists_`.
    pub fn new(start: u64, stop: u64, segment_bytes: usize, max_sieving_prime: u64) -> Self {
        debug_assert!(segment_bytes.is_power_of_two());
        // A re-filed prime can land up to roughly `max_sieving_prime /
        // segment_bytes` segments ahead (a wheel gap spans up to 10
        // numbers, a byte spans 30, so the worst case is dominated by
        // `prime`'s own magnitude relative to one segment's byte count,
        // not its number-line span) — size `lists_` in segment-bytes
        // units, not number-line units, per spec §4.4.
        let needed = (max_sieving_prime / segment_bytes as u64) + 2;
        let len = needed.next_power_of_two().max(2) as usize;
        let mut lists = Vec::with_capacity(len);
        lists.resize_with(len, || None);
        EratBig {
            pool: BucketPool::new(),
            lists,
            base_slot: 0,
            start,
            stop,
            segment_bytes,
            log2_segment_bytes: segment_bytes.trailing_zeros(),
        }
    }

    #[inline]
    fn slot(&self, segments_ahead: u64) -> usize {
        (self.base_slot + segments_ahead as usize) & (self.lists.len() - 1)
    }

    /// Adds a sieving prime `p` (with `sqrt(current_base) < p <=
    /// max_sieving_prime`, enforced by the caller), computing the first
    /// multiple at or after `current_base` and filing it into the
    /// appropriate future list. A prime whose first in-range multiple
    /// would exceed `stop` is silently dropped — normal operation, not an
    /// error (spec §4.5).
    pub fn add_sieving_prime(&mut self, prime: u64, current_base: u64) -> Result<(), Error> {
        let low = current_base.max(prime.saturating_mul(prime));
        let start_multiplier = (low + prime - 1) / prime;
        let (m, wheel_index) = first_wheel_multiplier(start_multiplier);
        let next = match prime.checked_mul(m) {
            Some(v) => v,
            None => return Ok(()), // would overflow u64 ⇒ certainly past stop
        };
        if next > self.stop {
            return Ok(());
        }
        self.file(WheelPrime { prime, next, wheel_index }, current_base)
    }

    /// Routes `wp` into the correct `lists_` slot given the absolute
    /// position of the *current* segment's base (spec §4.3's
    /// `SegmentIndex`), pushing it onto the head bucket of that slot's
    /// chain (acquiring a fresh bucket from the pool if the head is full
    /// or absent).
    fn file(&mut self, wp: WheelPrime, current_base: u64) -> Result<(), Error> {
        let current_byte = (current_base - self.start) / 30;
        let target_byte = (wp.next - self.start) / 30;
        let segments_ahead = (target_byte - current_byte) >> self.log2_segment_bytes;
        let slot_idx = self.slot(segments_ahead);

        let needs_new_head = match &self.lists[slot_idx] {
            Some(head) => head.is_full(),
            None => true,
        };
        if needs_new_head {
            let mut fresh = self.pool.acquire();
            fresh.set_next(self.lists[slot_idx].take());
            self.lists[slot_idx] = Some(fresh);
        }
        self.lists[slot_idx].as_mut().expect("just inserted").push(wp);
        Ok(())
    }

    /// Drains `lists_[0]` (the primes striking this segment), clears the
    /// corresponding bits in `sieve`, re-files each prime's future cursor,
    /// returns the drained buckets to the pool, and rotates `lists_` by
    /// one slot so the segment after this one becomes the new slot 0.
    ///
    /// `sieve` is the caller's bitmap for exactly this segment (length
    /// `segment_bytes`); `current_base` is this segment's absolute lower
    /// bound (a multiple of 30, aligned to `segment_bytes*30` boundaries).
    pub fn cross_off(&mut self, sieve: &mut [u8], current_base: u64) {
        debug_assert_eq!(sieve.len(), self.segment_bytes);
        let cur_slot = self.base_slot;
        let mut chain = self.lists[cur_slot].take();
        let segment_end = current_base + self.segment_bytes as u64 * 30;

        let mut refiled: Vec<WheelPrime> = Vec::new();
        {
            let mut cursor = chain.as_deref_mut();
            while let Some(bucket) = cursor {
                for wp in bucket.iter().copied().collect::<Vec<_>>() {
                    if let Some(wp) = self.strike(sieve, wp, current_base, segment_end) {
                        refiled.push(wp);
                    }
                }
                cursor = bucket.next_mut();
            }
        }

        self.pool.release(chain);
        for wp in refiled {
            // `file` recomputes the target slot relative to `current_base`,
            // which is correct since `wp.next` is always an absolute value.
            let _ = self.file(wp, current_base);
        }

        self.base_slot = (self.base_slot + 1) & (self.lists.len() - 1);
    }

    /// Strikes every multiple of `wp` that falls within
    /// `[current_base, segment_end)`, advancing its wheel cursor each
    /// time. Returns `Some(wp)` with the cursor parked on its next future
    /// multiple if it should be re-filed, or `None` if that multiple
    /// would exceed `stop` (the prime is retired).
    fn strike(
        &self,
        sieve: &mut [u8],
        mut wp: WheelPrime,
        current_base: u64,
        segment_end: u64,
    ) -> Option<WheelPrime> {
        let mut wheel_index = wp.wheel_index as usize;
        while wp.next < segment_end {
            let offset = wp.next - current_base;
            let byte = (offset / 30) as usize;
            let bit = bit_for_residue30(wp.next);
            sieve[byte] &= !(1u8 << bit);

            let gap = GAPS[wheel_index] as u64;
            wheel_index = (wheel_index + 1) % WHEEL_SIZE;
            wp.next += wp.prime * gap;
        }
        wp.wheel_index = wheel_index as u8;
        if wp.next > self.stop {
            None
        } else {
            Some(wp)
        }
    }

    /// True once every `lists_` slot is empty — all parked primes have
    /// either been retired (exceeded `stop`) or the sieve has not yet run
    /// far enough to drain them.
    pub fn is_exhausted(&self) -> bool {
        self.lists.iter().all(|slot| slot.is_none())
    }
}
