//! `Sieve`: the per-worker orchestrator.
//!
//! Owns one segment buffer and one instance each of [`EratSmall`] and
//! [`EratBig`], and drives them segment by segment over an absolute
//! range `[lo, hi]`. This is the "outer segmented sieve" spec.md treats
//! as EratBig's caller/collaborator.

use crate::bootstrap::primes_up_to;
use crate::config::Config;
use crate::erat_big::EratBig;
use crate::erat_small::EratSmall;
use crate::error::Error;
use crate::presieve;
use crate::util::isqrt;
use crate::wheel::RESIDUE30_FOR_BIT;

pub struct Sieve {
    lo: u64,
    hi: u64,
    base: u64,
    span: u64,
    buffer: Vec<u8>,
    erat_small: EratSmall,
    erat_big: EratBig,
    small_primes: Vec<u64>,
    next_small_prime_idx: usize,
    erat_small_threshold: u64,
    finished: bool,
    /// `2`, `3`, `5` are never representable in the mod-30 bitmap, and
    /// `7`'s own bit is cleared by [`presieve`] along with its multiples
    /// — so all four are reported directly by `advance`'s first call
    /// rather than by the segmented machinery.
    emitted_small_primes: bool,
}

impl Sieve {
    /// Builds a sieve for the inclusive range `[lo, hi]`. Values below 2
    /// never produce primes; `hi < 2` yields an immediately-finished
    /// sieve.
    pub fn new(lo: u64, hi: u64, config: &Config) -> Result<Self, Error> {
        if config.sieve_size == 0 || !config.sieve_size.is_power_of_two() {
            return Err(Error::PreconditionViolation(
                "sieve_size must be a power of two".into(),
            ));
        }
        let base = lo - lo % 30;
        let span = config.sieve_size as u64 * 30;

        if hi < 2 {
            return Ok(Sieve {
                lo,
                hi,
                base,
                span,
                buffer: Vec::new(),
                erat_small: EratSmall::new(hi),
                erat_big: EratBig::new(base, hi, config.sieve_size, 2),
                small_primes: Vec::new(),
                next_small_prime_idx: 0,
                erat_small_threshold: 0,
                finished: true,
                emitted_small_primes: false,
            });
        }

        let sqrt_hi = isqrt(hi);
        let small_primes = primes_up_to(sqrt_hi);
        let erat_small_threshold = isqrt(span);

        Ok(Sieve {
            lo,
            hi,
            base,
            span,
            buffer: vec![0u8; config.sieve_size],
            erat_small: EratSmall::new(hi),
            erat_big: EratBig::new(base, hi, config.sieve_size, sqrt_hi.max(2)),
            small_primes,
            next_small_prime_idx: 0,
            erat_small_threshold,
            finished: false,
            emitted_small_primes: false,
        })
    }

    /// Enrolls every bootstrap prime whose square lies before the end of
    /// the *next* segment — called once per segment before sieving it, so
    /// primes enter the engines lazily rather than all at once.
    fn enroll_due_primes(&mut self, segment_end: u64) {
        while self.next_small_prime_idx < self.small_primes.len() {
            let p = self.small_primes[self.next_small_prime_idx];
            if p.saturating_mul(p) >= segment_end {
                break;
            }
            if p > 7 {
                if p <= self.erat_small_threshold {
                    self.erat_small.add_sieving_prime(p, self.base);
                } else {
                    let _ = self.erat_big.add_sieving_prime(p, self.base);
                }
            }
            self.next_small_prime_idx += 1;
        }
    }

    /// Processes exactly one segment, invoking `visit` once per surviving
    /// prime found within `[lo, hi]`. Returns `false` once the whole range
    /// has been consumed.
    pub fn advance<F: FnMut(u64)>(&mut self, mut visit: F) -> bool {
        if self.finished {
            return false;
        }
        if !self.emitted_small_primes {
            self.emitted_small_primes = true;
            for p in [2u64, 3, 5, 7] {
                if p >= self.lo && p <= self.hi {
                    visit(p);
                }
            }
        }
        let segment_end = self.base + self.span;

        presieve::apply(&mut self.buffer, self.base);
        self.enroll_due_primes(segment_end);
        self.erat_small.cross_off(&mut self.buffer, self.base);
        self.erat_big.cross_off(&mut self.buffer, self.base);

        for (i, &byte) in self.buffer.iter().enumerate() {
            if byte == 0 {
                continue;
            }
            let byte_base = self.base + i as u64 * 30;
            if byte_base > self.hi {
                break;
            }
            let mut bits = byte;
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                let n = byte_base + RESIDUE30_FOR_BIT[bit] as u64;
                if n >= 2 && n >= self.lo && n <= self.hi && n != 1 {
                    visit(n);
                }
                bits &= bits - 1;
            }
        }

        self.base = segment_end;
        if self.base > self.hi {
            self.finished = true;
        }
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
