//! `primer`: a segmented, wheel-factorized Sieve of Eratosthenes over
//! 64-bit intervals.
//!
//! The hard engineering core is [`erat_big::EratBig`] — the subsystem
//! that parks sieving primes larger than one segment until the segment
//! containing their next multiple comes around, using a modulo-210
//! wheel and a bucket/arena allocator with a free list (see that
//! module's docs, and `DESIGN.md`, for the full design). Everything else
//! in this crate exists to give that engine somewhere to run: a
//! small-prime counterpart for primes that strike often per segment
//! ([`erat_small`]), a precomputed tiling for the smallest primes
//! ([`presieve`]), a per-worker orchestrator ([`sieve`]), a chunked
//! parallel driver ([`pool`]), and the public functions below.

pub mod bootstrap;
pub mod bucket;
pub mod config;
pub mod erat_big;
pub mod erat_small;
pub mod error;
pub mod pool;
pub mod presieve;
pub mod sieve;
pub mod util;
pub mod wheel;

use std::io::{self, Write};

pub use config::Config;
pub use error::{Error, Result};
use sieve::Sieve;

/// Every prime in `[start, stop]`, in ascending order, computed using
/// `config.threads` workers.
pub fn generate_primes(start: u64, stop: u64, config: &Config) -> Result<Vec<u64>> {
    pool::generate_primes(start, stop, config)
}

/// The count of primes in `[start, stop]`, without materializing them.
pub fn count_primes(start: u64, stop: u64, config: &Config) -> Result<u64> {
    pool::count_primes(start, stop, config)
}

/// The `n`-th prime, counting from `n = 1` ⇒ `2`. Returns `None` if `n ==
/// 0`, and never returns for an `n` so large the search would overflow
/// `u64` (the caller is expected to bound `n` sensibly).
///
/// Widens the search interval using the standard upper bound on the
/// `n`-th prime, `n * (ln n + ln ln n)` for `n >= 6` (Dusart's bound),
/// re-sieving a larger range only if that estimate undershoots.
pub fn nth_prime(n: u64, config: &Config) -> Result<Option<u64>> {
    if n == 0 {
        return Ok(None);
    }
    if n <= 6 {
        // Dusart's bound only holds for n >= 6; the first few primes are
        // cheap to special-case directly.
        const FIRST_SIX: [u64; 6] = [2, 3, 5, 7, 11, 13];
        return Ok(Some(FIRST_SIX[(n - 1) as usize]));
    }

    let mut upper = nth_prime_upper_bound(n);
    loop {
        let primes = pool::generate_primes(2, upper, config)?;
        if primes.len() as u64 >= n {
            return Ok(Some(primes[(n - 1) as usize]));
        }
        upper = upper.saturating_mul(2);
    }
}

/// Dusart (2010): `p_n < n * (ln n + ln ln n)` for `n >= 6`.
fn nth_prime_upper_bound(n: u64) -> u64 {
    let nf = n as f64;
    let ln_n = nf.ln();
    let ln_ln_n = ln_n.ln();
    (nf * (ln_n + ln_ln_n)).ceil() as u64 + 10
}

/// Streams every prime in `[start, stop]` to `out`, one per line, without
/// materializing the full result vector. Parallel across chunks like
/// [`generate_primes`], but each chunk's primes are written out in order
/// after that chunk's `Sieve` finishes rather than held in a combined
/// `Vec`.
pub fn print_primes(start: u64, stop: u64, config: &Config, out: &mut dyn Write) -> io::Result<()> {
    // Chunk boundaries are re-derived by running a single-chunk Sieve per
    // call to `pool`'s splitting logic would require exposing `partition`;
    // instead this streams straight off one Sieve, since the point of a
    // streaming API is bounded memory, not parallelism at the I/O edge.
    let mut sieve = Sieve::new(start, stop, config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut write_err = None;
    while sieve.advance(|p| {
        if write_err.is_none() {
            if let Err(e) = writeln!(out, "{p}") {
                write_err = Some(e);
            }
        }
    }) {
        if write_err.is_some() {
            break;
        }
    }
    match write_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Writes the count of primes in `[start, stop]` to `out`.
pub fn print_prime_count(start: u64, stop: u64, config: &Config, out: &mut dyn Write) -> Result<()> {
    let count = count_primes(start, stop, config)?;
    let _ = writeln!(out, "{count}");
    Ok(())
}

/// A lazy iterator over the primes in `[start, stop]`, driving one
/// [`Sieve`] segment at a time. Unlike [`generate_primes`] this never
/// materializes the full result and is not parallelized — intended for
/// callers that want to stop early (e.g. `nth_prime`-style consumers, or
/// an interactive `list` command piping into `head`).
pub struct PrimeIterator {
    sieve: Sieve,
    buffered: std::collections::VecDeque<u64>,
}

impl PrimeIterator {
    pub fn new(start: u64, stop: u64, config: &Config) -> Result<Self> {
        Ok(PrimeIterator {
            sieve: Sieve::new(start, stop, config)?,
            buffered: std::collections::VecDeque::new(),
        })
    }
}

impl Iterator for PrimeIterator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some(p) = self.buffered.pop_front() {
                return Some(p);
            }
            if self.sieve.is_finished() {
                return None;
            }
            let buffered = &mut self.buffered;
            self.sieve.advance(|p| buffered.push_back(p));
        }
    }
}
