//! Parallel decomposition: one independent [`crate::sieve::Sieve`] (and
//! hence one independent `EratBig`) per chunk of the overall interval.
//!
//! Per spec §5, `EratBig` itself is single-threaded and non-reentrant;
//! parallelism lives entirely here, outside the core, by partitioning
//! `[start, stop]` into `config.threads` contiguous, non-overlapping
//! chunks and running a whole `Sieve` per chunk on a `rayon` worker. No
//! state is shared between chunks, so chunk results can be combined in
//! chunk order without a lock or channel — ascending chunks produce
//! ascending primes.

use rayon::prelude::*;

use crate::config::Config;
use crate::error::Error;
use crate::sieve::Sieve;

/// One contiguous sub-range of the overall `[start, stop]` interval,
/// assigned to a single worker.
#[derive(Debug, Clone, Copy)]
struct Chunk {
    lo: u64,
    hi: u64,
}

/// Splits `[start, stop]` into up to `threads` contiguous chunks of
/// roughly equal size. Boundaries are rounded to a multiple of 30 (except
/// the final chunk, which always ends exactly at `stop`) purely so chunk
/// sizes stay round; each chunk builds its own 30-aligned base
/// internally regardless, so correctness never depends on this rounding.
fn partition(start: u64, stop: u64, threads: usize) -> Vec<Chunk> {
    if start > stop {
        return Vec::new();
    }
    let total = stop - start + 1;
    let threads = threads.max(1) as u64;
    let chunk_len = (total / threads).max(30);

    let mut chunks = Vec::new();
    let mut lo = start;
    while lo <= stop {
        let raw_hi = lo.saturating_add(chunk_len - 1).min(stop);
        let hi = if raw_hi >= stop {
            stop
        } else {
            (raw_hi - raw_hi % 30 + 29).min(stop)
        };
        chunks.push(Chunk { lo, hi });
        lo = hi + 1;
    }
    chunks
}

/// Runs one [`Sieve`] per chunk in parallel and returns every prime in
/// `[start, stop]`, in ascending order.
pub fn generate_primes(start: u64, stop: u64, config: &Config) -> Result<Vec<u64>, Error> {
    let chunks = partition(start, stop, config.threads);
    let per_chunk: Result<Vec<Vec<u64>>, Error> = chunks
        .into_par_iter()
        .map(|chunk| {
            let mut sieve = Sieve::new(chunk.lo, chunk.hi, config)?;
            let mut primes = Vec::new();
            while sieve.advance(|p| primes.push(p)) {}
            Ok(primes)
        })
        .collect();
    Ok(per_chunk?.into_iter().flatten().collect())
}

/// Runs one [`Sieve`] per chunk in parallel and returns the count of
/// primes in `[start, stop]`, without materializing them.
pub fn count_primes(start: u64, stop: u64, config: &Config) -> Result<u64, Error> {
    let chunks = partition(start, stop, config.threads);
    chunks
        .into_par_iter()
        .map(|chunk| {
            let mut sieve = Sieve::new(chunk.lo, chunk.hi, config)?;
            let mut count = 0u64;
            while sieve.advance(|_| count += 1) {}
            Ok(count)
        })
        .try_reduce(|| 0u64, |a, b| Ok(a + b))
}
