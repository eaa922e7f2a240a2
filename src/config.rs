//! Sieve configuration: segment size and worker thread count.

use crate::error::Error;

/// Smallest allowed segment size, in bytes (spec §7).
pub const MIN_SIEVE_SIZE: usize = 1 << 14;
/// Largest allowed segment size, in bytes (spec §7).
pub const MAX_SIEVE_SIZE: usize = 1 << 23;
/// Default segment size: 32 KiB, chosen to stay inside a typical L1d.
pub const DEFAULT_SIEVE_SIZE: usize = 32 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub sieve_size: usize,
    pub threads: usize,
}

impl Config {
    /// Validates `sieve_size` (must be a power of two within
    /// `[MIN_SIEVE_SIZE, MAX_SIEVE_SIZE]`) and `threads` (must be >= 1).
    pub fn new(sieve_size: usize, threads: usize) -> Result<Self, Error> {
        if !sieve_size.is_power_of_two()
            || sieve_size < MIN_SIEVE_SIZE
            || sieve_size > MAX_SIEVE_SIZE
        {
            return Err(Error::PreconditionViolation(format!(
                "sieve_size must be a power of two in [{MIN_SIEVE_SIZE}, {MAX_SIEVE_SIZE}], got {sieve_size}"
            )));
        }
        if threads == 0 {
            return Err(Error::PreconditionViolation("threads must be >= 1".into()));
        }
        Ok(Config { sieve_size, threads })
    }

    /// Default configuration: 32 KiB segments, one worker per logical CPU.
    pub fn default_with_threads() -> Self {
        Config {
            sieve_size: DEFAULT_SIEVE_SIZE,
            threads: num_cpus::get().max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config { sieve_size: DEFAULT_SIEVE_SIZE, threads: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two() {
        assert!(Config::new(30_000, 1).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Config::new(1 << 10, 1).is_err());
        assert!(Config::new(1 << 24, 1).is_err());
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(Config::new(DEFAULT_SIEVE_SIZE, 0).is_err());
    }

    #[test]
    fn accepts_valid_config() {
        assert!(Config::new(DEFAULT_SIEVE_SIZE, 4).is_ok());
        assert!(Config::new(MIN_SIEVE_SIZE, 1).is_ok());
        assert!(Config::new(MAX_SIEVE_SIZE, 1).is_ok());
    }
}
