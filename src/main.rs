//! CLI frontend for `primer`.
//!
//! Thin wrapper over the library's public API: parses arguments with
//! `clap`, builds a [`primer::Config`], and dispatches to
//! `count_primes`/`generate_primes`/`nth_prime`. Library code never
//! installs a logging backend; this binary is the one place that does,
//! via `env_logger` reading `RUST_LOG`.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use primer::{Config, Error};

#[derive(Parser)]
#[command(author, version, about = "Segmented sieve of Eratosthenes over 64-bit intervals")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Args)]
struct SharedArgs {
    /// Segment size in bytes; must be a power of two in [2^14, 2^23].
    #[arg(long, default_value_t = primer::config::DEFAULT_SIEVE_SIZE)]
    sieve_size: usize,

    /// Number of worker threads; defaults to the number of logical CPUs.
    #[arg(long)]
    threads: Option<usize>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Count primes in [start, stop].
    Count {
        #[arg(long)]
        start: u64,
        #[arg(long)]
        stop: u64,
    },
    /// List primes in [start, stop].
    List {
        #[arg(long)]
        start: u64,
        #[arg(long)]
        stop: u64,
        /// Print at most this many primes.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the n-th prime (n=1 => 2).
    Nth {
        n: u64,
    },
}

fn build_config(shared: &SharedArgs) -> Result<Config, Error> {
    let threads = shared.threads.unwrap_or_else(|| num_cpus::get().max(1));
    Config::new(shared.sieve_size, threads)
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    let log_level = match cli.shared.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(log_level).init();

    let config = build_config(&cli.shared)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Count { start, stop } => {
            log::info!("counting primes in [{start}, {stop}]");
            primer::print_prime_count(start, stop, &config, &mut out)?;
        }
        Command::List { start, stop, limit } => {
            log::info!("listing primes in [{start}, {stop}] (limit={limit:?})");
            match limit {
                None => primer::print_primes(start, stop, &config, &mut out)
                    .map_err(|e| Error::PreconditionViolation(e.to_string()))?,
                Some(limit) => {
                    for p in primer::PrimeIterator::new(start, stop, &config)?.take(limit) {
                        let _ = writeln!(out, "{p}");
                    }
                }
            }
        }
        Command::Nth { n } => {
            log::info!("finding the {n}-th prime");
            match primer::nth_prime(n, &config)? {
                Some(p) => {
                    let _ = writeln!(out, "{p}");
                }
                None => {
                    let _ = writeln!(out, "no such prime (n must be >= 1)");
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("primer: {e}");
            ExitCode::FAILURE
        }
    }
}
