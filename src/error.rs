//! Error kinds surfaced at the crate boundary.
//!
//! Per spec §7, everything inside `EratBig::cross_off`'s hot loop is
//! normal flow (exhaustion, empty segments, sparse lists) and never
//! raises an error. Only construction/configuration and slab allocation
//! can fail.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bucket slab allocation failed")]
    OutOfMemory,

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
