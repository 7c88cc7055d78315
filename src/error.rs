use thiserror::Error;

/// Errors which can stop a run before or while it executes.
///
/// Malformed trace lines are deliberately absent: they are recovered locally
/// by the simulator (skipped without touching any counter) and never surface
/// as an error
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid cache configuration: {0}")]
    Config(#[from] ConfigError),

    /// The line arena could not be reserved. Nothing is left partially
    /// constructed; the failed reservation drops everything it held
    #[error("couldn't allocate backing storage for {lines} cache lines")]
    Resource { lines: u64 },

    #[error("couldn't read the trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected cache geometries. All of these are fatal before any access is
/// simulated
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    ZeroDimension(&'static str),

    #[error("line size {0} is not a power of two")]
    LineSizeNotPowerOfTwo(u64),

    #[error("total size {total} is not divisible by line size {line_size} x associativity {associativity}")]
    NotDivisible {
        total: u64,
        line_size: u64,
        associativity: u64,
    },

    #[error("derived set count {0} is not a power of two")]
    SetCountNotPowerOfTwo(u64),

    #[error("cache geometry exceeds the addressable range")]
    TooLarge,
}
