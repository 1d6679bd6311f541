use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::kernel::PCB_SIZE;

/// Rejected command line. Raised before any thread starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("expected at least {minimum} arguments, got {actual}")]
    TooFewArguments { minimum: usize, actual: usize },

    #[error("number of processors must be at least 1")]
    NoProcessors,

    #[error("{processors} processor(s) need {expected} arguments after the count, got {actual}")]
    ArgumentCount {
        processors: usize,
        expected: usize,
        actual: usize,
    },

    #[error("an invalid load fraction {value:?} was entered at argument #{position}")]
    InvalidWeight { position: usize, value: String },

    #[error("the supplied load fractions add up to {0}, not 1.0")]
    WeightSum(f64),

    #[error("unknown scheduler type {0:?}, expected one of sjf, rr, pr, fcfs")]
    UnknownPolicy(String),

    #[error("an invalid process scheduler type was entered at argument #{position}")]
    InvalidPolicy {
        position: usize,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("round-robin quantum must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidQuantum(u32),

    #[error("aging step must be at least 1, got {0}")]
    InvalidAgingStep(i8),

    #[error("failed to open {}, make sure the name is spelled properly and that it exists", .0.display())]
    MissingFile(PathBuf),

    #[error("{} does not have the right extension, must be a .bin", .0.display())]
    WrongExtension(PathBuf),
}

/// Malformed or unreadable job stream.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("job stream is {0} bytes, not a whole number of {size}-byte PCB records", size = PCB_SIZE)]
    Truncated(usize),
}

/// Failure while the processors are running.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to spawn thread {label}")]
    Spawn {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("thread {0} panicked")]
    ThreadPanicked(String),
}
