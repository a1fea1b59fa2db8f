use std::path::PathBuf;
use thiserror::Error;

/// The central error type for circular buffer operations.
///
/// Contract violations (`InvalidCapacity`, `EmptyBuffer`, `IndexOutOfRange`)
/// are ordinary, checkable preconditions. `CapacityTooLarge` is raised only
/// where the capacity comes from untrusted input. `Persistence` wraps every
/// I/O or format fault raised while saving or loading.
#[derive(Error, Debug)]
pub enum BufferError {
    #[error("Capacity must be greater than 0 (requested {requested})")]
    InvalidCapacity { requested: usize },

    #[error("Capacity {requested} cannot be allocated")]
    CapacityTooLarge { requested: usize },

    #[error("Buffer is empty")]
    EmptyBuffer,

    #[error("Index {index} out of range for buffer of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stream truncated: expected {expected} elements, read {found}")]
    Truncated { expected: usize, found: usize },

    #[error("Malformed data: {0}")]
    Malformed(String),
}

impl PersistenceError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for BufferError {
    fn from(e: std::io::Error) -> Self {
        BufferError::Persistence(PersistenceError::Io(e))
    }
}

pub type Result<T> = std::result::Result<T, BufferError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_PERSISTENCE_ERROR: u8 = 3;
pub const EXIT_BUFFER_ERROR: u8 = 4;

/// Marker for configuration failures surfaced through `anyhow`.
#[derive(Error, Debug)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

/// Determine the appropriate process exit code for an error.
pub fn exit_code(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<ConfigError>().is_some() {
        return EXIT_CONFIG_ERROR;
    }

    if let Some(buffer_err) = e.downcast_ref::<BufferError>() {
        return match buffer_err {
            BufferError::Persistence(_) => EXIT_PERSISTENCE_ERROR,
            _ => EXIT_BUFFER_ERROR,
        };
    }

    if e.downcast_ref::<PersistenceError>().is_some() {
        return EXIT_PERSISTENCE_ERROR;
    }

    EXIT_ERROR
}
