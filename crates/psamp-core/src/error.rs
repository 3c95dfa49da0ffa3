use thiserror::Error;

pub type Result<T> = std::result::Result<T, PsampError>;

/// Abort codes reported to the communicator. Distinct per check site so a
/// job log names which bound was violated.
pub mod codes {
    pub const CAPACITY_GLOBAL: i32 = 9100;
    pub const CONFIG: i32 = 9200;
    pub const CAPACITY_LOCAL: i32 = 9300;
    pub const CAPACITY_OVERFLOW: i32 = 9301;
    pub const COMM: i32 = 9400;
    pub const IO: i32 = 9500;
}

#[derive(Debug, Error)]
pub enum PsampError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Comm(#[from] CommError),

    #[error("snapshot format error: {0}")]
    Format(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PsampError {
    pub fn code(&self) -> i32 {
        match self {
            PsampError::Config(_) => codes::CONFIG,
            PsampError::Capacity(e) => e.code(),
            PsampError::Comm(CommError::Aborted { code, .. }) => *code,
            PsampError::Comm(_) => codes::COMM,
            PsampError::Format(_) | PsampError::Io(_) => codes::IO,
        }
    }

    /// True when this rank failed only because another rank aborted the job.
    pub fn is_remote_abort(&self) -> bool {
        matches!(self, PsampError::Comm(CommError::Aborted { .. }))
    }

    pub fn is_disconnect(&self) -> bool {
        matches!(self, PsampError::Comm(CommError::Disconnected { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapacityError {
    #[error(
        "not enough memory for local subsampling: expected ~{expected:.2} particles \
         (+{margin:.2} margin), scratch holds {available}"
    )]
    Local {
        expected: f64,
        margin: f64,
        available: usize,
    },

    #[error(
        "not enough space to gather subsample particles: {local} (local) + {total} (global) \
         > {available}"
    )]
    Global {
        local: usize,
        total: usize,
        available: usize,
    },

    #[error("scratch buffer overflow: capacity {capacity} records")]
    Overflow { capacity: usize },
}

impl CapacityError {
    pub fn code(&self) -> i32 {
        match self {
            CapacityError::Local { .. } => codes::CAPACITY_LOCAL,
            CapacityError::Global { .. } => codes::CAPACITY_GLOBAL,
            CapacityError::Overflow { .. } => codes::CAPACITY_OVERFLOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommError {
    #[error("job aborted by rank {rank} (code {code}): {message}")]
    Aborted {
        rank: usize,
        code: i32,
        message: String,
    },

    #[error("rank {rank} disconnected")]
    Disconnected { rank: usize },

    #[error("collective protocol error: {0}")]
    Protocol(String),

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
