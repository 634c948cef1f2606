use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Failure of a channel source. None of these are fatal: the sampler
/// substitutes a neutral snapshot and tries again next cycle.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport is not open")]
    NotOpen,

    #[error("failed to create shared region '{}'", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to map shared region '{}'", path.display())]
    MapFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect to {addr}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("short read: received {received} of {expected} bytes")]
    ShortRead { expected: usize, received: usize },

    #[error("connection closed")]
    Closed(#[source] io::Error),
}

/// Payload-free discriminant of [`TransportError`], for comparing failures
/// across cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    NotOpen,
    CreateFailed,
    MapFailed,
    ConnectFailed,
    ShortRead,
    Closed,
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::NotOpen => TransportErrorKind::NotOpen,
            TransportError::CreateFailed { .. } => TransportErrorKind::CreateFailed,
            TransportError::MapFailed { .. } => TransportErrorKind::MapFailed,
            TransportError::ConnectFailed { .. } => TransportErrorKind::ConnectFailed,
            TransportError::ShortRead { .. } => TransportErrorKind::ShortRead,
            TransportError::Closed(_) => TransportErrorKind::Closed,
        }
    }
}
