//! Unified error type.

use std::fmt;

/// The error type returned by pylon's fallible operations.
///
/// Request-level failures (404, 400, 500) are expressed as HTTP responses,
/// never as `Error`s. This type covers the two things that can actually go
/// wrong outside a request: misconfiguration at setup and infrastructure
/// I/O while binding or accepting.
#[derive(Debug)]
pub enum Error {
    /// The same path was registered twice.
    DuplicateRoute(String),
    /// Binding the listener or reading its address failed.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRoute(path) => write!(f, "duplicate route `{path}`"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DuplicateRoute(_) => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
