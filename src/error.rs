//! Unified error types for the stove bridge.
//!
//! Only serial I/O can fail a poll. Degraded protocol input (overflows,
//! timeouts, unknown lines) is counted and emitted as events instead, and
//! storage or config problems surface through the port error types in
//! [`crate::app::ports`]. All variants are `Copy`.
//!
//! Nothing here is fatal: the stove retries its own requests, so callers
//! log the error and keep polling.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Failure of a protocol poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link failed to read, write or flush.
    Transport(TransportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Reading from the UART failed.
    ReadFailed,
    /// Writing to the UART failed or was short.
    WriteFailed,
    /// Flushing the UART TX FIFO failed.
    FlushFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::FlushFailed => write!(f, "flush failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
