//! Daemon-level error types.
//!
//! Runtime opcode failures are never represented here: per the interpreter's
//! contract, a failing filesystem primitive or an out-of-range operand
//! yields an in-band `false`/empty register value, not an `Err`. The types
//! in this module cover the layers around the interpreter where failure
//! really does mean "stop": binding a socket, accepting a connection, and
//! reading a malformed transport frame.

use std::io;

use thiserror::Error;

/// Errors that can terminate the daemon at startup.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The configured port was not a valid, non-zero port number.
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// Binding the listener to the configured address failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the daemon tried to bind.
        addr: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Errors that can end a single client connection without reaching a
/// terminal status reply — the connection is simply dropped.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The socket was closed or errored before a full message was read.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The first message received was not a well-formed handshake.
    #[error("malformed handshake")]
    MalformedHandshake,

    /// The second message received was not a JSON array.
    #[error("malformed recipe: top-level value is not an array")]
    MalformedRecipe,
}
