//! The accept loop.
//!
//! Binds a stream listener and serves clients one at a time on the calling
//! thread, per spec.md §2/§5: there is no connection-handler pool in the
//! reference design, just a single accept loop feeding the persistent
//! worker's FIFO. `original_source/taskd.c` binds `AF_VSOCK`; this
//! implementation binds TCP, since a `vsock`-only transport isn't
//! addressable in this environment, but the handler in
//! [`crate::connection`] only requires `Read + Write` and would run
//! unmodified over a real `vsock::VsockStream`.

use std::net::TcpListener;

use tracing::{error, info, warn};

use crate::connection::handle_connection;
use crate::error::DaemonError;
use crate::executor::Executor;

/// A bound, not-yet-serving daemon listener.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Bind `addr:port`.
    ///
    /// Rejecting a *user-supplied* port of `0` (spec.md §6: "invalid or
    /// zero port exits with a non-zero status") is the CLI layer's job
    /// (see `main.rs`'s port parsing) — `0` is a legitimate, OS-assigned
    /// ephemeral port at the socket layer, and tests rely on binding one.
    pub fn bind(addr: &str, port: u16) -> Result<Self, DaemonError> {
        let bind_addr = format!("{addr}:{port}");
        let listener = TcpListener::bind(&bind_addr).map_err(|source| DaemonError::Bind {
            addr: bind_addr,
            source,
        })?;
        Ok(Server { listener })
    }

    /// The local address actually bound (useful when port `0` is used in
    /// tests to get an OS-assigned port).
    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.listener.local_addr().expect("bound listener has a local address")
    }

    /// Serve forever: accept, run the handshake/recipe/run/summary
    /// sequence, close, repeat. A per-connection I/O error is logged and
    /// does not stop the loop — only `Executor` shutdown does, and this
    /// daemon has no remote shutdown signal, matching `taskd.c`'s `for
    /// (;;)` loop.
    pub fn serve(self, executor: &Executor) {
        info!(addr = ?self.local_addr(), "accepting connections");
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(err) = handle_connection(stream, executor) {
                        warn!(%err, "connection ended with an error");
                    }
                }
                Err(err) => error!(%err, "accept failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_port_binds() {
        let server = Server::bind("127.0.0.1", 0).unwrap();
        assert!(server.local_addr().port() > 0);
    }
}
