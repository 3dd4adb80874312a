//! CLI entry point: parse arguments, initialize logging, bind, serve.

use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use taskd::error::DaemonError;
use taskd::executor::Executor;
use taskd::server::Server;

/// A register-machine recipe daemon for guest microVMs.
#[derive(Debug, Parser)]
#[command(name = "taskd", version, about)]
struct Args {
    /// TCP port to accept client connections on. Must be nonzero; `taskd.c`
    /// treats a zero or unparsable port as a startup error, not an
    /// OS-assigned ephemeral port.
    port: u16,

    /// Address to bind. Defaults to loopback; a real VSOCK deployment binds
    /// the guest's CID instead, which this TCP stand-in has no analogue for.
    #[arg(long, default_value = "127.0.0.1")]
    bind_addr: String,

    /// Increase log verbosity. Repeatable: `-v` is info, `-vv` is debug,
    /// `-vvv` is trace. Overridden by `RUST_LOG` if set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.port == 0 {
        return Err(DaemonError::InvalidPort(args.port.to_string())).context("startup failed");
    }

    let server = Server::bind(&args.bind_addr, args.port).context("startup failed")?;
    let executor = Executor::start();

    server.serve(&executor);

    executor.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_zero_is_parsed_but_rejected_at_startup() {
        let args = Args::parse_from(["taskd", "0"]);
        assert_eq!(args.port, 0);
    }

    #[test]
    fn verbosity_count_maps_to_repeated_flags() {
        let args = Args::parse_from(["taskd", "8080", "-vv"]);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn bind_addr_defaults_to_loopback() {
        let args = Args::parse_from(["taskd", "8080"]);
        assert_eq!(args.bind_addr, "127.0.0.1");
    }
}
