// system-tests/src/bin/user_api_stub_server.rs
// ============================================================================
// Module: User API Stub Server
// Description: Standalone runner for the in-memory user API stub.
// Purpose: Let the CLI and manual checks target the stub over a fixed port.
// Dependencies: clap, system-tests, tokio, tracing-subscriber
// ============================================================================

//! Standalone user API stub server. Serves until interrupted.

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use system_tests::StubFaults;
use system_tests::UserApiStub;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Stub server arguments.
#[derive(Parser, Debug)]
#[command(name = "user_api_stub_server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3333")]
    bind: SocketAddr,
    /// Accept duplicate usernames.
    #[arg(long)]
    allow_duplicates: bool,
    /// Accept create requests with missing fields.
    #[arg(long)]
    accept_missing_fields: bool,
    /// Blank the email of listed users.
    #[arg(long)]
    blank_listing_field: bool,
    /// Send a different success message.
    #[arg(long)]
    wrong_message: bool,
}

impl Args {
    /// Collects the fault switches.
    const fn faults(&self) -> StubFaults {
        StubFaults {
            allow_duplicates: self.allow_duplicates,
            accept_missing_fields: self.accept_missing_fields,
            blank_listing_field: self.blank_listing_field,
            wrong_message: self.wrong_message,
        }
    }
}

/// Serves the stub until Ctrl-C.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let listener = match TcpListener::bind(args.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(bind = %args.bind, error = %err, "bind failed");
            return ExitCode::FAILURE;
        }
    };
    let faults = args.faults();
    tracing::info!(bind = %args.bind, ?faults, "user api stub listening");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    match UserApiStub::new(faults).serve(listener, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server failed");
            ExitCode::FAILURE
        }
    }
}
