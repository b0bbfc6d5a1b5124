//! The Sleipnir simulation daemon.
//!
//! Binds the RPC server on the given endpoint and serves stabilizer-circuit
//! simulation requests until SIGINT or SIGTERM.
//!
//! ```bash
//! # Listen on TCP with four workers
//! sleipnird --endpoint tcp://127.0.0.1:12345 --thread 4
//!
//! # Listen on a unix socket with a fixed RNG seed
//! sleipnird -e ipc:///tmp/sleipnir.sock --seed 42
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sleipnir_core::{Generator, Universe};
use sleipnir_rpc::{register_builtin_actions, Dispatcher, Server};

/// Stabilizer-circuit simulation RPC daemon.
#[derive(Parser)]
#[command(name = "sleipnird", version, about, long_about = None)]
struct Cli {
    /// Endpoint to bind, e.g. tcp://127.0.0.1:12345 or ipc:///tmp/sleipnir.sock
    #[arg(short, long)]
    endpoint: String,

    /// Worker count (1-16)
    #[arg(short = 't', long = "thread", default_value_t = 1)]
    thread: usize,

    /// Explicit RNG seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cli.thread.clamp(1, sleipnir_rpc::MAX_WORKERS))
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let generator = match cli.seed {
        Some(seed) => Generator::from_seed(seed),
        None => Generator::from_entropy(),
    };
    info!(seed = generator.seed(), "random generator ready");

    let universe = Arc::new(Universe::with_generator(generator));
    let mut dispatcher = Dispatcher::new();
    register_builtin_actions(&mut dispatcher)?;

    let server = Server::new(universe, dispatcher);
    server.listen(&cli.endpoint, cli.thread).await?;

    wait_for_signal().await;
    server.stop().await;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            tracing::error!(error = %e, "failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("caught SIGINT, stopping"),
        _ = term.recv() => info!("caught SIGTERM, stopping"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("caught interrupt, stopping");
}
