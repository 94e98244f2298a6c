mod cli;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use airmon_core::{
    BroadcastSink, InterfaceRecord, Poller, ResourceKind, Sinks, StationRecord, StatusRecord,
};

use crate::cli::Cli;
use crate::error::CliError;

/// Snapshots a slow stdout consumer may fall behind by before losing some.
const SINK_CAPACITY: usize = 16;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout carries only snapshot lines.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut cfg = airmon_config::load_config(cli.config.as_deref())?;
    cli.apply(&mut cfg);
    let poller_config = cfg.to_poller_config()?;

    let status: Arc<BroadcastSink<StatusRecord>> = Arc::new(BroadcastSink::new(SINK_CAPACITY));
    let interfaces: Arc<BroadcastSink<InterfaceRecord>> =
        Arc::new(BroadcastSink::new(SINK_CAPACITY));
    let stations: Arc<BroadcastSink<StationRecord>> = Arc::new(BroadcastSink::new(SINK_CAPACITY));

    let mut printers = Vec::new();
    printers.extend(spawn_printer(&cli, ResourceKind::Status, &status));
    printers.extend(spawn_printer(&cli, ResourceKind::Interfaces, &interfaces));
    printers.extend(spawn_printer(&cli, ResourceKind::Stations, &stations));

    let sinks = Sinks {
        status,
        interfaces,
        stations,
    };
    let poller = Poller::new(poller_config, sinks)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, finishing current cycle");
        } else {
            warn!("cannot listen for ctrl-c, stopping");
        }
        ctrl_c.cancel();
    });

    // Consumes the poller; dropping it closes the sinks and ends the printers.
    poller.run(cancel).await;

    for printer in printers {
        match printer.await {
            Ok(result) => result?,
            Err(e) => debug!(error = %e, "printer task aborted"),
        }
    }
    Ok(())
}

/// Subscribe a stdout printer to `sink` when `kind` was requested.
///
/// Kinds without a printer have no subscribers and are never fetched.
fn spawn_printer<T>(
    cli: &Cli,
    kind: ResourceKind,
    sink: &BroadcastSink<T>,
) -> Option<JoinHandle<Result<(), CliError>>>
where
    T: Serialize + Send + Sync + 'static,
{
    cli.wants(kind)
        .then(|| tokio::spawn(output::print_snapshots(kind, sink.subscribe())))
}
