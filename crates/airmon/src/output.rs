//! JSON-lines rendering of published snapshots.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::warn;

use airmon_core::{ResourceKind, Snapshot};

use crate::error::CliError;

/// One stdout line: the snapshot tagged with its kind.
#[derive(Serialize)]
struct Line<'a, T> {
    kind: ResourceKind,
    #[serde(flatten)]
    snapshot: &'a Snapshot<T>,
}

pub fn render<T: Serialize>(
    kind: ResourceKind,
    snapshot: &Snapshot<T>,
) -> Result<String, CliError> {
    Ok(serde_json::to_string(&Line { kind, snapshot })?)
}

/// Print every snapshot from `rx` until the sending side goes away.
pub async fn print_snapshots<T: Serialize + Send + Sync>(
    kind: ResourceKind,
    mut rx: Receiver<Arc<Snapshot<T>>>,
) -> Result<(), CliError> {
    loop {
        match rx.recv().await {
            Ok(snapshot) => {
                let line = render(kind, snapshot.as_ref())?;
                let mut out = std::io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()?;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(resource = %kind, skipped, "output fell behind, snapshots dropped");
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}
