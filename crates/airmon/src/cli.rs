//! Clap derive structures for the `airmon` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use airmon_config::Config;
use airmon_core::ResourceKind;

/// airmon -- stream airOS device telemetry as JSON lines
#[derive(Debug, Parser)]
#[command(
    name = "airmon",
    version,
    about = "Poll an airOS device and print status, interface and station snapshots",
    long_about = "Logs in to an airOS device, polls status.cgi, iflist.cgi and sta.cgi\n\
        every period, and prints one JSON object per snapshot on stdout.\n\n\
        Settings come from the config file, AIRMON_* environment variables\n\
        and the flags below, in increasing order of precedence."
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Device address, e.g. 192.168.1.20 or https://ap.local
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Login username
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Fixed source identifier instead of the device hostname
    #[arg(long)]
    pub source_id: Option<String>,

    /// Seconds between polling cycles
    #[arg(long, short = 'p')]
    pub period: Option<u64>,

    /// Publish raw counters only, without per-second rates
    #[arg(long)]
    pub no_rates: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Snapshot kinds to print
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "status,interfaces,stations"
    )]
    pub kinds: Vec<KindArg>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Status,
    Interfaces,
    Stations,
}

impl From<KindArg> for ResourceKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Status => Self::Status,
            KindArg::Interfaces => Self::Interfaces,
            KindArg::Stations => Self::Stations,
        }
    }
}

impl Cli {
    /// Overlay flag values on a loaded config.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(ref device) = self.device {
            cfg.device = Some(device.clone());
        }
        if let Some(ref username) = self.username {
            cfg.username = Some(username.clone());
        }
        if let Some(ref source_id) = self.source_id {
            cfg.source_id = Some(source_id.clone());
        }
        if let Some(period) = self.period {
            cfg.period_secs = period;
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout_secs = timeout;
        }
        if self.no_rates {
            cfg.rates = false;
        }
    }

    pub fn wants(&self, kind: ResourceKind) -> bool {
        self.kinds.iter().any(|k| ResourceKind::from(*k) == kind)
    }
}
