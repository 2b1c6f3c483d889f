pub mod discover;
pub mod history;
pub mod run;
pub mod scan;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use sweepr_common::config::{
    AddressOrder, Config, DEFAULT_DATABASE, DEFAULT_JSON_LOG, JoinPolicy, ScanConfig, StoragePaths,
};
use sweepr_common::stop::StopSignal;
use sweepr_core::network::Prober;

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(version, about = "Finds live hosts on a /24 and lists their open TCP ports.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print less: -q drops headers, -qq leaves only summaries
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,

    #[command(flatten)]
    pub storage: StorageArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover hosts, pick some, scan their ports and save the results (default)
    #[command(alias = "r")]
    Run(RunArgs),
    /// Only list the live hosts of a subnet
    #[command(alias = "d")]
    Discover(SubnetArgs),
    /// Scan the given hosts directly, skipping discovery
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Print the scans saved in the JSON log
    History,
}

#[derive(Args, Default)]
pub struct SubnetArgs {
    /// First three octets of the /24 to sweep, e.g. 192.168.10
    #[arg(short, long = "base-ip", value_name = "PREFIX", conflicts_with = "lan")]
    pub base_ip: Option<String>,

    /// Sweep the /24 of the primary wired LAN interface
    #[arg(long)]
    pub lan: bool,
}

#[derive(Args, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub subnet: SubnetArgs,

    /// Port range to scan, START-END
    #[arg(short, long, value_name = "RANGE")]
    pub ports: Option<String>,

    /// Hosts to scan: 'all' or list numbers such as 1,3,5
    #[arg(long, value_name = "SELECTION")]
    pub select: Option<String>,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Hosts to scan, comma separated
    #[arg(required = true, value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// Port range to scan, START-END
    #[arg(short, long, value_name = "RANGE")]
    pub ports: Option<String>,
}

#[derive(Args)]
pub struct TuningArgs {
    /// Give up waiting on each discovery probe after this many milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub join_timeout: Option<u64>,

    /// Ports of one host probed at once
    #[arg(long, value_name = "N", default_value_t = 1, global = true)]
    pub port_workers: usize,

    /// Order discovered hosts by octet value instead of as text
    #[arg(long, global = true)]
    pub numeric_sort: bool,
}

#[derive(Args)]
pub struct StorageArgs {
    /// JSON log the scans are appended to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_JSON_LOG, global = true)]
    pub json: PathBuf,

    /// SQLite database the scans are inserted into
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATABASE, global = true)]
    pub db: PathBuf,

    /// Keep the results on screen only
    #[arg(long, global = true)]
    pub no_save: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            no_banner: self.no_banner,
            quiet: self.quiet,
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        let join_policy = match self.tuning.join_timeout {
            Some(ms) => JoinPolicy::PerProbe(Duration::from_millis(ms)),
            None => JoinPolicy::Unbounded,
        };
        let address_order = if self.tuning.numeric_sort {
            AddressOrder::Numeric
        } else {
            AddressOrder::Lexicographic
        };

        ScanConfig {
            join_policy,
            port_workers: self.tuning.port_workers.max(1),
            address_order,
            ..ScanConfig::default()
        }
    }

    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths {
            json_log: self.storage.json.clone(),
            database: self.storage.db.clone(),
        }
    }
}

/// Everything a command needs besides its own arguments.
pub struct Session {
    pub cfg: Config,
    pub scan_cfg: ScanConfig,
    pub paths: StoragePaths,
    pub no_save: bool,
    pub prober: Arc<dyn Prober>,
    pub stop: StopSignal,
}
