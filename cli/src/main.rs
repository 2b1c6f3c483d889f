mod commands;
mod terminal;

use std::sync::Arc;

use commands::{CommandLine, Commands, RunArgs, Session, discover, history, run, scan};
use sweepr_common::error::InputError;
use sweepr_common::stop::StopSignal;
use sweepr_common::{info, warn};
use sweepr_core::network::SystemProber;
use terminal::{interrupt, logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    let cfg = commands.config();
    print::banner(&cfg);

    let prober = SystemProber::new();
    if !prober.has_icmp() {
        if is_root::is_root() {
            warn!("ICMP socket unavailable, liveness falls back to TCP ports");
        } else {
            warn!("Not running as root, liveness falls back to TCP ports");
        }
    }

    let stop = StopSignal::new();
    interrupt::install(stop.clone());

    let session = Session {
        cfg,
        scan_cfg: commands.scan_config(),
        paths: commands.storage_paths(),
        no_save: commands.storage.no_save,
        prober: Arc::new(prober),
        stop,
    };

    let outcome = match commands.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run::run(args, &session).await,
        Commands::Discover(args) => discover::discover(args, &session).await,
        Commands::Scan(args) => scan::scan(args, &session).await,
        Commands::History => history::history(&session),
    };

    print::end_of_program();

    match outcome {
        Err(e) => match e.downcast_ref::<InputError>() {
            Some(input) => {
                info!("{input}. Nothing to do.");
                Ok(())
            }
            None => Err(e),
        },
        ok => ok,
    }
}
