use sweepr_common::{stop::StopSignal, warn};

const INTERRUPTED_EXIT_CODE: i32 = 130;

/// First Ctrl-C asks the running stage to wind down and keep what it has.
/// A second one exits immediately.
pub fn install(stop: StopSignal) {
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }

            if stop.is_triggered() {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }

            stop.trigger();
            warn!("Stop requested, finishing with the results collected so far");
        }
    });
}
