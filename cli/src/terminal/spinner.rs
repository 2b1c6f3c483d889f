use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TIP_DURATION: Duration = Duration::from_secs(1);
const MESSAGE_READ_TIME: Duration = Duration::from_secs(1);
const MIN_TIP_VISIBILITY: Duration = Duration::from_millis(750);
const TIPS: &[&str] = &["Press Ctrl-C to stop early", "Press Ctrl-C twice to quit"];

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Drives the message line of a span's progress bar from a queue. When
/// nothing new arrives, it cycles through usage tips.
pub struct SpinnerHandle {
    tx: Sender<String>,
    done: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl SpinnerHandle {
    pub fn start(span: Span) -> Self {
        let (tx, rx) = mpsc::channel::<String>();
        let done = Arc::new(AtomicBool::new(false));
        let finished = done.clone();

        let worker = thread::spawn(move || {
            let mut tip_index = 0;
            let mut next_action_time = Instant::now() + TIP_DURATION;
            let mut is_showing_tip = false;
            let mut last_tip_time = Instant::now();

            loop {
                if finished.load(Ordering::Relaxed) {
                    break;
                }

                let wait_time = next_action_time.saturating_duration_since(Instant::now());

                match rx.recv_timeout(wait_time) {
                    Ok(mut msg) => {
                        if is_showing_tip {
                            let elapsed = last_tip_time.elapsed();
                            if elapsed < MIN_TIP_VISIBILITY {
                                thread::sleep(MIN_TIP_VISIBILITY - elapsed);
                            }
                            is_showing_tip = false;
                        }
                        while let Ok(newer_msg) = rx.try_recv() {
                            msg = newer_msg;
                        }
                        span.pb_set_message(&msg);
                        next_action_time = Instant::now() + MESSAGE_READ_TIME;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        let tip = TIPS[tip_index % TIPS.len()];
                        span.pb_set_message(&format!("{}", tip.italic().white()));

                        tip_index += 1;
                        is_showing_tip = true;
                        last_tip_time = Instant::now();

                        next_action_time = Instant::now() + TIP_DURATION;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self { tx, done, worker }
    }

    pub fn sender(&self) -> Sender<String> {
        self.tx.clone()
    }

    /// Stops the worker even if cloned senders are still alive.
    pub fn finish(self) {
        self.done.store(true, Ordering::Relaxed);
        drop(self.tx);
        let _ = self.worker.join();
    }
}

pub fn report_discovery_progress(tx: &Sender<String>, count: usize) {
    let _ = tx.send(format!(
        "Identified {} hosts so far...",
        count.to_string().green().bold()
    ));
}

pub fn report_port_progress(tx: &Sender<String>, ip: &str, port: u16) {
    let _ = tx.send(format!(
        "Checking {} port {}...",
        ip.bright_cyan(),
        port.to_string().yellow()
    ));
}
