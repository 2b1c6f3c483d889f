use std::io::{self, BufRead, Write};

use anyhow::Context;

pub const BASE_IP_PROMPT: &str = "Enter Base IP (e.g., 192.168.10): ";
pub const PORT_RANGE_PROMPT: &str = "Enter Port Range (e.g., 1-100) [default 1-100]: ";
pub const SELECTION_PROMPT: &str = "Select hosts to scan (e.g., 1,3,5 or 'all'): ";

/// Prints `question` without a newline and returns the trimmed reply.
/// Stdin is read on the blocking pool. A closed stdin reads as an empty
/// reply.
pub async fn ask(question: &'static str) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}")?;
        stdout.flush()?;

        read_answer(io::stdin().lock())
    })
    .await
    .context("prompt task failed")?
}

fn read_answer(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    Ok(line.trim().to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
