use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Attempts one TCP handshake and drops the stream right away.
///
/// Refusals, unreachable routes and timeouts all count as "not open".
pub async fn handshake(socket_addr: SocketAddr, probe_timeout: Duration) -> bool {
    matches!(
        timeout(probe_timeout, TcpStream::connect(socket_addr)).await,
        Ok(Ok(_))
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
