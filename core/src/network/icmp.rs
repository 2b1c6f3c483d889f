use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};

const PAYLOAD: [u8; 56] = [0; 56];

pub struct IcmpPinger {
    client: Client,
}

impl IcmpPinger {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::new(&Config::default())?;
        Ok(Self { client })
    }

    /// One echo request, no retries. A timeout is a negative answer; any
    /// other failure is returned as an error.
    pub async fn ping(&self, addr: IpAddr, timeout: Duration) -> anyhow::Result<bool> {
        let mut pinger = self.client.pinger(addr, PingIdentifier(rand::random())).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok(_) => Ok(true),
            Err(SurgeError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
