//! TCP connect probe.

use std::time::{Duration, Instant};

use tokio::net::TcpStream;

use crate::probe::{Probe, ProbeError};

/// Time a TCP handshake to `host:port`; no application data is exchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpProbe {
    host: String,
    port: u16,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Probe for TcpProbe {
    async fn probe(&self, timeout: Duration) -> Result<Duration, ProbeError> {
        let start = Instant::now();

        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| ProbeError::Timeout(timeout))?
            .map_err(|e| ProbeError::Connection(Box::new(e)))?;
        let elapsed = start.elapsed();

        drop(stream);
        Ok(elapsed)
    }
}
