//! URL classification.
//!
//! Order: `http://` or `https://` → HTTP probe, `tcp://` → TCP probe,
//! anything else → unsupported scheme. Malformed input is rejected here,
//! before any network I/O, but still gets a series identity so the failure
//! shows up in the metrics.

use std::time::Duration;

use url::Url;

use crate::probe::{HttpProbe, Probe, ProbeError, TcpProbe};

/// Dispatch over the supported probe kinds.
#[derive(Debug, Clone)]
pub enum ProbeTarget {
    Http(HttpProbe),
    Tcp(TcpProbe),
}

impl Probe for ProbeTarget {
    async fn probe(&self, timeout: Duration) -> Result<Duration, ProbeError> {
        match self {
            ProbeTarget::Http(probe) => probe.probe(timeout).await,
            ProbeTarget::Tcp(probe) => probe.probe(timeout).await,
        }
    }
}

/// Series labels for a URL plus the probe to run, or the reason it can't run.
#[derive(Debug)]
pub struct Classification {
    pub scheme: String,
    pub label: String,
    pub target: Result<ProbeTarget, ProbeError>,
}

pub fn classify(url: &str, client: &reqwest::Client) -> Classification {
    if url.starts_with("http://") || url.starts_with("https://") {
        let target = match Url::parse(url) {
            Ok(parsed) if parsed.host_str().is_some_and(|host| !host.is_empty()) => {
                Ok(ProbeTarget::Http(HttpProbe::new(parsed, client.clone())))
            }
            Ok(_) => Err(ProbeError::MalformedTarget {
                url: url.to_string(),
                reason: "missing host".to_string(),
            }),
            Err(e) => Err(ProbeError::MalformedTarget {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        };
        return Classification {
            scheme: "http".to_string(),
            label: url.to_string(),
            target,
        };
    }

    if let Some(rest) = url.strip_prefix("tcp://") {
        return match parse_host_port(rest) {
            Some((host, port)) => Classification {
                scheme: "tcp".to_string(),
                label: format!("{}:{}", host, port),
                target: Ok(ProbeTarget::Tcp(TcpProbe::new(host, port))),
            },
            None => Classification {
                scheme: "tcp".to_string(),
                label: rest.to_string(),
                target: Err(ProbeError::MalformedTcpTarget(url.to_string())),
            },
        };
    }

    let scheme = url
        .split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.is_empty())
        .unwrap_or("unknown");
    Classification {
        scheme: scheme.to_string(),
        label: url.to_string(),
        target: Err(ProbeError::UnsupportedScheme(url.to_string())),
    }
}

/// `host:port` with exactly one colon and a numeric port.
fn parse_host_port(rest: &str) -> Option<(&str, u16)> {
    let (host, port) = rest.split_once(':')?;
    if host.is_empty() || port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((host, port.parse().ok()?))
}
