//! HTTP(S) probe.

use std::time::{Duration, Instant};

use reqwest::redirect::Policy;
use url::Url;

use crate::probe::{Probe, ProbeError};

const MAX_REDIRECTS: usize = 10;

/// Build the client shared by every HTTP probe.
///
/// Idle connections are not kept, so each probe pays for a fresh connect the
/// same way an outside client would.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(Policy::limited(MAX_REDIRECTS))
        .pool_max_idle_per_host(0)
        .no_proxy()
        .user_agent(concat!("pinger/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// GET a URL and time it until the body is fully read.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url: Url,
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(url: Url, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

impl Probe for HttpProbe {
    async fn probe(&self, timeout: Duration) -> Result<Duration, ProbeError> {
        let start = Instant::now();

        let response = self
            .client
            .get(self.url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        // 2xx and 3xx are both terminal successes once redirects are resolved.
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ProbeError::Response(status));
        }

        response
            .bytes()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        Ok(start.elapsed())
    }
}

fn classify_error(error: reqwest::Error, timeout: Duration) -> ProbeError {
    if error.is_timeout() {
        ProbeError::Timeout(timeout)
    } else {
        ProbeError::Connection(Box::new(error))
    }
}
