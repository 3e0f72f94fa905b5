//! Post-connect verification
//!
//! After connecting we show three things, each independent of the others:
//!
//! 1. `mullvad status -v` (or plain `status`)
//! 2. The apparent public IP, from an HTTP lookup
//! 3. Whether traffic is leaving through Mullvad, from a second lookup
//!
//! Any of them may fail; failures are warnings.

use crate::client::VpnClient;
use crate::config::Config;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP lookups used to confirm the tunnel
pub struct Probe {
    http: reqwest::Client,
    ip_endpoint: String,
    check_endpoint: String,
}

impl Probe {
    pub fn new(config: &Config) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mullvad-helper/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Self {
            http,
            ip_endpoint: config.ip_endpoint.clone(),
            check_endpoint: config.check_endpoint.clone(),
        })
    }

    /// GET `url` and return the body; non-2xx counts as failure
    pub async fn fetch(&self, url: &str) -> Result<String, ProbeError> {
        debug!("GET {}", url);
        let wrap = |source: reqwest::Error| ProbeError::Request {
            url: url.to_string(),
            source,
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(wrap)?;
        response.text().await.map_err(wrap)
    }

    pub async fn public_ip(&self) -> Result<String, ProbeError> {
        self.fetch(&self.ip_endpoint).await
    }

    pub async fn tunnel_check(&self) -> Result<String, ProbeError> {
        self.fetch(&self.check_endpoint).await
    }
}

/// Step 1: print the client's status, ignoring failures
pub fn show_status(client: &dyn VpnClient) {
    match client.status() {
        Ok(text) => print!("{}", ensure_newline(&text)),
        Err(e) => debug!("Status unavailable: {}", e),
    }
}

/// Step 2: print the public IP lookup verbatim
pub async fn lookup_ip(probe: &Probe) -> bool {
    println!("Public IP:");
    match probe.public_ip().await {
        Ok(body) => {
            print!("{}", ensure_newline(&body));
            true
        }
        Err(e) => {
            warn!("IP lookup failed: {}", e);
            false
        }
    }
}

/// Step 3: print the tunnel confirmation, warning if it is missing
pub async fn confirm_tunnel(probe: &Probe) -> bool {
    match probe.tunnel_check().await {
        Ok(body) if !body.trim().is_empty() => {
            print!("{}", ensure_newline(&body));
            true
        }
        Ok(_) => {
            warn!("Tunnel check returned an empty response");
            false
        }
        Err(e) => {
            warn!("Tunnel check failed: {}", e);
            false
        }
    }
}

/// All three steps, in order
pub async fn post_connect(client: &dyn VpnClient, probe: &Probe) {
    show_status(client);
    lookup_ip(probe).await;
    confirm_tunnel(probe).await;
}

fn ensure_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}
