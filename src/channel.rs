//! Channel Owner (spec §4.1): dials and holds the single secured transport
//! to the gateway. Construction shape grounded in
//! `modkit-transport-grpc`'s `connect_with_stack` (dial timeout, HTTP/2
//! keepalive, TLS via `tonic::transport::Endpoint`); the TLS builder itself
//! mirrors the teacher's `transport::connector` pattern of a small
//! configuration struct that produces a ready-to-use connector.

use std::time::Duration;

use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::error::ClientError;

/// Dial parameters fixed by spec §4.1/§6.1. Not part of `ClientBuilder`
/// because the spec treats them as contractual, not tunable per-call.
const DIAL_TIMEOUT: Duration = Duration::from_secs(30);
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(20);
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the transport. `close()` is idempotent; once closed every further
/// call must fail with `ClientError::NotConnected` (enforced by
/// `is_usable`, consulted by the executors before every dispatch).
pub struct ChannelOwner {
    channel: Option<Channel>,
}

impl ChannelOwner {
    /// Dials the gateway. Blocking up to `DIAL_TIMEOUT`; dial failure is
    /// fatal — the caller cannot construct a `Client` without a channel.
    pub async fn dial(address: &str, domain_name: Option<&str>) -> Result<Self, ClientError> {
        let plaintext = address.starts_with("http://");
        let uri = if plaintext || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("https://{address}")
        };

        let mut endpoint = Endpoint::from_shared(uri).map_err(|e| ClientError::DialFailed(e.to_string()))?;

        // An explicit `http://` gateway address opts out of TLS entirely —
        // used for dialing a plaintext h2c endpoint (e.g. a local gateway
        // or test harness). Anything else is always secured (spec §4.1).
        if !plaintext {
            let mut tls = ClientTlsConfig::new().with_enabled_roots();
            if let Some(domain) = domain_name {
                tls = tls.domain_name(domain);
            }
            endpoint = endpoint.tls_config(tls).map_err(|e| ClientError::DialFailed(e.to_string()))?;
        }

        // No `.timeout(...)` here: that's an `Endpoint`-level ceiling applied
        // to every RPC dispatched over the channel, unary and streaming
        // alike, which would silently cap the per-call deadlines the Unary
        // Executor already enforces from `CallOptions` (spec §4.6) and tear
        // down long-lived streams that the spec says have no automatic
        // deadline. `connect_timeout` only bounds the initial dial below.
        let endpoint = endpoint
            .connect_timeout(DIAL_TIMEOUT)
            .tcp_keepalive(Some(KEEPALIVE_INTERVAL))
            .http2_keep_alive_interval(KEEPALIVE_INTERVAL)
            .keep_alive_timeout(KEEPALIVE_TIMEOUT)
            .keep_alive_while_idle(true);

        let channel = tokio::time::timeout(DIAL_TIMEOUT, endpoint.connect())
            .await
            .map_err(|_| ClientError::DialFailed("dial timed out".into()))?
            .map_err(|e| ClientError::DialFailed(e.to_string()))?;

        Ok(Self { channel: Some(channel) })
    }

    pub fn is_usable(&self) -> bool {
        self.channel.is_some()
    }

    pub fn channel(&self) -> Result<Channel, ClientError> {
        self.channel.clone().ok_or(ClientError::NotConnected)
    }

    /// Idempotent: calling `close` twice is a no-op the second time.
    pub fn close(&mut self) {
        self.channel = None;
    }
}

/// A literal IP address in the gateway address suppresses SNI (spec §4.1);
/// anything else is treated as a hostname and used as the TLS server name.
pub fn sni_domain_name(address: &str) -> Option<&str> {
    let host = if let Some(rest) = address.strip_prefix('[') {
        rest.split(']').next().unwrap_or(rest)
    } else {
        address.rsplit_once(':').map(|(host, _port)| host).unwrap_or(address)
    };
    if host.parse::<std::net::IpAddr>().is_ok() {
        None
    } else {
        Some(host)
    }
}
