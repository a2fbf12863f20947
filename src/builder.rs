//! `ClientBuilder`: the one configuration surface this crate has (spec §10.3
//! — no env/file loading). Fluent shape grounded in the teacher's
//! `ClientBuilder`, narrowed to what the spec's `Client` constructor takes
//! (spec §3): gateway address, credentials, optional initial identifier,
//! plus overridable retry/dial knobs.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::channel::{sni_domain_name, ChannelOwner};
use crate::client::{Client, Credentials, ProxyDescriptor};
use crate::config::RetryPolicy;
use crate::error::ClientError;
use crate::session::SessionIdentity;

/// Matches spec §6.1's default gateway.
pub const DEFAULT_GATEWAY: &str = "mt5.mrpc.pro:443";

#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    gateway: Option<String>,
    user: Option<String>,
    password: Option<String>,
    cluster_name: Option<String>,
    base_symbol: Option<String>,
    ea_names: Vec<String>,
    proxy: Option<ProxyDescriptor>,
    initial_session_id: Option<Uuid>,
    retry_policy: Option<RetryPolicy>,
    dial_policy: Option<RetryPolicy>,
    tls_domain_override: Option<String>,
}

impl ClientBuilder {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn gateway(mut self, address: impl Into<String>) -> Self {
        self.gateway = Some(address.into());
        self
    }

    pub fn cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = Some(name.into());
        self
    }

    pub fn base_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.base_symbol = Some(symbol.into());
        self
    }

    pub fn ea_names(mut self, names: Vec<String>) -> Self {
        self.ea_names = names;
        self
    }

    pub fn proxy(mut self, proxy: ProxyDescriptor) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn initial_session_id(mut self, id: Uuid) -> Self {
        self.initial_session_id = Some(id);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn dial_policy(mut self, policy: RetryPolicy) -> Self {
        self.dial_policy = Some(policy);
        self
    }

    /// Overrides the TLS server name used for SNI; by default it is derived
    /// from the gateway address's host portion (spec §4.1).
    pub fn tls_domain(mut self, domain: impl Into<String>) -> Self {
        self.tls_domain_override = Some(domain.into());
        self
    }

    /// Dials the channel and constructs the client. The channel is dialled
    /// eagerly with a bounded timeout (spec §3); dial failure is fatal, so
    /// this returns `Result` rather than the client itself.
    pub async fn connect(self) -> Result<Client, ClientError> {
        let gateway = self.gateway.unwrap_or_else(|| DEFAULT_GATEWAY.to_string());
        let user = self.user.ok_or_else(|| ClientError::InvalidRequest("user is required".into()))?;
        let password = self
            .password
            .ok_or_else(|| ClientError::InvalidRequest("password is required".into()))?;

        let domain = self
            .tls_domain_override
            .as_deref()
            .or_else(|| sni_domain_name(&gateway));
        let channel = ChannelOwner::dial(&gateway, domain).await?;

        let session = Arc::new(SessionIdentity::new(self.initial_session_id));
        let credentials = Credentials {
            user,
            password,
            cluster_name: self.cluster_name,
            base_symbol: self.base_symbol,
            ea_names: self.ea_names,
            proxy: self.proxy,
        };

        Ok(Client::new(
            channel,
            session,
            credentials,
            self.retry_policy.unwrap_or_default(),
            self.dial_policy.unwrap_or_else(RetryPolicy::dial_default),
        ))
    }
}

/// Per-RPC default timeouts when the caller did not supply one (spec §4.5,
/// §4.6). Grouped here rather than scattered across `ops/*` so the whole
/// table lives in one place, like spec §4.6's table.
pub mod default_timeouts {
    use std::time::Duration;

    pub const CONNECT: Duration = Duration::from_secs(30);
    pub const CHECK_OR_DISCONNECT: Duration = Duration::from_secs(3);
    pub const RECONNECT: Duration = Duration::from_secs(10);

    pub const SHORT_READ: Duration = Duration::from_secs(3);
    pub const SUBSCRIBE_UNSUBSCRIBE: Duration = Duration::from_secs(5);
    pub const SNAPSHOT: Duration = Duration::from_secs(10);
    pub const BATCH_READ: Duration = Duration::from_secs(10);
    pub const HISTORY: Duration = Duration::from_secs(15);
    pub const TRADING: Duration = Duration::from_secs(30);
    pub const CALCULATOR: Duration = Duration::from_secs(10);
}
