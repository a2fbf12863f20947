//! The `Client`: process-local object representing one logical session to
//! one gateway (spec §3). Owns the Channel Owner, the Session Identity, and
//! the bound stub bundle; wires the Metadata Injector between them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tonic::transport::Channel;
use tonic::service::interceptor::InterceptedService;

use crate::channel::ChannelOwner;
use crate::config::RetryPolicy;
use crate::error::ClientError;
use crate::executor::UnaryExecutor;
use crate::metadata::MetadataInjector;
use crate::proto::mt5_gateway_client::Mt5GatewayClient;
use crate::proto::{connect_reply, ReconnectRequest};
use crate::session::SessionIdentity;

#[derive(Debug, Clone)]
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u32,
    pub proxy_type: String,
    pub proxy_user: Option<String>,
    pub proxy_password: Option<String>,
}

/// Credentials retained for the lifetime of the client (spec §3 "Client"
/// attributes). Not re-sent on the auto-reconnect path that the executors
/// drive — spec §4.5 says `Reconnect` "recreates the terminal session
/// without new credentials" — only the explicit `connect`/`connect_ex`/
/// `connect_via_proxy` facade calls send these.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub cluster_name: Option<String>,
    pub base_symbol: Option<String>,
    pub ea_names: Vec<String>,
    pub proxy: Option<ProxyDescriptor>,
}

pub type AuthenticatedStub = Mt5GatewayClient<InterceptedService<Channel, MetadataInjector>>;

pub struct Client {
    pub(crate) channel: tokio::sync::Mutex<ChannelOwner>,
    pub(crate) session: Arc<SessionIdentity>,
    pub(crate) credentials: Credentials,
    pub(crate) plain_stub: Mt5GatewayClient<Channel>,
    pub(crate) stub: AuthenticatedStub,
    pub(crate) executor: UnaryExecutor,
    pub(crate) dial_policy: RetryPolicy,
    closed: AtomicBool,
}

impl Client {
    pub(crate) fn new(
        channel: ChannelOwner,
        session: Arc<SessionIdentity>,
        credentials: Credentials,
        retry_policy: RetryPolicy,
        dial_policy: RetryPolicy,
    ) -> Self {
        let raw_channel = channel.channel().expect("freshly dialled channel is usable");
        let plain_stub = Mt5GatewayClient::new(raw_channel.clone());
        let injector = MetadataInjector::new(session.clone());
        let stub = Mt5GatewayClient::with_interceptor(raw_channel, injector);

        Self {
            channel: tokio::sync::Mutex::new(channel),
            session,
            credentials,
            plain_stub,
            stub,
            executor: UnaryExecutor::new(retry_policy),
            dial_policy,
            closed: AtomicBool::new(false),
        }
    }

    /// Fails RPC dispatch fast (spec §3 invariant: "unconnected clients
    /// MUST NOT dispatch RPCs").
    pub fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.session.is_connected()
    }

    pub(crate) fn require_connected(&self) -> Result<(), ClientError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    pub(crate) fn session(&self) -> &SessionIdentity {
        &self.session
    }

    pub(crate) fn executor(&self) -> &UnaryExecutor {
        &self.executor
    }

    pub(crate) fn stub(&self) -> AuthenticatedStub {
        self.stub.clone()
    }

    pub(crate) fn plain_stub(&self) -> Mt5GatewayClient<Channel> {
        self.plain_stub.clone()
    }

    /// The reconnect path the Unary/Stream Executors drive on a sentinel
    /// application error (spec §4.3/§4.4). Deliberately bypasses
    /// `UnaryExecutor` itself — this is a single attempt per invocation;
    /// the caller's own retry loop decides whether to try again.
    pub(crate) async fn auto_reconnect(&self) -> Result<(), ClientError> {
        self.reconnector().reconnect().await
    }

    /// An owned, `'static` handle that can perform the same reconnect
    /// `auto_reconnect` does, without borrowing `Client` itself. The Stream
    /// Executor's pump is a spawned `tokio` task and so cannot hold a
    /// borrow of `&Client` across `.await` points — every stream wrapper in
    /// `ops::streams` hands the pump one of these instead.
    pub(crate) fn reconnector(&self) -> Reconnector {
        Reconnector { stub: self.stub(), session: self.session.clone() }
    }

    /// Idempotent: a second close is a no-op (spec §4.1).
    pub async fn close(&self) -> Result<(), ClientError> {
        self.closed.store(true, Ordering::SeqCst);
        self.session.clear();
        self.channel.lock().await.close();
        Ok(())
    }
}

/// See `Client::reconnector`.
#[derive(Clone)]
pub struct Reconnector {
    stub: AuthenticatedStub,
    session: Arc<SessionIdentity>,
}

impl Reconnector {
    pub async fn reconnect(&self) -> Result<(), ClientError> {
        let mut stub = self.stub.clone();
        let response = stub
            .reconnect(ReconnectRequest {})
            .await
            .map_err(ClientError::Transport)?
            .into_inner();

        match response.result {
            Some(connect_reply::Result::Data(data)) => {
                let id = uuid::Uuid::parse_str(&data.terminal_instance_guid)
                    .map_err(|e| ClientError::Application {
                        code: "INVALID_GUID".into(),
                        message: e.to_string(),
                    })?;
                self.session.set(id);
                Ok(())
            }
            Some(connect_reply::Result::Error(err)) => {
                Err(ClientError::Application { code: err.code, message: err.message })
            }
            None => Err(ClientError::Application {
                code: "EMPTY_REPLY".into(),
                message: "reconnect reply carried neither data nor error".into(),
            }),
        }
    }
}
