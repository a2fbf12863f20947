//! Connection Lifecycle Facade (spec §4.5): the six connection RPCs,
//! each dispatched through the Unary Executor so each benefits from
//! retry/reconnect when appropriate, with lifecycle side effects on
//! Session Identity.

use uuid::Uuid;

use crate::builder::default_timeouts;
use crate::client::{Client, ProxyDescriptor};
use crate::config::CallOptions;
use crate::error::ClientError;
use crate::ops::{impl_envelope, Envelope};
use crate::proto::{
    CheckConnectRequest, ConnectExRequest, ConnectRequest, ConnectViaProxyRequest,
    DisconnectRequest, ProxyDescriptor as WireProxyDescriptor, ReconnectRequest,
};

impl_envelope!(crate::proto::ConnectReply, connect_reply, crate::proto::ConnectData);
impl_envelope!(
    crate::proto::CheckConnectReply,
    check_connect_reply,
    crate::proto::CheckConnectData
);
impl_envelope!(crate::proto::DisconnectReply, disconnect_reply, crate::proto::DisconnectData);

fn install_session_id(client: &Client, guid: &str) -> Result<(), ClientError> {
    let id = Uuid::parse_str(guid)
        .map_err(|e| ClientError::Application { code: "INVALID_GUID".into(), message: e.to_string() })?;
    client.session().set(id);
    Ok(())
}

/// Basic connect: user, password, optional server name.
pub async fn connect(
    client: &Client,
    server_name: Option<String>,
    options: CallOptions,
) -> Result<(), ClientError> {
    let timeout = options.resolve_timeout(default_timeouts::CONNECT);
    let request = ConnectRequest {
        user: client.credentials.user.clone(),
        password: client.credentials.password.clone(),
        server_name,
    };
    let mut stub = client.plain_stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = request.clone();
                async move {
                    let reply = stub.connect(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    install_session_id(client, &data.terminal_instance_guid)
}

/// Extended connect: cluster name, optional base symbol, optional
/// readiness timeout hint, optional EA list.
pub async fn connect_ex(
    client: &Client,
    waiting_time_seconds: Option<u32>,
    options: CallOptions,
) -> Result<(), ClientError> {
    let timeout = options.resolve_timeout(default_timeouts::CONNECT);
    let cluster_name = client
        .credentials
        .cluster_name
        .clone()
        .ok_or_else(|| ClientError::InvalidRequest("cluster_name is required for connect_ex".into()))?;

    let request = ConnectExRequest {
        user: client.credentials.user.clone(),
        password: client.credentials.password.clone(),
        cluster_name,
        base_symbol: client.credentials.base_symbol.clone(),
        waiting_time_seconds,
        ea_names: client.credentials.ea_names.clone(),
    };
    let mut stub = client.plain_stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = request.clone();
                async move {
                    let reply = stub.connect_ex(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    install_session_id(client, &data.terminal_instance_guid)
}

/// Connect via an intermediate proxy: identical to basic connect plus a
/// proxy descriptor.
pub async fn connect_via_proxy(
    client: &Client,
    server_name: Option<String>,
    options: CallOptions,
) -> Result<(), ClientError> {
    let timeout = options.resolve_timeout(default_timeouts::CONNECT);
    let proxy = client
        .credentials
        .proxy
        .clone()
        .ok_or_else(|| ClientError::InvalidRequest("proxy descriptor is required".into()))?;

    let request = ConnectViaProxyRequest {
        user: client.credentials.user.clone(),
        password: client.credentials.password.clone(),
        server_name,
        proxy: Some(to_wire_proxy(proxy)),
    };
    let mut stub = client.plain_stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = request.clone();
                async move {
                    let reply = stub.connect_via_proxy(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    install_session_id(client, &data.terminal_instance_guid)
}

fn to_wire_proxy(proxy: ProxyDescriptor) -> WireProxyDescriptor {
    WireProxyDescriptor {
        host: proxy.host,
        port: proxy.port,
        proxy_type: proxy.proxy_type,
        proxy_user: proxy.proxy_user,
        proxy_password: proxy.proxy_password,
    }
}

/// Lightweight ping; returns whether the session is still live on the
/// gateway side.
pub async fn check_connect(client: &Client, options: CallOptions) -> Result<bool, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::CHECK_OR_DISCONNECT);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub.check_connect(CheckConnectRequest {}).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.connected)
}

/// Recreates the terminal session without new credentials; returns a new
/// identifier. This is the public facade call — the executors also invoke
/// the same RPC internally (`Client::auto_reconnect`) when they detect a
/// session-lost sentinel code; that internal path is not routed through
/// this function to avoid the Unary Executor recursing into itself.
pub async fn reconnect(client: &Client, options: CallOptions) -> Result<(), ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::RECONNECT);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub.reconnect(ReconnectRequest {}).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    install_session_id(client, &data.terminal_instance_guid)
}

/// Terminates the remote terminal session. Idempotent: calling it on an
/// already-disconnected client yields the benign `NotConnected` error
/// rather than corrupting state (spec §8 round-trip property).
pub async fn disconnect(client: &Client, options: CallOptions) -> Result<(), ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::CHECK_OR_DISCONNECT);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub.disconnect(DisconnectRequest {}).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    client.session().clear();
    Ok(())
}
