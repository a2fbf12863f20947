//! Positions & orders (spec §6.2: 5 methods).

use crate::builder::default_timeouts;
use crate::client::Client;
use crate::config::CallOptions;
use crate::error::ClientError;
use crate::ops::{impl_envelope, Envelope};
use crate::proto::{
    OpenedOrderTicketsRequest, OpenedOrdersData, OpenedOrdersRequest, OrderHistoryData,
    OrderHistoryRequest, PositionsHistoryData, PositionsHistoryRequest, PositionsTotalRequest,
};

impl_envelope!(
    crate::proto::PositionsTotalReply,
    positions_total_reply,
    crate::proto::PositionsTotalData
);
impl_envelope!(crate::proto::OpenedOrdersReply, opened_orders_reply, OpenedOrdersData);
impl_envelope!(
    crate::proto::OpenedOrderTicketsReply,
    opened_order_tickets_reply,
    crate::proto::OpenedOrderTicketsData
);
impl_envelope!(crate::proto::OrderHistoryReply, order_history_reply, OrderHistoryData);
impl_envelope!(crate::proto::PositionsHistoryReply, positions_history_reply, PositionsHistoryData);

pub async fn positions_total(client: &Client, options: CallOptions) -> Result<i32, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub.positions_total(PositionsTotalRequest {}).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.total)
}

/// Snapshot of opened orders and positions (spec §4.6: 5-10s default).
pub async fn opened_orders(client: &Client, options: CallOptions) -> Result<OpenedOrdersData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SNAPSHOT);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub.opened_orders(OpenedOrdersRequest {}).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn opened_order_tickets(
    client: &Client,
    options: CallOptions,
) -> Result<Vec<u64>, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub
                        .opened_order_tickets(OpenedOrderTicketsRequest {})
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.tickets)
}

pub async fn order_history(
    client: &Client,
    from_unix: i64,
    to_unix: i64,
    symbol: Option<String>,
    options: CallOptions,
) -> Result<OrderHistoryData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::HISTORY);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let request = OrderHistoryRequest { from_unix, to_unix, symbol };
                    let reply = stub.order_history(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn positions_history(
    client: &Client,
    from_unix: i64,
    to_unix: i64,
    symbol: Option<String>,
    options: CallOptions,
) -> Result<PositionsHistoryData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::HISTORY);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let request = PositionsHistoryRequest { from_unix, to_unix, symbol };
                    let reply = stub.positions_history(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}
