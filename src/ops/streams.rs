//! Streaming (spec §6.2: 5 methods). Each wrapper rejects an unconnected
//! client up front, same as every other typed wrapper (spec §4.6 step 1),
//! then spawns a pump via the Stream Executor and returns the `Subscription`
//! handle immediately; there is no default timeout for streams (spec §4.6 —
//! "use caller's context"), so `CallOptions` plays no role here beyond
//! header propagation.

use crate::client::Client;
use crate::error::ClientError;
use crate::executor::unary::EnvelopeResult;
use crate::executor::{StreamExecutor, Subscription};
use crate::proto::{
    OnPositionProfitData, OnPositionProfitReply, OnPositionProfitRequest,
    OnPositionsAndPendingOrdersTicketsData, OnPositionsAndPendingOrdersTicketsReply,
    OnPositionsAndPendingOrdersTicketsRequest, OnSymbolTickData, OnSymbolTickReply,
    OnSymbolTickRequest, OnTradeData, OnTradeReply, OnTradeRequest, OnTradeTransactionData,
    OnTradeTransactionReply, OnTradeTransactionRequest,
};

fn split<Data>(result: Option<impl Into<EnvelopeReplyResult<Data>>>) -> EnvelopeResult<Option<Data>> {
    match result {
        Some(variant) => match variant.into() {
            EnvelopeReplyResult::Data(data) => Ok(Some(data)),
            EnvelopeReplyResult::Error(code, message) => Err((code, message)),
        },
        None => Ok(None),
    }
}

enum EnvelopeReplyResult<Data> {
    Data(Data),
    Error(String, String),
}

impl From<crate::proto::on_symbol_tick_reply::Result> for EnvelopeReplyResult<OnSymbolTickData> {
    fn from(value: crate::proto::on_symbol_tick_reply::Result) -> Self {
        match value {
            crate::proto::on_symbol_tick_reply::Result::Data(d) => Self::Data(d),
            crate::proto::on_symbol_tick_reply::Result::Error(e) => Self::Error(e.code, e.message),
        }
    }
}

impl From<crate::proto::on_trade_reply::Result> for EnvelopeReplyResult<OnTradeData> {
    fn from(value: crate::proto::on_trade_reply::Result) -> Self {
        match value {
            crate::proto::on_trade_reply::Result::Data(d) => Self::Data(d),
            crate::proto::on_trade_reply::Result::Error(e) => Self::Error(e.code, e.message),
        }
    }
}

impl From<crate::proto::on_position_profit_reply::Result> for EnvelopeReplyResult<OnPositionProfitData> {
    fn from(value: crate::proto::on_position_profit_reply::Result) -> Self {
        match value {
            crate::proto::on_position_profit_reply::Result::Data(d) => Self::Data(d),
            crate::proto::on_position_profit_reply::Result::Error(e) => Self::Error(e.code, e.message),
        }
    }
}

impl From<crate::proto::on_positions_and_pending_orders_tickets_reply::Result>
    for EnvelopeReplyResult<OnPositionsAndPendingOrdersTicketsData>
{
    fn from(value: crate::proto::on_positions_and_pending_orders_tickets_reply::Result) -> Self {
        match value {
            crate::proto::on_positions_and_pending_orders_tickets_reply::Result::Data(d) => Self::Data(d),
            crate::proto::on_positions_and_pending_orders_tickets_reply::Result::Error(e) => {
                Self::Error(e.code, e.message)
            }
        }
    }
}

impl From<crate::proto::on_trade_transaction_reply::Result> for EnvelopeReplyResult<OnTradeTransactionData> {
    fn from(value: crate::proto::on_trade_transaction_reply::Result) -> Self {
        match value {
            crate::proto::on_trade_transaction_reply::Result::Data(d) => Self::Data(d),
            crate::proto::on_trade_transaction_reply::Result::Error(e) => Self::Error(e.code, e.message),
        }
    }
}

/// Tick feed for the given symbols.
pub fn on_symbol_tick(
    client: &Client,
    symbols: Vec<String>,
) -> Result<Subscription<OnSymbolTickData>, ClientError> {
    client.require_connected()?;
    let mut stub = client.stub();
    let reconnector = client.reconnector();
    Ok(StreamExecutor::spawn(
        move || {
            let mut stub = stub.clone();
            let symbols = symbols.clone();
            async move {
                let request = OnSymbolTickRequest { symbols };
                Ok(stub.on_symbol_tick(request).await?.into_inner())
            }
        },
        |reply: OnSymbolTickReply| split(reply.result),
        move || {
            let reconnector = reconnector.clone();
            async move { reconnector.reconnect().await }
        },
    ))
}

/// Trade events for the connected account.
pub fn on_trade(client: &Client) -> Result<Subscription<OnTradeData>, ClientError> {
    client.require_connected()?;
    let mut stub = client.stub();
    let reconnector = client.reconnector();
    Ok(StreamExecutor::spawn(
        move || {
            let mut stub = stub.clone();
            async move { Ok(stub.on_trade(OnTradeRequest {}).await?.into_inner()) }
        },
        |reply: OnTradeReply| split(reply.result),
        move || {
            let reconnector = reconnector.clone();
            async move { reconnector.reconnect().await }
        },
    ))
}

/// Per-position floating P/L, polled at `interval_ms` on the gateway side.
pub fn on_position_profit(
    client: &Client,
    interval_ms: u32,
) -> Result<Subscription<OnPositionProfitData>, ClientError> {
    client.require_connected()?;
    let mut stub = client.stub();
    let reconnector = client.reconnector();
    Ok(StreamExecutor::spawn(
        move || {
            let mut stub = stub.clone();
            async move {
                let request = OnPositionProfitRequest { interval_ms };
                Ok(stub.on_position_profit(request).await?.into_inner())
            }
        },
        |reply: OnPositionProfitReply| split(reply.result),
        move || {
            let reconnector = reconnector.clone();
            async move { reconnector.reconnect().await }
        },
    ))
}

/// Ticket-set deltas for open positions and pending orders.
pub fn on_positions_and_pending_orders_tickets(
    client: &Client,
    interval_ms: u32,
) -> Result<Subscription<OnPositionsAndPendingOrdersTicketsData>, ClientError> {
    client.require_connected()?;
    let mut stub = client.stub();
    let reconnector = client.reconnector();
    Ok(StreamExecutor::spawn(
        move || {
            let mut stub = stub.clone();
            async move {
                let request = OnPositionsAndPendingOrdersTicketsRequest { interval_ms };
                Ok(stub.on_positions_and_pending_orders_tickets(request).await?.into_inner())
            }
        },
        |reply: OnPositionsAndPendingOrdersTicketsReply| split(reply.result),
        move || {
            let reconnector = reconnector.clone();
            async move { reconnector.reconnect().await }
        },
    ))
}

/// Transaction log for the connected account.
pub fn on_trade_transaction(client: &Client) -> Result<Subscription<OnTradeTransactionData>, ClientError> {
    client.require_connected()?;
    let mut stub = client.stub();
    let reconnector = client.reconnector();
    Ok(StreamExecutor::spawn(
        move || {
            let mut stub = stub.clone();
            async move { Ok(stub.on_trade_transaction(OnTradeTransactionRequest {}).await?.into_inner()) }
        },
        |reply: OnTradeTransactionReply| split(reply.result),
        move || {
            let reconnector = reconnector.clone();
            async move { reconnector.reconnect().await }
        },
    ))
}
