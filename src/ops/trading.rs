//! Trading (spec §6.2: 6 methods) plus the `returned_code` predicates spec
//! §6.3/§7 require as part of the library's surface.
//!
//! The trading `returned_code` is never reclassified by the core: whether a
//! trade succeeded is the caller's decision (spec §7). These wrappers pass
//! it through unchanged, same as every other payload field.

use crate::builder::default_timeouts;
use crate::client::Client;
use crate::config::CallOptions;
use crate::error::ClientError;
use crate::ops::{impl_envelope, Envelope};
use crate::proto::{
    OrderCalcMarginData, OrderCalcMarginRequest, OrderCalcProfitData, OrderCalcProfitRequest,
    OrderCheckData, OrderCheckRequest, OrderCloseData, OrderCloseRequest, OrderModifyData,
    OrderModifyRequest, OrderSendData, OrderSendRequest,
};

impl_envelope!(crate::proto::OrderSendReply, order_send_reply, OrderSendData);
impl_envelope!(crate::proto::OrderModifyReply, order_modify_reply, OrderModifyData);
impl_envelope!(crate::proto::OrderCloseReply, order_close_reply, OrderCloseData);
impl_envelope!(crate::proto::OrderCheckReply, order_check_reply, OrderCheckData);
impl_envelope!(crate::proto::OrderCalcMarginReply, order_calc_margin_reply, OrderCalcMarginData);
impl_envelope!(crate::proto::OrderCalcProfitReply, order_calc_profit_reply, OrderCalcProfitData);

/// Numeric `returned_code` bands (spec §6.3). Independent of the envelope's
/// `error.code` — an RPC can transport-succeed, envelope-succeed, and still
/// carry a non-success trading code in its payload.
pub mod codes {
    pub const PENDING_PLACED: u32 = 10008;
    pub const DONE: u32 = 10009;
    pub const DONE_PARTIAL: u32 = 10010;

    const TRANSIENT: [u32; 8] = [10004, 10020, 10012, 10021, 10024, 10028, 10029, 10031];
    const REQUOTE: [u32; 2] = [10004, 10020];

    pub fn is_success(code: u32) -> bool {
        matches!(code, PENDING_PLACED | DONE | DONE_PARTIAL)
    }

    pub fn is_requote(code: u32) -> bool {
        REQUOTE.contains(&code)
    }

    /// Transient codes a *caller* may choose to retry on (price changed,
    /// timeout, no quotes, too many requests, locked, frozen, no
    /// trade-server connection). The core itself never retries on these —
    /// see the module doc comment.
    pub fn is_retryable(code: u32) -> bool {
        TRANSIENT.contains(&code)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn success_band_matches_spec() {
            assert!(is_success(10008));
            assert!(is_success(10009));
            assert!(is_success(10010));
            assert!(!is_success(10004));
        }

        #[test]
        fn requote_is_a_subset_of_retryable() {
            assert!(is_requote(10004));
            assert!(is_requote(10020));
            assert!(is_retryable(10004));
            assert!(!is_requote(10012));
            assert!(is_retryable(10012));
        }

        #[test]
        fn everything_else_is_terminal() {
            assert!(!is_success(10014));
            assert!(!is_retryable(10014));
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn order_send(
    client: &Client,
    symbol: String,
    operation: i32,
    volume: f64,
    price: Option<f64>,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    comment: Option<String>,
    magic: Option<u64>,
    options: CallOptions,
) -> Result<OrderSendData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::TRADING);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = OrderSendRequest {
                    symbol: symbol.clone(),
                    operation,
                    volume,
                    price,
                    stop_loss,
                    take_profit,
                    comment: comment.clone(),
                    magic,
                };
                async move {
                    let reply = stub.order_send(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn order_modify(
    client: &Client,
    ticket: u64,
    price: Option<f64>,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    options: CallOptions,
) -> Result<OrderModifyData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::TRADING);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = OrderModifyRequest { ticket, price, stop_loss, take_profit };
                async move {
                    let reply = stub.order_modify(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn order_close(
    client: &Client,
    ticket: u64,
    volume: Option<f64>,
    options: CallOptions,
) -> Result<OrderCloseData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::TRADING);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = OrderCloseRequest { ticket, volume };
                async move {
                    let reply = stub.order_close(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

/// Advisory only — a successful `OrderCheck` does not guarantee a
/// subsequent `OrderSend` with identical parameters will succeed (spec §9).
pub async fn order_check(
    client: &Client,
    symbol: String,
    operation: i32,
    volume: f64,
    price: Option<f64>,
    options: CallOptions,
) -> Result<OrderCheckData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::CALCULATOR);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = OrderCheckRequest { symbol: symbol.clone(), operation, volume, price };
                async move {
                    let reply = stub.order_check(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn order_calc_margin(
    client: &Client,
    symbol: String,
    operation: i32,
    volume: f64,
    price: f64,
    options: CallOptions,
) -> Result<OrderCalcMarginData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::CALCULATOR);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = OrderCalcMarginRequest { symbol: symbol.clone(), operation, volume, price };
                async move {
                    let reply = stub.order_calc_margin(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn order_calc_profit(
    client: &Client,
    symbol: String,
    operation: i32,
    volume: f64,
    price_open: f64,
    price_close: f64,
    options: CallOptions,
) -> Result<OrderCalcProfitData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::CALCULATOR);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let request = OrderCalcProfitRequest {
                    symbol: symbol.clone(),
                    operation,
                    volume,
                    price_open,
                    price_close,
                };
                async move {
                    let reply = stub.order_calc_profit(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}
