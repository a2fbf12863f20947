//! Symbol information (spec §6.2: 14 methods).

use crate::builder::default_timeouts;
use crate::client::Client;
use crate::config::CallOptions;
use crate::error::ClientError;
use crate::ops::{impl_envelope, Envelope};
use crate::proto::{
    SymbolExistRequest, SymbolInfoDoubleRequest, SymbolInfoIntegerRequest,
    SymbolInfoMarginRateData, SymbolInfoMarginRateRequest, SymbolInfoSessionQuoteData,
    SymbolInfoSessionQuoteRequest, SymbolInfoSessionTradeData, SymbolInfoSessionTradeRequest,
    SymbolInfoStringRequest, SymbolInfoTickData, SymbolInfoTickRequest,
    SymbolInfoTickValueWithSizeData, SymbolInfoTickValueWithSizeRequest, SymbolIsSynchronizedRequest,
    SymbolNameRequest, SymbolParamsManyData, SymbolParamsManyRequest, SymbolSelectRequest,
    SymbolsTotalRequest,
};

impl_envelope!(crate::proto::SymbolsTotalReply, symbols_total_reply, crate::proto::SymbolsTotalData);
impl_envelope!(crate::proto::SymbolExistReply, symbol_exist_reply, crate::proto::SymbolExistData);
impl_envelope!(crate::proto::SymbolNameReply, symbol_name_reply, crate::proto::SymbolNameData);
impl_envelope!(crate::proto::SymbolSelectReply, symbol_select_reply, crate::proto::SymbolSelectData);
impl_envelope!(
    crate::proto::SymbolIsSynchronizedReply,
    symbol_is_synchronized_reply,
    crate::proto::SymbolIsSynchronizedData
);
impl_envelope!(
    crate::proto::SymbolInfoDoubleReply,
    symbol_info_double_reply,
    crate::proto::SymbolInfoDoubleData
);
impl_envelope!(
    crate::proto::SymbolInfoIntegerReply,
    symbol_info_integer_reply,
    crate::proto::SymbolInfoIntegerData
);
impl_envelope!(
    crate::proto::SymbolInfoStringReply,
    symbol_info_string_reply,
    crate::proto::SymbolInfoStringData
);
impl_envelope!(
    crate::proto::SymbolInfoMarginRateReply,
    symbol_info_margin_rate_reply,
    SymbolInfoMarginRateData
);
impl_envelope!(crate::proto::SymbolInfoTickReply, symbol_info_tick_reply, SymbolInfoTickData);
impl_envelope!(
    crate::proto::SymbolInfoSessionQuoteReply,
    symbol_info_session_quote_reply,
    SymbolInfoSessionQuoteData
);
impl_envelope!(
    crate::proto::SymbolInfoSessionTradeReply,
    symbol_info_session_trade_reply,
    SymbolInfoSessionTradeData
);
impl_envelope!(crate::proto::SymbolParamsManyReply, symbol_params_many_reply, SymbolParamsManyData);
impl_envelope!(
    crate::proto::SymbolInfoTickValueWithSizeReply,
    symbol_info_tick_value_with_size_reply,
    SymbolInfoTickValueWithSizeData
);

/// Total selected/visible symbols (caller chooses which with `selected_only`).
pub async fn symbols_total(
    client: &Client,
    selected_only: Option<bool>,
    options: CallOptions,
) -> Result<i32, ClientError> {
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
                        .symbols_total(SymbolsTotalRequest { selected_only })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.total)
}

pub async fn symbol_exist(
    client: &Client,
    symbol: String,
    options: CallOptions,
) -> Result<bool, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub.symbol_exist(SymbolExistRequest { symbol }).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.exists)
}

pub async fn symbol_name(
    client: &Client,
    index: i32,
    selected_only: Option<bool>,
    options: CallOptions,
) -> Result<String, ClientError> {
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
                        .symbol_name(SymbolNameRequest { index, selected_only })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.name)
}

pub async fn symbol_select(
    client: &Client,
    symbol: String,
    select: bool,
    options: CallOptions,
) -> Result<bool, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SUBSCRIBE_UNSUBSCRIBE);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub
                        .symbol_select(SymbolSelectRequest { symbol, select })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.selected)
}

pub async fn symbol_is_synchronized(
    client: &Client,
    symbol: String,
    options: CallOptions,
) -> Result<bool, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub
                        .symbol_is_synchronized(SymbolIsSynchronizedRequest { symbol })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.synchronized)
}

pub async fn symbol_info_double(
    client: &Client,
    symbol: String,
    property_id: i32,
    options: CallOptions,
) -> Result<f64, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub
                        .symbol_info_double(SymbolInfoDoubleRequest { symbol, property_id })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.value)
}

pub async fn symbol_info_integer(
    client: &Client,
    symbol: String,
    property_id: i32,
    options: CallOptions,
) -> Result<i64, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub
                        .symbol_info_integer(SymbolInfoIntegerRequest { symbol, property_id })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.value)
}

pub async fn symbol_info_string(
    client: &Client,
    symbol: String,
    property_id: i32,
    options: CallOptions,
) -> Result<String, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    let data = client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub
                        .symbol_info_string(SymbolInfoStringRequest { symbol, property_id })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.value)
}

pub async fn symbol_info_margin_rate(
    client: &Client,
    symbol: String,
    order_type: i32,
    options: CallOptions,
) -> Result<SymbolInfoMarginRateData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SUBSCRIBE_UNSUBSCRIBE);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub
                        .symbol_info_margin_rate(SymbolInfoMarginRateRequest { symbol, order_type })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn symbol_info_tick(
    client: &Client,
    symbol: String,
    options: CallOptions,
) -> Result<SymbolInfoTickData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SUBSCRIBE_UNSUBSCRIBE);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub.symbol_info_tick(SymbolInfoTickRequest { symbol }).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn symbol_info_session_quote(
    client: &Client,
    symbol: String,
    day_of_week: i32,
    session_index: u32,
    options: CallOptions,
) -> Result<SymbolInfoSessionQuoteData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SUBSCRIBE_UNSUBSCRIBE);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let request = SymbolInfoSessionQuoteRequest { symbol, day_of_week, session_index };
                    let reply = stub.symbol_info_session_quote(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn symbol_info_session_trade(
    client: &Client,
    symbol: String,
    day_of_week: i32,
    session_index: u32,
    options: CallOptions,
) -> Result<SymbolInfoSessionTradeData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SUBSCRIBE_UNSUBSCRIBE);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let request = SymbolInfoSessionTradeRequest { symbol, day_of_week, session_index };
                    let reply = stub.symbol_info_session_trade(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

/// Batch read of parameters for many symbols at once (spec §4.6: "Detailed
/// parameters for many symbols (batch read)" — 10s default).
pub async fn symbol_params_many(
    client: &Client,
    symbols: Vec<String>,
    options: CallOptions,
) -> Result<SymbolParamsManyData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::BATCH_READ);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbols = symbols.clone();
                async move {
                    let reply = stub
                        .symbol_params_many(SymbolParamsManyRequest { symbols })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn symbol_info_tick_value_with_size(
    client: &Client,
    symbol: String,
    options: CallOptions,
) -> Result<SymbolInfoTickValueWithSizeData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SUBSCRIBE_UNSUBSCRIBE);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let request = SymbolInfoTickValueWithSizeRequest { symbol };
                    let reply = stub.symbol_info_tick_value_with_size(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}
