//! Market depth (spec §6.2: 3 methods).

use crate::builder::default_timeouts;
use crate::client::Client;
use crate::config::CallOptions;
use crate::error::ClientError;
use crate::ops::{impl_envelope, Envelope};
use crate::proto::{MarketBookAddRequest, MarketBookGetData, MarketBookGetRequest, MarketBookReleaseRequest};

impl_envelope!(crate::proto::MarketBookAddReply, market_book_add_reply, crate::proto::MarketBookAddData);
impl_envelope!(
    crate::proto::MarketBookReleaseReply,
    market_book_release_reply,
    crate::proto::MarketBookReleaseData
);
impl_envelope!(crate::proto::MarketBookGetReply, market_book_get_reply, MarketBookGetData);

pub async fn market_book_add(
    client: &Client,
    symbol: String,
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
                    let reply = stub.market_book_add(MarketBookAddRequest { symbol }).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.added)
}

pub async fn market_book_release(
    client: &Client,
    symbol: String,
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
                        .market_book_release(MarketBookReleaseRequest { symbol })
                        .await?
                        .into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.released)
}

/// Market-depth snapshot (spec §4.6: 5-10s default, like opened-orders).
pub async fn market_book_get(
    client: &Client,
    symbol: String,
    options: CallOptions,
) -> Result<MarketBookGetData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SNAPSHOT);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                let symbol = symbol.clone();
                async move {
                    let reply = stub.market_book_get(MarketBookGetRequest { symbol }).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}
