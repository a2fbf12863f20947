//! Account information (spec §6.2: 4 methods).

use crate::builder::default_timeouts;
use crate::client::Client;
use crate::config::CallOptions;
use crate::error::ClientError;
use crate::ops::{impl_envelope, Envelope};
use crate::proto::{
    AccountInfoDoublePropertyId, AccountInfoDoubleRequest, AccountInfoIntegerPropertyId,
    AccountInfoIntegerRequest, AccountInfoStringPropertyId, AccountInfoStringRequest,
    AccountSummaryData, AccountSummaryRequest,
};

impl_envelope!(crate::proto::AccountSummaryReply, account_summary_reply, AccountSummaryData);
impl_envelope!(
    crate::proto::AccountInfoDoubleReply,
    account_info_double_reply,
    crate::proto::AccountInfoDoubleData
);
impl_envelope!(
    crate::proto::AccountInfoIntegerReply,
    account_info_integer_reply,
    crate::proto::AccountInfoIntegerData
);
impl_envelope!(
    crate::proto::AccountInfoStringReply,
    account_info_string_reply,
    crate::proto::AccountInfoStringData
);

pub async fn account_summary(
    client: &Client,
    options: CallOptions,
) -> Result<AccountSummaryData, ClientError> {
    client.require_connected()?;
    let timeout = options.resolve_timeout(default_timeouts::SHORT_READ);
    let mut stub = client.stub();

    client
        .executor()
        .call(
            timeout,
            move || {
                let mut stub = stub.clone();
                async move {
                    let reply = stub.account_summary(AccountSummaryRequest {}).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await
}

pub async fn account_info_double(
    client: &Client,
    property_id: AccountInfoDoublePropertyId,
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
                async move {
                    let request = AccountInfoDoubleRequest { property_id: property_id as i32 };
                    let reply = stub.account_info_double(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.value)
}

pub async fn account_info_integer(
    client: &Client,
    property_id: AccountInfoIntegerPropertyId,
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
                async move {
                    let request = AccountInfoIntegerRequest { property_id: property_id as i32 };
                    let reply = stub.account_info_integer(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.value)
}

pub async fn account_info_string(
    client: &Client,
    property_id: AccountInfoStringPropertyId,
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
                    let request = AccountInfoStringRequest { property_id: property_id as i32 };
                    let reply = stub.account_info_string(request).await?.into_inner();
                    Ok(reply.into_result())
                }
            },
            || client.auto_reconnect(),
        )
        .await?;

    Ok(data.value)
}
