//! Client for a remote MetaTrader 5 terminal exposed over a gRPC gateway.
//!
//! The crate's core is the session-bound RPC runtime: [`Client`] owns a
//! secured channel to the gateway, injects the current session identifier
//! into every call via [`metadata::MetadataInjector`], classifies transport
//! and application errors, and transparently recovers from transient
//! channel faults and terminal-side session loss for both unary calls
//! ([`executor::UnaryExecutor`]) and server-streaming subscriptions
//! ([`executor::StreamExecutor`]).
//!
//! # Connecting
//!
//! ```no_run
//! # async fn run() -> Result<(), mt5_gateway_client::ClientError> {
//! use mt5_gateway_client::ClientBuilder;
//!
//! let client = ClientBuilder::new("login", "password").connect().await?;
//! client.connect(None, Default::default()).await?;
//!
//! let summary = client.account_summary(Default::default()).await?;
//! println!("balance = {}", summary.account_balance);
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming
//!
//! ```no_run
//! # async fn run(client: &mt5_gateway_client::Client) -> Result<(), mt5_gateway_client::ClientError> {
//! let mut ticks = client.on_symbol_tick(vec!["EURUSD".to_string()])?;
//! while let Some(tick) = ticks.data.recv().await {
//!     // ...
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Scope
//!
//! This crate does not interpret trading semantics (margin, P/L, order
//! validity are terminal/broker concerns), does not persist state across
//! restarts, does not multiplex multiple terminal sessions through one
//! `Client`, and does not load-balance across gateways. Configuration
//! loading, CLI dispatch and higher-level trade idioms (trailing stops,
//! grid traders, risk managers) are out of scope; compose them on top of
//! this client.

mod builder;
mod channel;
pub mod client;
pub mod config;
pub mod error;
mod metadata;
pub mod ops;
pub mod session;

pub mod proto {
    #![allow(clippy::all)]
    tonic::include_proto!("mt5");
}

pub use builder::{default_timeouts, ClientBuilder, DEFAULT_GATEWAY};
pub use client::{Client, Credentials, ProxyDescriptor};
pub use config::{CallOptions, RetryPolicy};
pub use error::ClientError;
pub use executor::Subscription;

mod executor;

use config::CallOptions;
use proto::{
    AccountInfoDoublePropertyId, AccountInfoIntegerPropertyId, AccountInfoStringPropertyId,
    AccountSummaryData, MarketBookGetData, OnPositionProfitData,
    OnPositionsAndPendingOrdersTicketsData, OnSymbolTickData, OnTradeData, OnTradeTransactionData,
    OpenedOrdersData, OrderCalcMarginData, OrderCalcProfitData, OrderCheckData, OrderCloseData,
    OrderHistoryData, OrderModifyData, OrderSendData, PositionsHistoryData,
    SymbolInfoMarginRateData, SymbolInfoSessionQuoteData, SymbolInfoSessionTradeData,
    SymbolInfoTickData, SymbolInfoTickValueWithSizeData, SymbolParamsManyData,
};

/// Ergonomic inherent methods mirroring `ops::*`, so callers write
/// `client.account_summary(opts)` instead of
/// `ops::account::account_summary(&client, opts)`. Each one is a direct,
/// uncomplicated forward — the real logic lives in `ops`.
impl Client {
    pub async fn connect(&self, server_name: Option<String>, options: CallOptions) -> Result<(), ClientError> {
        ops::connection::connect(self, server_name, options).await
    }

    pub async fn connect_ex(
        &self,
        waiting_time_seconds: Option<u32>,
        options: CallOptions,
    ) -> Result<(), ClientError> {
        ops::connection::connect_ex(self, waiting_time_seconds, options).await
    }

    pub async fn connect_via_proxy(
        &self,
        server_name: Option<String>,
        options: CallOptions,
    ) -> Result<(), ClientError> {
        ops::connection::connect_via_proxy(self, server_name, options).await
    }

    pub async fn check_connect(&self, options: CallOptions) -> Result<bool, ClientError> {
        ops::connection::check_connect(self, options).await
    }

    pub async fn reconnect(&self, options: CallOptions) -> Result<(), ClientError> {
        ops::connection::reconnect(self, options).await
    }

    pub async fn disconnect(&self, options: CallOptions) -> Result<(), ClientError> {
        ops::connection::disconnect(self, options).await
    }

    pub async fn account_summary(&self, options: CallOptions) -> Result<AccountSummaryData, ClientError> {
        ops::account::account_summary(self, options).await
    }

    pub async fn account_info_double(
        &self,
        property_id: AccountInfoDoublePropertyId,
        options: CallOptions,
    ) -> Result<f64, ClientError> {
        ops::account::account_info_double(self, property_id, options).await
    }

    pub async fn account_info_integer(
        &self,
        property_id: AccountInfoIntegerPropertyId,
        options: CallOptions,
    ) -> Result<i64, ClientError> {
        ops::account::account_info_integer(self, property_id, options).await
    }

    pub async fn account_info_string(
        &self,
        property_id: AccountInfoStringPropertyId,
        options: CallOptions,
    ) -> Result<String, ClientError> {
        ops::account::account_info_string(self, property_id, options).await
    }

    pub async fn symbols_total(
        &self,
        selected_only: Option<bool>,
        options: CallOptions,
    ) -> Result<i32, ClientError> {
        ops::symbol::symbols_total(self, selected_only, options).await
    }

    pub async fn symbol_exist(&self, symbol: String, options: CallOptions) -> Result<bool, ClientError> {
        ops::symbol::symbol_exist(self, symbol, options).await
    }

    pub async fn symbol_name(
        &self,
        index: i32,
        selected_only: Option<bool>,
        options: CallOptions,
    ) -> Result<String, ClientError> {
        ops::symbol::symbol_name(self, index, selected_only, options).await
    }

    pub async fn symbol_select(
        &self,
        symbol: String,
        select: bool,
        options: CallOptions,
    ) -> Result<bool, ClientError> {
        ops::symbol::symbol_select(self, symbol, select, options).await
    }

    pub async fn symbol_is_synchronized(
        &self,
        symbol: String,
        options: CallOptions,
    ) -> Result<bool, ClientError> {
        ops::symbol::symbol_is_synchronized(self, symbol, options).await
    }

    pub async fn symbol_info_double(
        &self,
        symbol: String,
        property_id: i32,
        options: CallOptions,
    ) -> Result<f64, ClientError> {
        ops::symbol::symbol_info_double(self, symbol, property_id, options).await
    }

    pub async fn symbol_info_integer(
        &self,
        symbol: String,
        property_id: i32,
        options: CallOptions,
    ) -> Result<i64, ClientError> {
        ops::symbol::symbol_info_integer(self, symbol, property_id, options).await
    }

    pub async fn symbol_info_string(
        &self,
        symbol: String,
        property_id: i32,
        options: CallOptions,
    ) -> Result<String, ClientError> {
        ops::symbol::symbol_info_string(self, symbol, property_id, options).await
    }

    pub async fn symbol_info_margin_rate(
        &self,
        symbol: String,
        order_type: i32,
        options: CallOptions,
    ) -> Result<SymbolInfoMarginRateData, ClientError> {
        ops::symbol::symbol_info_margin_rate(self, symbol, order_type, options).await
    }

    pub async fn symbol_info_tick(
        &self,
        symbol: String,
        options: CallOptions,
    ) -> Result<SymbolInfoTickData, ClientError> {
        ops::symbol::symbol_info_tick(self, symbol, options).await
    }

    pub async fn symbol_info_session_quote(
        &self,
        symbol: String,
        day_of_week: i32,
        session_index: u32,
        options: CallOptions,
    ) -> Result<SymbolInfoSessionQuoteData, ClientError> {
        ops::symbol::symbol_info_session_quote(self, symbol, day_of_week, session_index, options).await
    }

    pub async fn symbol_info_session_trade(
        &self,
        symbol: String,
        day_of_week: i32,
        session_index: u32,
        options: CallOptions,
    ) -> Result<SymbolInfoSessionTradeData, ClientError> {
        ops::symbol::symbol_info_session_trade(self, symbol, day_of_week, session_index, options).await
    }

    pub async fn symbol_params_many(
        &self,
        symbols: Vec<String>,
        options: CallOptions,
    ) -> Result<SymbolParamsManyData, ClientError> {
        ops::symbol::symbol_params_many(self, symbols, options).await
    }

    pub async fn symbol_info_tick_value_with_size(
        &self,
        symbol: String,
        options: CallOptions,
    ) -> Result<SymbolInfoTickValueWithSizeData, ClientError> {
        ops::symbol::symbol_info_tick_value_with_size(self, symbol, options).await
    }

    pub async fn positions_total(&self, options: CallOptions) -> Result<i32, ClientError> {
        ops::positions::positions_total(self, options).await
    }

    pub async fn opened_orders(&self, options: CallOptions) -> Result<OpenedOrdersData, ClientError> {
        ops::positions::opened_orders(self, options).await
    }

    pub async fn opened_order_tickets(&self, options: CallOptions) -> Result<Vec<u64>, ClientError> {
        ops::positions::opened_order_tickets(self, options).await
    }

    pub async fn order_history(
        &self,
        from_unix: i64,
        to_unix: i64,
        symbol: Option<String>,
        options: CallOptions,
    ) -> Result<OrderHistoryData, ClientError> {
        ops::positions::order_history(self, from_unix, to_unix, symbol, options).await
    }

    pub async fn positions_history(
        &self,
        from_unix: i64,
        to_unix: i64,
        symbol: Option<String>,
        options: CallOptions,
    ) -> Result<PositionsHistoryData, ClientError> {
        ops::positions::positions_history(self, from_unix, to_unix, symbol, options).await
    }

    pub async fn market_book_add(&self, symbol: String, options: CallOptions) -> Result<bool, ClientError> {
        ops::market_depth::market_book_add(self, symbol, options).await
    }

    pub async fn market_book_release(
        &self,
        symbol: String,
        options: CallOptions,
    ) -> Result<bool, ClientError> {
        ops::market_depth::market_book_release(self, symbol, options).await
    }

    pub async fn market_book_get(
        &self,
        symbol: String,
        options: CallOptions,
    ) -> Result<MarketBookGetData, ClientError> {
        ops::market_depth::market_book_get(self, symbol, options).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn order_send(
        &self,
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
        ops::trading::order_send(
            self, symbol, operation, volume, price, stop_loss, take_profit, comment, magic, options,
        )
        .await
    }

    pub async fn order_modify(
        &self,
        ticket: u64,
        price: Option<f64>,
        stop_loss: Option<f64>,
        take_profit: Option<f64>,
        options: CallOptions,
    ) -> Result<OrderModifyData, ClientError> {
        ops::trading::order_modify(self, ticket, price, stop_loss, take_profit, options).await
    }

    pub async fn order_close(
        &self,
        ticket: u64,
        volume: Option<f64>,
        options: CallOptions,
    ) -> Result<OrderCloseData, ClientError> {
        ops::trading::order_close(self, ticket, volume, options).await
    }

    pub async fn order_check(
        &self,
        symbol: String,
        operation: i32,
        volume: f64,
        price: Option<f64>,
        options: CallOptions,
    ) -> Result<OrderCheckData, ClientError> {
        ops::trading::order_check(self, symbol, operation, volume, price, options).await
    }

    pub async fn order_calc_margin(
        &self,
        symbol: String,
        operation: i32,
        volume: f64,
        price: f64,
        options: CallOptions,
    ) -> Result<OrderCalcMarginData, ClientError> {
        ops::trading::order_calc_margin(self, symbol, operation, volume, price, options).await
    }

    pub async fn order_calc_profit(
        &self,
        symbol: String,
        operation: i32,
        volume: f64,
        price_open: f64,
        price_close: f64,
        options: CallOptions,
    ) -> Result<OrderCalcProfitData, ClientError> {
        ops::trading::order_calc_profit(self, symbol, operation, volume, price_open, price_close, options)
            .await
    }

    pub fn on_symbol_tick(
        &self,
        symbols: Vec<String>,
    ) -> Result<Subscription<OnSymbolTickData>, ClientError> {
        ops::streams::on_symbol_tick(self, symbols)
    }

    pub fn on_trade(&self) -> Result<Subscription<OnTradeData>, ClientError> {
        ops::streams::on_trade(self)
    }

    pub fn on_position_profit(
        &self,
        interval_ms: u32,
    ) -> Result<Subscription<OnPositionProfitData>, ClientError> {
        ops::streams::on_position_profit(self, interval_ms)
    }

    pub fn on_positions_and_pending_orders_tickets(
        &self,
        interval_ms: u32,
    ) -> Result<Subscription<OnPositionsAndPendingOrdersTicketsData>, ClientError> {
        ops::streams::on_positions_and_pending_orders_tickets(self, interval_ms)
    }

    pub fn on_trade_transaction(&self) -> Result<Subscription<OnTradeTransactionData>, ClientError> {
        ops::streams::on_trade_transaction(self)
    }
}
