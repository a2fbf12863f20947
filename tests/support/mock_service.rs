//! In-process mock gateway used by the integration tests. Implements the
//! full `Mt5Gateway` server trait so a real `tonic` `Channel` can dial it
//! over loopback TCP, but only a handful of RPCs carry test-controllable
//! behavior (`account_summary`, `check_connect`, `reconnect`,
//! `on_symbol_tick`); everything else returns a fixed, successful reply so
//! the service trait is satisfiable without one bespoke test per RPC.

use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use mt5_gateway_client::proto::mt5_gateway_server::{Mt5Gateway, Mt5GatewayServer};
use mt5_gateway_client::proto::*;

/// Shared knobs the test body flips before/while a request is in flight.
pub struct MockState {
    /// `account_summary` returns `Status::unavailable` this many times
    /// before it starts answering successfully.
    pub account_summary_unavailable_until: AtomicU32,
    /// `account_summary` returns the session-lost sentinel this many times
    /// before it starts answering successfully (checked after the
    /// transport-failure budget above is exhausted).
    pub account_summary_session_lost_until: AtomicU32,
    pub account_summary_calls: AtomicU32,
    pub reconnect_calls: AtomicU32,
    /// Number of ticks `on_symbol_tick` emits before closing the stream.
    pub tick_count: AtomicU32,
    pub on_symbol_tick_calls: AtomicU32,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            account_summary_unavailable_until: AtomicU32::new(0),
            account_summary_session_lost_until: AtomicU32::new(0),
            account_summary_calls: AtomicU32::new(0),
            reconnect_calls: AtomicU32::new(0),
            tick_count: AtomicU32::new(3),
            on_symbol_tick_calls: AtomicU32::new(0),
        }
    }
}

pub struct MockGateway {
    pub state: Arc<MockState>,
}

fn sentinel_error() -> Error {
    Error {
        code: "TERMINAL_INSTANCE_NOT_FOUND".into(),
        message: "terminal instance not found".into(),
        detail: String::new(),
    }
}

#[tonic::async_trait]
impl Mt5Gateway for MockGateway {
    async fn connect(&self, _request: Request<ConnectRequest>) -> Result<Response<ConnectReply>, Status> {
        Ok(Response::new(ConnectReply {
            result: Some(connect_reply::Result::Data(ConnectData {
                terminal_instance_guid: uuid::Uuid::new_v4().to_string(),
            })),
        }))
    }

    async fn connect_ex(&self, _request: Request<ConnectExRequest>) -> Result<Response<ConnectReply>, Status> {
        Ok(Response::new(ConnectReply {
            result: Some(connect_reply::Result::Data(ConnectData {
                terminal_instance_guid: uuid::Uuid::new_v4().to_string(),
            })),
        }))
    }

    async fn connect_via_proxy(
        &self,
        _request: Request<ConnectViaProxyRequest>,
    ) -> Result<Response<ConnectReply>, Status> {
        Ok(Response::new(ConnectReply {
            result: Some(connect_reply::Result::Data(ConnectData {
                terminal_instance_guid: uuid::Uuid::new_v4().to_string(),
            })),
        }))
    }

    async fn check_connect(
        &self,
        _request: Request<CheckConnectRequest>,
    ) -> Result<Response<CheckConnectReply>, Status> {
        Ok(Response::new(CheckConnectReply {
            result: Some(check_connect_reply::Result::Data(CheckConnectData { connected: true })),
        }))
    }

    async fn reconnect(&self, _request: Request<ReconnectRequest>) -> Result<Response<ConnectReply>, Status> {
        self.state.reconnect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(ConnectReply {
            result: Some(connect_reply::Result::Data(ConnectData {
                terminal_instance_guid: uuid::Uuid::new_v4().to_string(),
            })),
        }))
    }

    async fn disconnect(&self, _request: Request<DisconnectRequest>) -> Result<Response<DisconnectReply>, Status> {
        Ok(Response::new(DisconnectReply {
            result: Some(disconnect_reply::Result::Data(DisconnectData {})),
        }))
    }

    async fn account_summary(
        &self,
        _request: Request<AccountSummaryRequest>,
    ) -> Result<Response<AccountSummaryReply>, Status> {
        let call = self.state.account_summary_calls.fetch_add(1, Ordering::SeqCst);

        let unavailable_until = self.state.account_summary_unavailable_until.load(Ordering::SeqCst);
        if call < unavailable_until {
            return Err(Status::unavailable("mock transient failure"));
        }

        let session_lost_until = self.state.account_summary_session_lost_until.load(Ordering::SeqCst);
        if call < unavailable_until + session_lost_until {
            return Ok(Response::new(AccountSummaryReply {
                result: Some(account_summary_reply::Result::Error(sentinel_error())),
            }));
        }

        Ok(Response::new(AccountSummaryReply {
            result: Some(account_summary_reply::Result::Data(AccountSummaryData {
                account_login: "1000".into(),
                account_currency: "USD".into(),
                account_balance: 10_000.0,
                account_equity: 10_000.0,
                account_margin: 0.0,
                account_margin_free: 10_000.0,
                server_time_unix: 0,
            })),
        }))
    }

    async fn account_info_double(
        &self,
        _request: Request<AccountInfoDoubleRequest>,
    ) -> Result<Response<AccountInfoDoubleReply>, Status> {
        Ok(Response::new(AccountInfoDoubleReply {
            result: Some(account_info_double_reply::Result::Data(AccountInfoDoubleData { value: 0.0 })),
        }))
    }

    async fn account_info_integer(
        &self,
        _request: Request<AccountInfoIntegerRequest>,
    ) -> Result<Response<AccountInfoIntegerReply>, Status> {
        Ok(Response::new(AccountInfoIntegerReply {
            result: Some(account_info_integer_reply::Result::Data(AccountInfoIntegerData { value: 0 })),
        }))
    }

    async fn account_info_string(
        &self,
        _request: Request<AccountInfoStringRequest>,
    ) -> Result<Response<AccountInfoStringReply>, Status> {
        Ok(Response::new(AccountInfoStringReply {
            result: Some(account_info_string_reply::Result::Data(AccountInfoStringData {
                value: String::new(),
            })),
        }))
    }

    async fn symbols_total(
        &self,
        _request: Request<SymbolsTotalRequest>,
    ) -> Result<Response<SymbolsTotalReply>, Status> {
        Ok(Response::new(SymbolsTotalReply {
            result: Some(symbols_total_reply::Result::Data(SymbolsTotalData { total: 0 })),
        }))
    }

    async fn symbol_exist(
        &self,
        _request: Request<SymbolExistRequest>,
    ) -> Result<Response<SymbolExistReply>, Status> {
        Ok(Response::new(SymbolExistReply {
            result: Some(symbol_exist_reply::Result::Data(SymbolExistData { exists: true })),
        }))
    }

    async fn symbol_name(
        &self,
        _request: Request<SymbolNameRequest>,
    ) -> Result<Response<SymbolNameReply>, Status> {
        Ok(Response::new(SymbolNameReply {
            result: Some(symbol_name_reply::Result::Data(SymbolNameData { name: "EURUSD".into() })),
        }))
    }

    async fn symbol_select(
        &self,
        _request: Request<SymbolSelectRequest>,
    ) -> Result<Response<SymbolSelectReply>, Status> {
        Ok(Response::new(SymbolSelectReply {
            result: Some(symbol_select_reply::Result::Data(SymbolSelectData { selected: true })),
        }))
    }

    async fn symbol_is_synchronized(
        &self,
        _request: Request<SymbolIsSynchronizedRequest>,
    ) -> Result<Response<SymbolIsSynchronizedReply>, Status> {
        Ok(Response::new(SymbolIsSynchronizedReply {
            result: Some(symbol_is_synchronized_reply::Result::Data(SymbolIsSynchronizedData {
                synchronized: true,
            })),
        }))
    }

    async fn symbol_info_double(
        &self,
        _request: Request<SymbolInfoDoubleRequest>,
    ) -> Result<Response<SymbolInfoDoubleReply>, Status> {
        Ok(Response::new(SymbolInfoDoubleReply {
            result: Some(symbol_info_double_reply::Result::Data(SymbolInfoDoubleData { value: 0.0 })),
        }))
    }

    async fn symbol_info_integer(
        &self,
        _request: Request<SymbolInfoIntegerRequest>,
    ) -> Result<Response<SymbolInfoIntegerReply>, Status> {
        Ok(Response::new(SymbolInfoIntegerReply {
            result: Some(symbol_info_integer_reply::Result::Data(SymbolInfoIntegerData { value: 0 })),
        }))
    }

    async fn symbol_info_string(
        &self,
        _request: Request<SymbolInfoStringRequest>,
    ) -> Result<Response<SymbolInfoStringReply>, Status> {
        Ok(Response::new(SymbolInfoStringReply {
            result: Some(symbol_info_string_reply::Result::Data(SymbolInfoStringData {
                value: String::new(),
            })),
        }))
    }

    async fn symbol_info_margin_rate(
        &self,
        _request: Request<SymbolInfoMarginRateRequest>,
    ) -> Result<Response<SymbolInfoMarginRateReply>, Status> {
        Ok(Response::new(SymbolInfoMarginRateReply {
            result: Some(symbol_info_margin_rate_reply::Result::Data(SymbolInfoMarginRateData {
                initial_margin_rate: 1.0,
                maintenance_margin_rate: 1.0,
            })),
        }))
    }

    async fn symbol_info_tick(
        &self,
        _request: Request<SymbolInfoTickRequest>,
    ) -> Result<Response<SymbolInfoTickReply>, Status> {
        Ok(Response::new(SymbolInfoTickReply {
            result: Some(symbol_info_tick_reply::Result::Data(SymbolInfoTickData {
                symbol: "EURUSD".into(),
                bid: 1.1,
                ask: 1.1001,
                last: 1.1,
                volume: 1,
                time_unix: 0,
            })),
        }))
    }

    async fn symbol_info_session_quote(
        &self,
        _request: Request<SymbolInfoSessionQuoteRequest>,
    ) -> Result<Response<SymbolInfoSessionQuoteReply>, Status> {
        Ok(Response::new(SymbolInfoSessionQuoteReply {
            result: Some(symbol_info_session_quote_reply::Result::Data(SymbolInfoSessionQuoteData {
                from_unix: 0,
                to_unix: 0,
            })),
        }))
    }

    async fn symbol_info_session_trade(
        &self,
        _request: Request<SymbolInfoSessionTradeRequest>,
    ) -> Result<Response<SymbolInfoSessionTradeReply>, Status> {
        Ok(Response::new(SymbolInfoSessionTradeReply {
            result: Some(symbol_info_session_trade_reply::Result::Data(SymbolInfoSessionTradeData {
                from_unix: 0,
                to_unix: 0,
            })),
        }))
    }

    async fn symbol_params_many(
        &self,
        _request: Request<SymbolParamsManyRequest>,
    ) -> Result<Response<SymbolParamsManyReply>, Status> {
        Ok(Response::new(SymbolParamsManyReply {
            result: Some(symbol_params_many_reply::Result::Data(SymbolParamsManyData { symbols: vec![] })),
        }))
    }

    async fn symbol_info_tick_value_with_size(
        &self,
        _request: Request<SymbolInfoTickValueWithSizeRequest>,
    ) -> Result<Response<SymbolInfoTickValueWithSizeReply>, Status> {
        Ok(Response::new(SymbolInfoTickValueWithSizeReply {
            result: Some(symbol_info_tick_value_with_size_reply::Result::Data(
                SymbolInfoTickValueWithSizeData { tick_value: 1.0, tick_size: 0.00001 },
            )),
        }))
    }

    async fn positions_total(
        &self,
        _request: Request<PositionsTotalRequest>,
    ) -> Result<Response<PositionsTotalReply>, Status> {
        Ok(Response::new(PositionsTotalReply {
            result: Some(positions_total_reply::Result::Data(PositionsTotalData { total: 0 })),
        }))
    }

    async fn opened_orders(
        &self,
        _request: Request<OpenedOrdersRequest>,
    ) -> Result<Response<OpenedOrdersReply>, Status> {
        Ok(Response::new(OpenedOrdersReply {
            result: Some(opened_orders_reply::Result::Data(OpenedOrdersData {
                positions: vec![],
                orders: vec![],
            })),
        }))
    }

    async fn opened_order_tickets(
        &self,
        _request: Request<OpenedOrderTicketsRequest>,
    ) -> Result<Response<OpenedOrderTicketsReply>, Status> {
        Ok(Response::new(OpenedOrderTicketsReply {
            result: Some(opened_order_tickets_reply::Result::Data(OpenedOrderTicketsData { tickets: vec![] })),
        }))
    }

    async fn order_history(
        &self,
        _request: Request<OrderHistoryRequest>,
    ) -> Result<Response<OrderHistoryReply>, Status> {
        Ok(Response::new(OrderHistoryReply {
            result: Some(order_history_reply::Result::Data(OrderHistoryData { orders: vec![] })),
        }))
    }

    async fn positions_history(
        &self,
        _request: Request<PositionsHistoryRequest>,
    ) -> Result<Response<PositionsHistoryReply>, Status> {
        Ok(Response::new(PositionsHistoryReply {
            result: Some(positions_history_reply::Result::Data(PositionsHistoryData { deals: vec![] })),
        }))
    }

    async fn market_book_add(
        &self,
        _request: Request<MarketBookAddRequest>,
    ) -> Result<Response<MarketBookAddReply>, Status> {
        Ok(Response::new(MarketBookAddReply {
            result: Some(market_book_add_reply::Result::Data(MarketBookAddData { added: true })),
        }))
    }

    async fn market_book_release(
        &self,
        _request: Request<MarketBookReleaseRequest>,
    ) -> Result<Response<MarketBookReleaseReply>, Status> {
        Ok(Response::new(MarketBookReleaseReply {
            result: Some(market_book_release_reply::Result::Data(MarketBookReleaseData { released: true })),
        }))
    }

    async fn market_book_get(
        &self,
        _request: Request<MarketBookGetRequest>,
    ) -> Result<Response<MarketBookGetReply>, Status> {
        Ok(Response::new(MarketBookGetReply {
            result: Some(market_book_get_reply::Result::Data(MarketBookGetData { entries: vec![] })),
        }))
    }

    async fn order_send(&self, _request: Request<OrderSendRequest>) -> Result<Response<OrderSendReply>, Status> {
        Ok(Response::new(OrderSendReply {
            result: Some(order_send_reply::Result::Data(OrderSendData {
                returned_code: 10009,
                order_ticket: 1,
                deal_ticket: 1,
                volume_executed: 1.0,
                price_executed: 1.1,
            })),
        }))
    }

    async fn order_modify(
        &self,
        _request: Request<OrderModifyRequest>,
    ) -> Result<Response<OrderModifyReply>, Status> {
        Ok(Response::new(OrderModifyReply {
            result: Some(order_modify_reply::Result::Data(OrderModifyData { returned_code: 10009 })),
        }))
    }

    async fn order_close(&self, _request: Request<OrderCloseRequest>) -> Result<Response<OrderCloseReply>, Status> {
        Ok(Response::new(OrderCloseReply {
            result: Some(order_close_reply::Result::Data(OrderCloseData { returned_code: 10009, deal_ticket: 1 })),
        }))
    }

    async fn order_check(&self, _request: Request<OrderCheckRequest>) -> Result<Response<OrderCheckReply>, Status> {
        Ok(Response::new(OrderCheckReply {
            result: Some(order_check_reply::Result::Data(OrderCheckData {
                returned_code: 0,
                margin_required: 10.0,
                free_margin_after: 9_990.0,
            })),
        }))
    }

    async fn order_calc_margin(
        &self,
        _request: Request<OrderCalcMarginRequest>,
    ) -> Result<Response<OrderCalcMarginReply>, Status> {
        Ok(Response::new(OrderCalcMarginReply {
            result: Some(order_calc_margin_reply::Result::Data(OrderCalcMarginData { margin: 10.0 })),
        }))
    }

    async fn order_calc_profit(
        &self,
        _request: Request<OrderCalcProfitRequest>,
    ) -> Result<Response<OrderCalcProfitReply>, Status> {
        Ok(Response::new(OrderCalcProfitReply {
            result: Some(order_calc_profit_reply::Result::Data(OrderCalcProfitData { profit: 1.0 })),
        }))
    }

    type OnSymbolTickStream = Pin<Box<dyn tokio_stream::Stream<Item = Result<OnSymbolTickReply, Status>> + Send>>;

    async fn on_symbol_tick(
        &self,
        _request: Request<OnSymbolTickRequest>,
    ) -> Result<Response<Self::OnSymbolTickStream>, Status> {
        self.state.on_symbol_tick_calls.fetch_add(1, Ordering::SeqCst);
        let count = self.state.tick_count.load(Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(async move {
            for i in 0..count {
                let reply = OnSymbolTickReply {
                    result: Some(on_symbol_tick_reply::Result::Data(OnSymbolTickData {
                        tick: Some(SymbolInfoTickData {
                            symbol: "EURUSD".into(),
                            bid: 1.1 + i as f64 * 0.0001,
                            ask: 1.1001 + i as f64 * 0.0001,
                            last: 1.1,
                            volume: 1,
                            time_unix: i as i64,
                        }),
                    })),
                };
                if tx.send(Ok(reply)).await.is_err() {
                    break;
                }
            }
        });
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    type OnTradeStream = Pin<Box<dyn tokio_stream::Stream<Item = Result<OnTradeReply, Status>> + Send>>;

    async fn on_trade(
        &self,
        _request: Request<OnTradeRequest>,
    ) -> Result<Response<Self::OnTradeStream>, Status> {
        let (_tx, rx) = mpsc::channel::<Result<OnTradeReply, Status>>(1);
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    type OnPositionProfitStream =
        Pin<Box<dyn tokio_stream::Stream<Item = Result<OnPositionProfitReply, Status>> + Send>>;

    async fn on_position_profit(
        &self,
        _request: Request<OnPositionProfitRequest>,
    ) -> Result<Response<Self::OnPositionProfitStream>, Status> {
        let (_tx, rx) = mpsc::channel::<Result<OnPositionProfitReply, Status>>(1);
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    type OnPositionsAndPendingOrdersTicketsStream = Pin<
        Box<dyn tokio_stream::Stream<Item = Result<OnPositionsAndPendingOrdersTicketsReply, Status>> + Send>,
    >;

    async fn on_positions_and_pending_orders_tickets(
        &self,
        _request: Request<OnPositionsAndPendingOrdersTicketsRequest>,
    ) -> Result<Response<Self::OnPositionsAndPendingOrdersTicketsStream>, Status> {
        let (_tx, rx) = mpsc::channel::<Result<OnPositionsAndPendingOrdersTicketsReply, Status>>(1);
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    type OnTradeTransactionStream =
        Pin<Box<dyn tokio_stream::Stream<Item = Result<OnTradeTransactionReply, Status>> + Send>>;

    async fn on_trade_transaction(
        &self,
        _request: Request<OnTradeTransactionRequest>,
    ) -> Result<Response<Self::OnTradeTransactionStream>, Status> {
        let (_tx, rx) = mpsc::channel::<Result<OnTradeTransactionReply, Status>>(1);
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}

/// Starts the mock gateway on an ephemeral loopback port and returns its
/// address plus the shared state handle the test uses to steer behavior.
pub async fn spawn_mock(state: Arc<MockState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");

    let gateway = MockGateway { state };
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(Mt5GatewayServer::new(gateway))
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .expect("mock server");
    });

    addr
}
