//! End-to-end: Unary Executor against a real loopback `tonic` server.

#[path = "support/mod.rs"]
mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use mt5_gateway_client::{CallOptions, ClientBuilder};
use support::mock_service::{spawn_mock, MockState};

async fn connected_client(addr: std::net::SocketAddr) -> mt5_gateway_client::Client {
    support::init_tracing();
    ClientBuilder::new("demo-user", "demo-pass")
        .gateway(format!("http://{addr}"))
        .connect()
        .await
        .expect("dial mock gateway")
}

#[tokio::test]
async fn happy_path_returns_account_data() {
    let state = Arc::new(MockState::default());
    let addr = spawn_mock(state.clone()).await;
    let client = connected_client(addr).await;
    client.connect(None, CallOptions::new()).await.expect("establish session");

    let summary = client.account_summary(CallOptions::new()).await.expect("account summary");
    assert_eq!(summary.account_login, "1000");
    assert_eq!(summary.account_currency, "USD");
}

#[tokio::test]
async fn transient_transport_errors_are_retried_until_success() {
    let state = Arc::new(MockState::default());
    state.account_summary_unavailable_until.store(2, Ordering::SeqCst);
    let addr = spawn_mock(state.clone()).await;
    let client = connected_client(addr).await;
    client.connect(None, CallOptions::new()).await.expect("establish session");

    let summary = client.account_summary(CallOptions::new()).await.expect("retried account summary");
    assert_eq!(summary.account_login, "1000");
    assert!(state.account_summary_calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn session_lost_sentinel_triggers_auto_reconnect_then_retry() {
    let state = Arc::new(MockState::default());
    state.account_summary_session_lost_until.store(1, Ordering::SeqCst);
    let addr = spawn_mock(state.clone()).await;
    let client = connected_client(addr).await;
    client.connect(None, CallOptions::new()).await.expect("establish session");

    let reconnects_before = state.reconnect_calls.load(Ordering::SeqCst);
    let summary = client.account_summary(CallOptions::new()).await.expect("reconnected account summary");
    assert_eq!(summary.account_login, "1000");
    assert!(state.reconnect_calls.load(Ordering::SeqCst) > reconnects_before);
}

#[tokio::test]
async fn disconnected_client_fails_fast_without_dispatching() {
    let state = Arc::new(MockState::default());
    let addr = spawn_mock(state.clone()).await;
    let client = connected_client(addr).await;

    let err = client.account_summary(CallOptions::new()).await.unwrap_err();
    assert!(matches!(err, mt5_gateway_client::ClientError::NotConnected));
    assert_eq!(state.account_summary_calls.load(Ordering::SeqCst), 0);
}
