//! Shared harness: a real server on an ephemeral port backed by the memory store.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use liquidity_ledger::app::build_app;
use liquidity_ledger::app_state::AppState;
use liquidity_ledger::config::MissingPoolPolicy;
use liquidity_ledger::domain::EventBus;
use liquidity_ledger::service::LedgerService;
use liquidity_ledger::storage::MemoryStore;
use serde_json::Value;

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(MissingPoolPolicy::Record).await
    }

    pub async fn start_with(policy: MissingPoolPolicy) -> Self {
        let ledger = LedgerService::new(Arc::new(MemoryStore::new()), EventBus::new(64), policy);
        let app = build_app(AppState::new(ledger));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind ephemeral port");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self.client.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        read(resp).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let Ok(resp) = self.client.post(self.url(path)).json(body).send().await else {
            panic!("POST {path} failed");
        };
        read(resp).await
    }

    pub async fn create_pool(&self, address: &str, owner: &str, liquidity: u64) -> Value {
        let (status, body) = self
            .post(
                "/api/pools",
                &serde_json::json!({
                    "address": address,
                    "owner": owner,
                    "totalLiquidity": liquidity,
                }),
            )
            .await;
        assert_eq!(status, 201, "create pool {address}: {body}");
        body
    }

    pub async fn migrate(&self, from: &str, to: &str, amount: u64) -> (u16, Value) {
        self.post(
            "/api/transactions",
            &serde_json::json!({
                "type": "migrate_liquidity",
                "fromAddress": from,
                "toAddress": to,
                "amount": amount,
            }),
        )
        .await
    }

    pub async fn liquidity(&self, address: &str) -> u64 {
        let (status, body) = self.get(&format!("/api/pools/{address}")).await;
        assert_eq!(status, 200, "fetch pool {address}: {body}");
        body.get("totalLiquidity")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| panic!("totalLiquidity missing: {body}"))
    }
}

async fn read(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

pub fn error_code(body: &Value) -> Option<u64> {
    body.get("error")?.get("code")?.as_u64()
}
