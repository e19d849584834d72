use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use whalewatch::feeds::ApiTransactionsResponse;
use whalewatch::watch::WatchRules;

/// Rules used across tests: BTC only, BINANCE allow-listed and primary.
#[allow(dead_code)]
pub fn test_rules(lookahead_ticks: u64) -> WatchRules {
    WatchRules {
        symbols: vec!["BTC".into()],
        exchanges: vec!["BINANCE".into()],
        primary_exchange: "BINANCE".into(),
        lookahead_ticks,
        price_assets: vec!["BTC".into(), "BNB".into()],
        utc_offset: FixedOffset::east_opt(0).unwrap(),
    }
}

/// Feed transaction JSON. `from_owner`/`to_owner` of `None` means unknown.
#[allow(dead_code)]
pub fn tx_json(
    symbol: &str,
    amount_usd: i64,
    timestamp: i64,
    from_owner: Option<&str>,
    to_owner: Option<&str>,
) -> serde_json::Value {
    let party = |owner: Option<&str>| match owner {
        Some(name) => json!({ "address": "addr", "owner": name, "owner_type": "exchange" }),
        None => json!({ "address": "addr", "owner_type": "unknown" }),
    };
    json!({
        "blockchain": "bitcoin",
        "symbol": symbol,
        "hash": format!("hash_{timestamp}"),
        "timestamp": timestamp,
        "amount": 10,
        "amount_usd": amount_usd,
        "from": party(from_owner),
        "to": party(to_owner),
    })
}

#[allow(dead_code)]
pub fn success_body(transactions: Vec<serde_json::Value>) -> String {
    json!({
        "result": "success",
        "count": transactions.len(),
        "transactions": transactions,
    })
    .to_string()
}

#[allow(dead_code)]
pub fn feed_response(transactions: Vec<serde_json::Value>) -> ApiTransactionsResponse {
    serde_json::from_str(&success_body(transactions)).expect("valid feed fixture")
}

/// The canonical qualifying transfer: 600k USD of BTC from unknown into BINANCE.
#[allow(dead_code)]
pub fn binance_inflow(timestamp: i64) -> serde_json::Value {
    tx_json("btc", 600_000, timestamp, None, Some("binance"))
}

#[allow(dead_code)]
pub fn prices(btc: i64, bnb: i64) -> Vec<Decimal> {
    vec![Decimal::from(btc), Decimal::from(bnb)]
}

/// Scratch log file inside a fresh temp dir. The dir is removed on drop, so
/// keep the guard alive for the whole test.
#[allow(dead_code)]
pub fn scratch_log(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(format!("{name}.log"));
    (dir, path)
}

// ---------------------------------------------------------------------------
// Stub HTTP server
// ---------------------------------------------------------------------------

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[allow(dead_code)]
type Routes = Arc<Mutex<HashMap<String, (u16, String)>>>;

/// Local axum server answering canned JSON bodies. Routes match the full
/// request target first, then the bare path. Unrouted requests get a 404.
#[allow(dead_code)]
#[derive(Clone)]
pub struct StubServer {
    pub addr: SocketAddr,
    routes: Routes,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let server = Self {
            addr,
            routes: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .fallback(record_and_respond)
            .with_state(server.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        server
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn route(&self, target: &str, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .insert(target.to_string(), (status, body.into()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }

    fn lookup(&self, target: &str, path: &str) -> (u16, String) {
        let routes = self.routes.lock().unwrap();
        routes
            .get(target)
            .or_else(|| routes.get(path))
            .cloned()
            .unwrap_or((404, "{}".into()))
    }
}

#[allow(dead_code)]
async fn record_and_respond(
    State(stub): State<StubServer>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let (status, resp_body) = stub.lookup(&target, uri.path());

    stub.requests.lock().unwrap().push(RecordedRequest {
        method: method.as_str().to_string(),
        target,
        headers: headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
        body,
    });

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        resp_body,
    )
}
