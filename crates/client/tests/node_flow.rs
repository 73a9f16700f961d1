//! Integration tests for [`NodeClient`] against a mock node gateway and a
//! mock signing service.

use alloy::{dyn_abi::DynSolValue, primitives::U256};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use rsa::{pkcs1::EncodeRsaPrivateKey, RsaPrivateKey};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, OnceLock};
use tokenup_client::{ClientError, NodeClient, SignerClient};
use tokenup_sign::ProxySignRequest;
use tokenup_types::{CallRequest, NodeConfig, SignerConfig, TransactRequest, TxStatus, TxType};

const BALANCE_ABI: &str = r#"[
    {
        "type": "function",
        "name": "balanceOf",
        "inputs": [{ "name": "owner", "type": "address" }],
        "outputs": [{ "name": "", "type": "uint256" }],
        "stateMutability": "view"
    }
]"#;

/// Deterministic signing key as base64 PKCS#1 DER, generated once per test
/// process.
fn test_private_key() -> &'static String {
    static KEY: OnceLock<String> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        STANDARD.encode(key.to_pkcs1_der().unwrap().as_bytes())
    })
}

/// Captured traffic of the mock gateway.
#[derive(Clone, Default)]
struct MockNode {
    estimates: Arc<Mutex<Vec<Value>>>,
    transacts: Arc<Mutex<Vec<Value>>>,
}

/// Captured submissions of the mock signing service. Signing jobs complete
/// on the first status query, with a fixed signature.
#[derive(Clone, Default)]
struct MockSigner {
    requests: Arc<Mutex<Vec<ProxySignRequest>>>,
}

async fn estimate(State(node): State<MockNode>, Json(body): Json<Value>) -> Json<Value> {
    node.estimates.lock().unwrap().push(body);
    Json(json!({
        "message": "success",
        "data": { "gas_price": "0x4a817c800", "gas": "0x5208", "nonce": 9, "chain_id": 1 },
    }))
}

async fn transact(State(node): State<MockNode>, Json(body): Json<Value>) -> Json<Value> {
    node.transacts.lock().unwrap().push(body);
    Json(json!({
        "message": "success",
        "data": {
            "gas_price": "0x4a817c800",
            "gas_limit": "0x5208",
            "tx_hash": "0xfeed",
            "status": 1,
            "notify_status": 0,
            "type": 1,
        },
    }))
}

async fn detail(Path(hash): Path<String>) -> Json<Value> {
    Json(json!({
        "message": "success",
        "data": {
            "gas_price": "0x1",
            "gas_limit": "0x2",
            "tx_hash": hash,
            "status": 2,
            "notify_status": 1,
            "type": 2,
        },
    }))
}

async fn call(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "success", "data": format!("0x{:064x}", 7u64) }))
}

async fn sign_hash(
    State(signer): State<MockSigner>,
    Json(envelope): Json<ProxySignRequest>,
) -> Json<Value> {
    signer.requests.lock().unwrap().push(envelope);
    Json(json!({
        "status": { "code": 200, "message": "success" },
        "data": { "request_id": "req-node-1" },
    }))
}

async fn trace(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({
        "status": { "code": 200, "message": "success" },
        "data": { "result": { "data": "0xaabbcc" } },
    }))
}

fn node_router(state: MockNode) -> Router {
    Router::new()
        .route("/tx/estimate", post(estimate))
        .route("/tx/transact", post(transact))
        .route("/tx/call", post(call))
        .route("/tx/{hash}", get(detail))
        .with_state(state)
}

fn signer_router(state: MockSigner) -> Router {
    Router::new()
        .route("/vendor/proxy/sign_hash", post(sign_hash))
        .route("/vendor/status/tracing", post(trace))
        .with_state(state)
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

async fn node_client(state: MockNode, version: &str) -> NodeClient {
    let url = serve(Router::new().nest(&format!("/{version}"), node_router(state))).await;
    let config = NodeConfig::new(url).with_api_version(version);
    NodeClient::from_config(config).unwrap()
}

async fn signer_client(state: MockSigner) -> SignerClient {
    let url = serve(signer_router(state)).await;
    let config = SignerConfig::new(url, "app-1", "key-1", test_private_key().as_str());
    SignerClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn estimate_fills_the_fee_policy_and_parses_the_data() {
    let state = MockNode::default();
    let estimates = state.estimates.clone();
    let node = node_client(state, "v1").await;

    let data = node
        .estimate(node.estimate_request("0xaaa", "0xbbb", "0xdead"))
        .await
        .unwrap();

    assert_eq!(data.gas_price, "0x4a817c800");
    assert_eq!(data.gas, "0x5208");
    assert_eq!(data.nonce, 9);
    assert_eq!(data.chain_id, 1);

    let sent = estimates.lock().unwrap();
    assert_eq!(sent[0]["from"], "0xaaa");
    assert_eq!(sent[0]["to"], "0xbbb");
    assert_eq!(sent[0]["fee_limit"], 50_000_000u64);
    assert_eq!(sent[0]["gas_price_min"], 2_000_000_000u64);
    assert_eq!(sent[0]["gas_price_max"], 30_000_000_000u64);
}

#[tokio::test]
async fn send_tx_completes_signs_and_submits() {
    let signer_state = MockSigner::default();
    let sign_requests = signer_state.requests.clone();
    let signer = signer_client(signer_state).await;

    let node_state = MockNode::default();
    let transacts = node_state.transacts.clone();
    let node = node_client(node_state, "v1").await;

    let record = node
        .send_tx(
            TransactRequest {
                from: "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".to_string(),
                to: "0x3535353535353535353535353535353535353535".to_string(),
                value: "0xde0b6b3a7640000".to_string(),
                notify_url: "http://caller.example/notify".to_string(),
                ..Default::default()
            },
            &signer,
        )
        .await
        .unwrap();

    assert_eq!(record.tx_hash, "0xfeed");
    assert_eq!(record.status, TxStatus::Pending);
    assert_eq!(record.kind, TxType::Call);

    // The submission was completed from the estimate before signing: empty
    // gas price and zero nonce filled in, estimated gas limit installed.
    let submitted = transacts.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0]["gas_price"], "0x4a817c800");
    assert_eq!(submitted[0]["gas_limit"], "0x5208");
    assert_eq!(submitted[0]["nonce"], 9);
    assert_eq!(submitted[0]["notify_url"], "http://caller.example/notify");
    assert_eq!(submitted[0]["signature"], "0xaabbcc");

    // The payload forwarded for signing is the EIP-155 signing hash of the
    // completed transaction.
    let signed = sign_requests.lock().unwrap();
    assert_eq!(signed.len(), 1);
    assert_eq!(
        signed[0].data,
        "0xdaf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
    );
    assert_eq!(signed[0].address, "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f");
    assert_eq!(signed[0].extras, "tokenup-sdk");
    assert!(signed[0].order_id.starts_with("sign_"));
}

#[tokio::test]
async fn send_tx_keeps_caller_fields_but_not_the_gas_limit() {
    let signer = signer_client(MockSigner::default()).await;

    let node_state = MockNode::default();
    let transacts = node_state.transacts.clone();
    let node = node_client(node_state, "v1").await;

    node.send_tx(
        TransactRequest {
            from: "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".to_string(),
            to: "0x3535353535353535353535353535353535353535".to_string(),
            nonce: 3,
            gas_price: "0x77359400".to_string(),
            gas_limit: "0xffff".to_string(),
            ..Default::default()
        },
        &signer,
    )
    .await
    .unwrap();

    let submitted = transacts.lock().unwrap();
    assert_eq!(submitted[0]["nonce"], 3);
    assert_eq!(submitted[0]["gas_price"], "0x77359400");
    // The estimated gas limit replaces the caller's.
    assert_eq!(submitted[0]["gas_limit"], "0x5208");
}

#[tokio::test]
async fn send_tx_fills_the_notify_url_from_config() {
    let signer = signer_client(MockSigner::default()).await;

    let node_state = MockNode::default();
    let transacts = node_state.transacts.clone();
    let url = serve(Router::new().nest("/v1", node_router(node_state))).await;
    let config = NodeConfig::new(url).with_notify_url("http://config.example/notify");
    let node = NodeClient::from_config(config).unwrap();

    node.send_tx(
        TransactRequest {
            from: "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".to_string(),
            to: "0x3535353535353535353535353535353535353535".to_string(),
            ..Default::default()
        },
        &signer,
    )
    .await
    .unwrap();

    let submitted = transacts.lock().unwrap();
    assert_eq!(submitted[0]["notify_url"], "http://config.example/notify");
}

#[tokio::test]
async fn tx_detail_parses_the_record() {
    let node = node_client(MockNode::default(), "v1").await;

    let record = node.tx_detail("0xfeedbeef").await.unwrap();
    assert_eq!(record.tx_hash, "0xfeedbeef");
    assert_eq!(record.status, TxStatus::Confirmed);
    assert_eq!(record.kind, TxType::Transfer);
    assert_eq!(record.notify_status, 1);
}

#[tokio::test]
async fn call_decodes_the_return_data() {
    let node = node_client(MockNode::default(), "v1").await;

    let values = node
        .call(
            CallRequest {
                from: "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".to_string(),
                to: "0x3535353535353535353535353535353535353535".to_string(),
                data: "0x".to_string(),
                method: "balanceOf".to_string(),
            },
            BALANCE_ABI,
        )
        .await
        .unwrap();

    assert_eq!(values, vec![DynSolValue::Uint(U256::from(7u64), 256)]);
}

#[tokio::test]
async fn api_version_prefixes_gateway_paths() {
    let node = node_client(MockNode::default(), "v2").await;

    let data = node
        .estimate(node.estimate_request("0xaaa", "0xbbb", ""))
        .await
        .unwrap();
    assert_eq!(data.chain_id, 1);
}

#[tokio::test]
async fn gateway_rejection_carries_code_and_message() {
    async fn refuse() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "fee limit too low" })),
        )
    }
    let url = serve(Router::new().route("/v1/tx/estimate", post(refuse))).await;
    let node = NodeClient::from_config(NodeConfig::new(url)).unwrap();

    let err = node
        .estimate(node.estimate_request("0xaaa", "0xbbb", ""))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("400-fee limit too low"));
    assert!(matches!(err, ClientError::Node { code: 400, .. }));
}
