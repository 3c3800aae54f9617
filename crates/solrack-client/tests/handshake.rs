//! End-to-end tests of the authentication handshake against a stub
//! inverter.
//!
//! The stub implements the genuine server half of the exchange: it
//! derives the same SCRAM secrets from the configured password, recovers
//! the client key from the submitted proof, and unwraps the GCM payload
//! with the protocol key. A login only succeeds when every byte of the
//! framing matches, so these tests exercise the real wire contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use solrack_client::{ClientConfig, ClientError, InverterClient};
use solrack_crypto::{
    base64_decode, base64_encode, gcm_open, hmac_sha256, hmac_sha256_chain, pbkdf2_sha256,
    sha256, xor32,
};

const PASSWORD: &str = "changeme";
const SALT: &[u8] = b"0123456789ABCDEF";
const ROUNDS: u32 = 20000;
const SERVER_NONCE: &str = "SrvNonce-xyz";

#[derive(Clone, Copy, PartialEq)]
enum Behavior {
    Normal,
    TamperSignature,
    StringRounds,
    EmptyCreateSession,
}

struct Transaction {
    auth_message: String,
    stored_key: [u8; 32],
    server_key: [u8; 32],
    client_key: Option<[u8; 32]>,
    token: String,
}

struct Stub {
    behavior: Behavior,
    tx_counter: u32,
    session_counter: u32,
    transactions: HashMap<String, Transaction>,
    sessions: Vec<String>,
    seen_client_nonces: Vec<String>,
    create_session_calls: u32,
    expire_sessions: bool,
}

impl Stub {
    fn new(behavior: Behavior) -> SharedStub {
        Arc::new(Mutex::new(Self {
            behavior,
            tx_counter: 0,
            session_counter: 0,
            transactions: HashMap::new(),
            sessions: Vec::new(),
            seen_client_nonces: Vec::new(),
            create_session_calls: 0,
            expire_sessions: false,
        }))
    }
}

type SharedStub = Arc<Mutex<Stub>>;

async fn auth_start(State(stub): State<SharedStub>, Json(body): Json<Value>) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    if stub.behavior == Behavior::StringRounds {
        return Json(json!({
            "nonce": SERVER_NONCE,
            "rounds": "many",
            "salt": base64_encode(SALT),
            "transactionId": "tx-bad",
        }));
    }

    let client_nonce = body["nonce"].as_str().unwrap_or_default().to_string();
    stub.seen_client_nonces.push(client_nonce.clone());

    stub.tx_counter += 1;
    let transaction_id = format!("tx-{}", stub.tx_counter);
    let salt_b64 = base64_encode(SALT);

    // Same algebra as a real inverter: stored and server keys from the
    // plant-owner password.
    let salted = pbkdf2_sha256(PASSWORD.as_bytes(), SALT, ROUNDS);
    let client_key = hmac_sha256(salted.as_ref(), b"Client Key");
    let server_key = hmac_sha256(salted.as_ref(), b"Server Key");
    let stored_key = sha256(client_key.as_ref());

    let auth_message = format!(
        "n=user,r={client_nonce},r={SERVER_NONCE},s={salt_b64},i={ROUNDS},c=biws,r={SERVER_NONCE}"
    );

    let token = format!("bearer-token-{}", stub.tx_counter);
    stub.transactions.insert(
        transaction_id.clone(),
        Transaction {
            auth_message,
            stored_key,
            server_key: *server_key,
            client_key: None,
            token,
        },
    );

    Json(json!({
        "nonce": SERVER_NONCE,
        "rounds": ROUNDS as f64,
        "salt": salt_b64,
        "transactionId": transaction_id,
    }))
}

async fn auth_finish(State(stub): State<SharedStub>, Json(body): Json<Value>) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    let behavior = stub.behavior;

    let transaction_id = body["transactionId"].as_str().unwrap_or_default().to_string();
    let proof_b64 = body["proof"].as_str().unwrap_or_default();
    let Ok(proof) = base64_decode(proof_b64) else {
        return Json(json!({"error": "bad"}));
    };
    let proof: [u8; 32] = match proof.try_into() {
        Ok(p) => p,
        Err(_) => return Json(json!({"error": "bad"})),
    };

    let Some(tx) = stub.transactions.get_mut(&transaction_id) else {
        return Json(json!({"error": "bad"}));
    };

    // Recover the client key from the proof and check it against the
    // stored key, exactly like the server does.
    let client_signature = hmac_sha256(&tx.stored_key, tx.auth_message.as_bytes());
    let client_key = xor32(&proof, &client_signature);
    if sha256(client_key.as_ref()) != tx.stored_key {
        return Json(json!({"error": "bad"}));
    }
    tx.client_key = Some(*client_key);

    let server_signature = hmac_sha256(&tx.server_key, tx.auth_message.as_bytes());
    let mut signature = *server_signature;
    if behavior == Behavior::TamperSignature {
        signature[31] ^= 0x01;
    }

    Json(json!({
        "signature": base64_encode(&signature),
        "token": tx.token,
    }))
}

async fn auth_create_session(
    State(stub): State<SharedStub>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    stub.create_session_calls += 1;
    if stub.behavior == Behavior::EmptyCreateSession {
        return Json(json!({}));
    }

    let transaction_id = body["transactionId"].as_str().unwrap_or_default().to_string();
    let Some(tx) = stub.transactions.get(&transaction_id) else {
        return Json(json!({}));
    };
    let Some(client_key) = tx.client_key else {
        return Json(json!({}));
    };

    let protocol_key = hmac_sha256_chain(
        &tx.stored_key,
        &[b"Session Key", tx.auth_message.as_bytes(), &client_key],
    );

    let decode16 = |field: &str| -> Option<[u8; 16]> {
        base64_decode(body[field].as_str()?).ok()?.try_into().ok()
    };
    let (Some(iv), Some(tag)) = (decode16("iv"), decode16("tag")) else {
        return Json(json!({}));
    };
    let Ok(payload) = base64_decode(body["payload"].as_str().unwrap_or_default()) else {
        return Json(json!({}));
    };

    // The wrap must open to exactly the token we issued.
    match gcm_open(&protocol_key, &iv, &payload, &tag) {
        Ok(plaintext) if plaintext == tx.token.as_bytes() => {}
        _ => return Json(json!({})),
    }

    stub.session_counter += 1;
    let session_id = format!("session-{}", stub.session_counter);
    stub.sessions.push(session_id.clone());
    Json(json!({"sessionId": session_id}))
}

fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Session ")
        .map(str::to_string)
}

async fn auth_logout(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut stub = stub.lock().unwrap();
    match session_from_headers(&headers) {
        Some(id) if stub.sessions.contains(&id) => {
            stub.sessions.retain(|s| s != &id);
            (StatusCode::OK, Json(json!({})))
        }
        _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
    }
}

async fn auth_me(State(stub): State<SharedStub>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let stub = stub.lock().unwrap();
    match session_from_headers(&headers) {
        Some(id) if !stub.expire_sessions && stub.sessions.contains(&id) => (
            StatusCode::OK,
            Json(json!({"authenticated": true, "role": "USER"})),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
    }
}

async fn processdata(
    State(stub): State<SharedStub>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let stub = stub.lock().unwrap();
    match session_from_headers(&headers) {
        Some(id) if !stub.expire_sessions && stub.sessions.contains(&id) => (
            StatusCode::OK,
            Json(json!([{"moduleid": "devices:local", "processdataids": ["Dc_P", "Grid_P"]}])),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
    }
}

/// Serve the stub on an ephemeral port; returns `host:port`.
async fn spawn_stub(stub: SharedStub) -> String {
    let app = Router::new()
        .route("/api/v1/auth/start", post(auth_start))
        .route("/api/v1/auth/finish", post(auth_finish))
        .route("/api/v1/auth/create_session", post(auth_create_session))
        .route("/api/v1/auth/logout", post(auth_logout))
        .route("/api/v1/auth/me", get(auth_me))
        .route("/api/v1/processdata", get(processdata))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

fn client_for(server: &str, password: &str) -> InverterClient {
    InverterClient::with_config(ClientConfig::new("http", server, password)).unwrap()
}

#[tokio::test]
async fn test_login_happy_path() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    let session_id = client.login().await.unwrap();
    assert_eq!(session_id, "session-1");
    assert!(client.is_logged_in());
    assert_eq!(client.session_id(), Some("session-1"));

    assert!(client.logout().await.unwrap());
    assert!(!client.is_logged_in());
    assert_eq!(client.session_id(), None);
}

#[tokio::test]
async fn test_wrong_password_fails_authentication() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, "not-the-password");

    assert_eq!(client.login().await, Err(ClientError::AuthenticationFailed));
    assert!(!client.is_logged_in());
    // The failed proof never reaches the wrap step.
    assert_eq!(stub.lock().unwrap().create_session_calls, 0);
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let stub = Stub::new(Behavior::TamperSignature);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    assert_eq!(
        client.login().await,
        Err(ClientError::ServerSignatureMismatch)
    );
    // The client must refuse before issuing create_session.
    assert_eq!(stub.lock().unwrap().create_session_calls, 0);
}

#[tokio::test]
async fn test_string_rounds_is_a_protocol_error() {
    let stub = Stub::new(Behavior::StringRounds);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    assert!(matches!(
        client.login().await,
        Err(ClientError::AuthProtocol(_))
    ));
}

#[tokio::test]
async fn test_refused_session_creation() {
    let stub = Stub::new(Behavior::EmptyCreateSession);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    assert_eq!(
        client.login().await,
        Err(ClientError::SessionCreationFailed)
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_uppercase_https_scheme_still_reaches_http_server() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    // Only the exact literal "https" selects TLS; this must coerce to http
    // and succeed against the plain-HTTP stub.
    let mut client =
        InverterClient::with_config(ClientConfig::new("HtTpS", server, PASSWORD)).unwrap();

    assert!(client.login().await.is_ok());
}

#[tokio::test]
async fn test_successive_logins_use_fresh_nonces() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    let first = client.login().await.unwrap();
    client.logout().await.unwrap();
    let second = client.login().await.unwrap();

    assert_ne!(first, second);
    let stub = stub.lock().unwrap();
    assert_eq!(stub.seen_client_nonces.len(), 2);
    assert_ne!(stub.seen_client_nonces[0], stub.seen_client_nonces[1]);
    assert_eq!(stub.tx_counter, 2);
}

#[tokio::test]
async fn test_login_while_active_is_rejected() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    client.login().await.unwrap();
    assert_eq!(client.login().await, Err(ClientError::AlreadyAuthenticated));
    // The rejected call left the original session untouched.
    assert_eq!(client.session_id(), Some("session-1"));
}

#[tokio::test]
async fn test_logout_without_session_is_idempotent() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    assert!(client.logout().await.unwrap());
}

#[tokio::test]
async fn test_me_returns_user_object() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    client.login().await.unwrap();
    let me = client.me().await.unwrap();
    assert_eq!(me.get("authenticated"), Some(&json!(true)));
}

#[tokio::test]
async fn test_expired_session_surfaces_distinctly() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    client.login().await.unwrap();
    stub.lock().unwrap().expire_sessions = true;
    assert_eq!(client.me().await, Err(ClientError::SessionExpired));
}

#[tokio::test]
async fn test_requests_require_login() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let client = client_for(&server, PASSWORD);

    assert_eq!(
        client.process_data().await.unwrap_err(),
        ClientError::NotAuthenticated
    );
}

#[tokio::test]
async fn test_processdata_rides_the_session() {
    let stub = Stub::new(Behavior::Normal);
    let server = spawn_stub(stub.clone()).await;
    let mut client = client_for(&server, PASSWORD);

    client.login().await.unwrap();
    let modules = client.process_data().await.unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].module_id, "devices:local");
    assert_eq!(modules[0].processdata_ids, vec!["Dc_P", "Grid_P"]);
}
