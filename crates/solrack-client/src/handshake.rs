//! The three-step authentication handshake.
//!
//! The exchange is SCRAM-SHA-256 specialized to this vendor's API: a
//! nonce exchange (`start`), a mutual proof (`finish`), then an
//! AES-256-GCM-wrapped delivery of the issued token (`create_session`)
//! which yields the long-lived session id.
//!
//! Each step is a consuming method on the state produced by the previous
//! one, so the steps cannot run out of order and every intermediate
//! secret drops (and zeroizes) as soon as its state is consumed or an
//! error unwinds the exchange.

use tracing::debug;
use zeroize::Zeroizing;

use solrack_crypto::{
    base64_decode, base64_encode, constant_time_eq, gcm_seal, generate_random_bytes,
    hmac_sha256, hmac_sha256_chain, pbkdf2_sha256, random_ascii, sha256, xor32,
    CLIENT_KEY_LABEL, CLIENT_NONCE_LEN, SERVER_KEY_LABEL, SESSION_KEY_LABEL,
};

use crate::codec::{
    auth_message, AuthFinishRequest, AuthFinishResponse, AuthStartRequest, AuthStartResponse,
    CreateSessionRequest, CreateSessionResponse, USERNAME,
};
use crate::error::{ClientError, Result};
use crate::transport::HttpTransport;

const ENDPOINT_START: &str = "/api/v1/auth/start";
const ENDPOINT_FINISH: &str = "/api/v1/auth/finish";
const ENDPOINT_CREATE_SESSION: &str = "/api/v1/auth/create_session";

/// Run the whole exchange and return the session id.
pub(crate) async fn login(
    transport: &HttpTransport,
    base_url: &str,
    password: &str,
) -> Result<String> {
    let started = StartedHandshake::begin(transport, base_url).await?;
    let proven = started.prove(password).await?;
    proven.create_session().await
}

/// Secrets derived from the password and the server's challenge.
///
/// Pure function of its inputs; no I/O.
#[derive(Debug)]
struct DerivedSecrets {
    auth_message: String,
    client_key: Zeroizing<[u8; 32]>,
    stored_key: Zeroizing<[u8; 32]>,
    server_signature: Zeroizing<[u8; 32]>,
    proof_b64: String,
}

fn derive_secrets(
    password: &str,
    client_nonce_b64: &str,
    challenge: &AuthStartResponse,
    rounds: u32,
) -> Result<DerivedSecrets> {
    let salt = base64_decode(&challenge.salt)
        .map_err(|_| ClientError::AuthProtocol("salt is not valid base64".into()))?;

    let salted_password = pbkdf2_sha256(password.as_bytes(), &salt, rounds);
    let client_key = hmac_sha256(salted_password.as_ref(), CLIENT_KEY_LABEL);
    let server_key = hmac_sha256(salted_password.as_ref(), SERVER_KEY_LABEL);
    let stored_key = Zeroizing::new(sha256(client_key.as_ref()));

    let auth_message = auth_message(client_nonce_b64, &challenge.nonce, &challenge.salt, rounds);

    let client_signature = hmac_sha256(stored_key.as_ref(), auth_message.as_bytes());
    let server_signature = hmac_sha256(server_key.as_ref(), auth_message.as_bytes());

    let proof = xor32(&client_key, &client_signature);
    let proof_b64 = base64_encode(proof.as_ref());

    Ok(DerivedSecrets {
        auth_message,
        client_key,
        stored_key,
        server_signature,
        proof_b64,
    })
}

/// State after a successful `start` round-trip.
struct StartedHandshake<'a> {
    transport: &'a HttpTransport,
    base_url: &'a str,
    client_nonce_b64: String,
    challenge: AuthStartResponse,
    rounds: u32,
}

impl<'a> StartedHandshake<'a> {
    async fn begin(transport: &'a HttpTransport, base_url: &'a str) -> Result<Self> {
        let client_nonce = random_ascii(CLIENT_NONCE_LEN);
        let client_nonce_b64 = base64_encode(client_nonce.as_bytes());

        let request = AuthStartRequest {
            nonce: client_nonce_b64.clone(),
            username: USERNAME,
        };
        let url = format!("{base_url}{ENDPOINT_START}");
        let resp = transport.post_json(&url, &request, None).await?;
        let body = resp.text().await.map_err(|_| ClientError::AuthInitFailed)?;

        let challenge: AuthStartResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::AuthProtocol(format!("auth start response: {e}")))?;
        let rounds = challenge.rounds()?;

        debug!(
            transaction_id = %challenge.transaction_id,
            rounds,
            "auth start accepted"
        );

        Ok(Self {
            transport,
            base_url,
            client_nonce_b64,
            challenge,
            rounds,
        })
    }

    async fn prove(self, password: &str) -> Result<ProvenHandshake<'a>> {
        let secrets = derive_secrets(password, &self.client_nonce_b64, &self.challenge, self.rounds)?;

        let request = AuthFinishRequest {
            transaction_id: self.challenge.transaction_id.clone(),
            proof: secrets.proof_b64.clone(),
        };
        let url = format!("{}{ENDPOINT_FINISH}", self.base_url);
        let resp = self.transport.post_json(&url, &request, None).await?;
        let body = resp.text().await.map_err(|_| ClientError::AuthFinishFailed)?;

        let finish: AuthFinishResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::AuthProtocol(format!("auth finish response: {e}")))?;

        // Absent fields are the server's rejection signal, regardless of
        // the HTTP status.
        let (signature_b64, token) = match (finish.signature, finish.token) {
            (Some(sig), Some(token)) => (sig, Zeroizing::new(token)),
            _ => return Err(ClientError::AuthenticationFailed),
        };

        let signature = base64_decode(&signature_b64)
            .map_err(|_| ClientError::AuthProtocol("signature is not valid base64".into()))?;
        if !constant_time_eq(&signature, secrets.server_signature.as_ref()) {
            return Err(ClientError::ServerSignatureMismatch);
        }

        debug!("server signature verified");

        Ok(ProvenHandshake {
            transport: self.transport,
            base_url: self.base_url,
            transaction_id: self.challenge.transaction_id,
            auth_message: secrets.auth_message,
            client_key: secrets.client_key,
            stored_key: secrets.stored_key,
            token,
        })
    }
}

/// State after the server's signature checked out; holds what the token
/// wrap needs and nothing else.
struct ProvenHandshake<'a> {
    transport: &'a HttpTransport,
    base_url: &'a str,
    transaction_id: String,
    auth_message: String,
    client_key: Zeroizing<[u8; 32]>,
    stored_key: Zeroizing<[u8; 32]>,
    token: Zeroizing<String>,
}

impl ProvenHandshake<'_> {
    async fn create_session(self) -> Result<String> {
        // Protocol key: HMAC keyed with the stored key, absorbing the
        // label, the auth message, and the client key in order.
        let protocol_key = hmac_sha256_chain(
            self.stored_key.as_ref(),
            &[
                SESSION_KEY_LABEL,
                self.auth_message.as_bytes(),
                self.client_key.as_ref(),
            ],
        );

        let iv: [u8; 16] = generate_random_bytes();
        let (ciphertext, tag) = gcm_seal(&protocol_key, &iv, self.token.as_bytes())?;

        let request = CreateSessionRequest {
            transaction_id: self.transaction_id.clone(),
            iv: base64_encode(&iv),
            tag: base64_encode(&tag),
            payload: base64_encode(&ciphertext),
        };
        let url = format!("{}{ENDPOINT_CREATE_SESSION}", self.base_url);
        let resp = self.transport.post_json(&url, &request, None).await?;
        let body = resp
            .text()
            .await
            .map_err(|_| ClientError::SessionCreationFailed)?;

        let created: CreateSessionResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::AuthProtocol(format!("create session response: {e}")))?;

        let session_id = created.session_id.ok_or(ClientError::SessionCreationFailed)?;
        debug!("session established");
        Ok(session_id)
    }
}
