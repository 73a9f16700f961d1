//! Request envelopes for the signing service and the sealer that
//! authenticates them.

use crate::{encode, NonceSource, RsaSigner, RsaVerifier, SignError, SignRecord, Signable};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokenup_types::SignSource;

/// A request envelope the sealer can authenticate.
///
/// The [`Signable::sign_record`] of an implementation must cover every
/// authenticated field, including the application key, which participates
/// in the signature but never in serialization.
pub trait AuthEnvelope: Signable {
    /// The current nonce, empty if unset.
    fn nonce(&self) -> &str;
    /// Overwrite the nonce.
    fn set_nonce(&mut self, nonce: String);
    /// Overwrite the timestamp, in Unix seconds.
    fn set_timestamp(&mut self, timestamp: i64);
    /// Install the application identity.
    fn set_identity(&mut self, app_id: String, app_key: String);
    /// Install the computed signature.
    fn set_signature(&mut self, signature: String);
}

/// A request to sign a hash on behalf of an address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxySignRequest {
    /// Application id.
    pub app_id: String,
    /// Application key. Signed, never serialized.
    #[serde(skip)]
    pub app_key: String,
    /// Request nonce.
    pub nonce: String,
    /// Address the signature is requested for.
    pub address: String,
    /// Request timestamp, in Unix seconds.
    pub timestamp: i64,
    /// Hex payload to sign.
    pub data: String,
    /// Free-form context forwarded to the service.
    pub extras: String,
    /// Caller-minted order id.
    pub order_id: String,
    /// Request signature.
    pub signature: String,
}

impl From<SignSource> for ProxySignRequest {
    fn from(source: SignSource) -> Self {
        Self {
            address: source.address,
            data: source.data,
            extras: source.extras,
            order_id: source.order_id,
            ..Default::default()
        }
    }
}

impl Signable for ProxySignRequest {
    fn sign_record(&self) -> SignRecord {
        SignRecord::new()
            .field("app_id", self.app_id.as_str())
            .field("app_key", self.app_key.as_str())
            .field("nonce", self.nonce.as_str())
            .field("address", self.address.as_str())
            .field("timestamp", self.timestamp)
            .field("data", self.data.as_str())
            .field("extras", self.extras.as_str())
            .field("order_id", self.order_id.as_str())
    }
}

impl AuthEnvelope for ProxySignRequest {
    fn nonce(&self) -> &str {
        &self.nonce
    }

    fn set_nonce(&mut self, nonce: String) {
        self.nonce = nonce;
    }

    fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    fn set_identity(&mut self, app_id: String, app_key: String) {
        self.app_id = app_id;
        self.app_key = app_key;
    }

    fn set_signature(&mut self, signature: String) {
        self.signature = signature;
    }
}

/// A status query for a previously submitted signing job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceRequest {
    /// Application id.
    pub app_id: String,
    /// Application key. Signed, never serialized.
    #[serde(skip)]
    pub app_key: String,
    /// Request nonce.
    pub nonce: String,
    /// Request timestamp, in Unix seconds.
    pub timestamp: i64,
    /// Id of the job being queried.
    pub request_id: String,
    /// Request signature.
    pub signature: String,
}

impl TraceRequest {
    /// Create a query for the given job id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self { request_id: request_id.into(), ..Default::default() }
    }
}

impl Signable for TraceRequest {
    fn sign_record(&self) -> SignRecord {
        SignRecord::new()
            .field("app_id", self.app_id.as_str())
            .field("app_key", self.app_key.as_str())
            .field("nonce", self.nonce.as_str())
            .field("timestamp", self.timestamp)
            .field("request_id", self.request_id.as_str())
    }
}

impl AuthEnvelope for TraceRequest {
    fn nonce(&self) -> &str {
        &self.nonce
    }

    fn set_nonce(&mut self, nonce: String) {
        self.nonce = nonce;
    }

    fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    fn set_identity(&mut self, app_id: String, app_key: String) {
        self.app_id = app_id;
        self.app_key = app_key;
    }

    fn set_signature(&mut self, signature: String) {
        self.signature = signature;
    }
}

/// A completion callback delivered by the signing service.
///
/// The service signs callbacks the same way clients sign requests, with
/// the shared application key folded into the canonical string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceivedConfirm {
    /// The callback message body.
    pub message: String,
    /// Callback nonce.
    pub nonce: String,
    /// Application key. Signed, never serialized.
    #[serde(skip)]
    pub app_key: String,
    /// Callback signature.
    pub signature: String,
}

impl Signable for ReceivedConfirm {
    fn sign_record(&self) -> SignRecord {
        SignRecord::new()
            .field("message", self.message.as_str())
            .field("nonce", self.nonce.as_str())
            .field("app_key", self.app_key.as_str())
    }
}

/// Verify a callback against the counterparty public key.
///
/// Folds `app_key` into the canonical string the way the service did when
/// signing; the callback as received never carries the key.
pub fn verify_received(
    confirm: &ReceivedConfirm,
    app_key: &str,
    verifier: &RsaVerifier,
) -> Result<bool, SignError> {
    let mut confirm = confirm.clone();
    confirm.app_key = app_key.to_string();
    verifier.verify(encode(&confirm).as_bytes(), &confirm.signature)
}

/// Authenticates request envelopes for the signing service.
///
/// Sealing always overwrites the timestamp with the current Unix seconds,
/// fills the nonce from the nonce source only when the caller left it
/// empty, installs the application identity, and computes the signature
/// last so it covers every field as sent.
#[derive(Debug, Clone)]
pub struct EnvelopeSealer {
    app_id: String,
    app_key: String,
    signer: RsaSigner,
    nonces: NonceSource,
}

impl EnvelopeSealer {
    /// Create a sealer from an application identity, a signer and a nonce
    /// source.
    pub const fn new(
        app_id: String,
        app_key: String,
        signer: RsaSigner,
        nonces: NonceSource,
    ) -> Self {
        Self { app_id, app_key, signer, nonces }
    }

    /// The application id requests are sealed under.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The application key folded into signatures.
    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    /// Seal an envelope in place.
    pub async fn seal<E: AuthEnvelope>(&self, envelope: &mut E) -> Result<(), SignError> {
        envelope.set_timestamp(Utc::now().timestamp());
        envelope.set_identity(self.app_id.clone(), self.app_key.clone());
        if envelope.nonce().is_empty() {
            envelope.set_nonce(self.nonces.next().await.to_string());
        }
        let signature = self.signer.sign(encode(envelope).as_bytes())?;
        envelope.set_signature(signature);
        Ok(())
    }
}
