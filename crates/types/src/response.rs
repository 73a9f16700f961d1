//! Response envelopes and payloads for the TokenUp signing service.

use serde::{Deserialize, Serialize};

/// The status block carried by every signing-service response body.
///
/// The `code` here is the service-level result code, which is distinct from
/// the HTTP status of the response that carried it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    /// Service-level result code.
    pub code: i64,
    /// Human-readable result message.
    pub message: String,
}

impl Status {
    /// Create a new status block.
    pub const fn new(code: i64, message: String) -> Self {
        Self { code, message }
    }
}

/// The uniform response envelope returned by the signing service.
///
/// `data` is `None` both when the service omits the field and when it sends
/// an explicit JSON `null` (the in-progress marker for tracing queries).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SignerResponse<T> {
    /// The service status block.
    pub status: Status,
    /// The response payload, if any.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> SignerResponse<T> {
    /// Create a new response envelope.
    pub const fn new(status: Status, data: Option<T>) -> Self {
        Self { status, data }
    }

    /// Consume the envelope and return the payload, if any.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// True if the envelope carries a payload.
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// Acknowledgement for an accepted signing submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignReceipt {
    /// The id under which the service tracks the signing job.
    pub request_id: String,
}

impl SignReceipt {
    /// Create a new receipt from a request id.
    pub const fn new(request_id: String) -> Self {
        Self { request_id }
    }
}

impl From<SignReceipt> for String {
    fn from(receipt: SignReceipt) -> Self {
        receipt.request_id
    }
}

/// Payload of a tracing response for a completed signing job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TracePayload {
    /// The completed result.
    pub result: TraceResult,
}

impl TracePayload {
    /// Consume the payload and return the produced signature.
    pub fn into_signature(self) -> String {
        self.result.data
    }
}

/// Inner result object of a tracing response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceResult {
    /// The signature produced by the signing job.
    pub data: String,
}

/// The caller-supplied portion of a signing submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignSource {
    /// Address the signature is requested for.
    pub address: String,
    /// Hex payload to sign.
    pub data: String,
    /// Free-form context forwarded to the service.
    pub extras: String,
    /// Caller-minted order id for idempotent tracking.
    pub order_id: String,
}

impl SignSource {
    /// Create a source for signing `data` on behalf of `address`.
    pub fn new(address: impl Into<String>, data: impl Into<String>) -> Self {
        Self { address: address.into(), data: data.into(), ..Default::default() }
    }

    /// Set the extras forwarded to the service.
    pub fn with_extras(mut self, extras: impl Into<String>) -> Self {
        self.extras = extras.into();
        self
    }

    /// Set the order id for this submission.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = order_id.into();
        self
    }
}

/// The outcome of a completed synchronous signing round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHash {
    /// The signature produced by the service.
    pub signature: String,
    /// The id the job was tracked under.
    pub request_id: String,
}

impl SignedHash {
    /// Create a new signed hash.
    pub const fn new(signature: String, request_id: String) -> Self {
        Self { signature, request_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_envelope_deser() {
        let json = r#"{"status":{"code":200,"message":"success"},"data":{"request_id":"req-1"}}"#;
        let envelope = serde_json::from_str::<SignerResponse<SignReceipt>>(json).unwrap();
        assert_eq!(envelope.status, Status::new(200, "success".to_string()));
        assert_eq!(envelope.into_data().unwrap().request_id, "req-1");
    }

    #[test]
    fn trace_envelope_null_data() {
        let json = r#"{"status":{"code":200,"message":"success"},"data":null}"#;
        let envelope = serde_json::from_str::<SignerResponse<TracePayload>>(json).unwrap();
        assert!(!envelope.has_data());
    }

    #[test]
    fn trace_envelope_missing_data() {
        let json = r#"{"status":{"code":200,"message":"success"}}"#;
        let envelope = serde_json::from_str::<SignerResponse<TracePayload>>(json).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn trace_envelope_completed() {
        let json =
            r#"{"status":{"code":200,"message":"success"},"data":{"result":{"data":"0xsig"}}}"#;
        let envelope = serde_json::from_str::<SignerResponse<TracePayload>>(json).unwrap();
        assert_eq!(envelope.into_data().unwrap().into_signature(), "0xsig");
    }

    #[test]
    fn sign_source_ser() {
        let source = SignSource::new("0xabc", "deadbeef")
            .with_extras("tokenup-sdk")
            .with_order_id("sign_1");
        let expected =
            r#"{"address":"0xabc","data":"deadbeef","extras":"tokenup-sdk","order_id":"sign_1"}"#;
        assert_eq!(serde_json::to_string(&source).unwrap(), expected);
    }
}
