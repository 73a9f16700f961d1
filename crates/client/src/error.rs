use tokenup_sign::SignError;

/// Result type for client operations. Contains [`ClientError`] as the error
/// variant.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the signing service or the node
/// gateway.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The signing service answered with a non-200 status. Carries the HTTP
    /// status code and the message from the response body.
    #[error("signing service rejected the request: {code}-{message}")]
    Rejected {
        /// HTTP status code of the response.
        code: u16,
        /// Message from the response body.
        message: String,
    },
    /// A status query failed while awaiting completion of a signing job.
    #[error("status query for {request_id} rejected: {code}-{message}")]
    PollRejected {
        /// Identifier of the signing job being polled.
        request_id: String,
        /// HTTP status code of the response.
        code: u16,
        /// Message from the response body.
        message: String,
    },
    /// The deadline elapsed before the signing job completed.
    #[error("timed out awaiting completion of signing job {request_id}")]
    Timeout {
        /// Identifier of the signing job that did not complete in time.
        request_id: String,
    },
    /// The node gateway answered with a non-200 status. Carries the HTTP
    /// status code and the message from the response body.
    #[error("node request failed: {code}-{message}")]
    Node {
        /// HTTP status code of the response.
        code: u16,
        /// Message from the response body.
        message: String,
    },
    /// A 200 response that carried no data payload.
    #[error("response carried no data")]
    EmptyResponse,
    /// Callback verification was requested but no callback public key is
    /// configured.
    #[error("no callback public key configured")]
    NoCallbackKey,
    /// A transaction field that could not be parsed as a 0x-prefixed
    /// quantity.
    #[error("invalid {field} in transaction request: {value:?}")]
    InvalidTxField {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The ABI document does not define the requested method.
    #[error("method {0} not found in abi")]
    UnknownAbiMethod(String),
    /// Error parsing an ABI document.
    #[error("failed to parse abi json: {0}")]
    AbiJson(#[from] serde_json::Error),
    /// Error encoding call arguments or decoding call output.
    #[error(transparent)]
    Abi(#[from] alloy::dyn_abi::Error),
    /// Malformed hex in a payload.
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
    /// Error parsing a url.
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// Error sealing a request envelope or verifying a signature.
    #[error(transparent)]
    Sign(#[from] SignError),
    /// Transport-level error reaching a service.
    #[error("error contacting service: {0}")]
    Transport(#[from] reqwest::Error),
}
