//! Request and response types for the TokenUp node service.

use serde::{Deserialize, Serialize};

/// The uniform response envelope returned by the node service.
///
/// Error responses carry only `message`; `data` is populated on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct NodeResponse<T> {
    /// `success` on success, otherwise a failure description.
    pub message: String,
    /// The response payload, if any.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> NodeResponse<T> {
    /// Create a new response envelope.
    pub const fn new(message: String, data: Option<T>) -> Self {
        Self { message, data }
    }

    /// Consume the envelope and return the payload, if any.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Gas estimation request.
///
/// `fee_limit` is denominated in gwei, the gas price bounds in wei.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EstimateRequest {
    /// Sender address.
    pub from: String,
    /// Target address, empty for contract creation.
    pub to: String,
    /// Call data as a `0x`-prefixed hex string.
    pub data: String,
    /// Upper bound on the total fee, in gwei.
    pub fee_limit: u64,
    /// Lower bound on the gas price, in wei.
    pub gas_price_min: u64,
    /// Upper bound on the gas price, in wei.
    pub gas_price_max: u64,
}

/// Gas estimation result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EstimateData {
    /// Suggested gas price in wei, as a `0x`-prefixed hex string.
    pub gas_price: String,
    /// Estimated gas usage, as a `0x`-prefixed hex string.
    pub gas: String,
    /// Next account nonce for the sender.
    pub nonce: u64,
    /// Chain id of the backing node.
    pub chain_id: u64,
}

/// Response to a gas estimation request.
pub type EstimateResponse = NodeResponse<EstimateData>;

/// A transaction submission.
///
/// Quantities are `0x`-prefixed hex strings except `nonce`, which travels as
/// a JSON number. Empty strings mark fields for the client to fill from the
/// estimation result before submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactRequest {
    /// Sender address.
    pub from: String,
    /// Target address, empty for contract creation.
    pub to: String,
    /// Transaction nonce, filled from the estimate when zero.
    pub nonce: u64,
    /// Call data as a `0x`-prefixed hex string.
    pub data: String,
    /// Value transferred, in wei.
    pub value: String,
    /// Gas price the sender is willing to pay, in wei.
    pub gas_price: String,
    /// Gas limit for the transaction.
    pub gas_limit: String,
    /// Signature over the transaction signing hash.
    pub signature: String,
    /// Callback url notified on status changes.
    pub notify_url: String,
}

/// Error for an integer wire value outside an enum's known range.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("unrecognized {field} value: {value}")]
pub struct InvalidEnumRepr {
    /// The wire field that failed to parse.
    pub field: &'static str,
    /// The rejected value.
    pub value: u8,
}

/// Lifecycle state of a submitted transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum TxStatus {
    /// Not yet seen by the node.
    None,
    /// In the mempool, awaiting inclusion.
    Pending,
    /// Included in a block.
    Confirmed,
    /// Included and reverted, or dropped.
    Failed,
}

impl TryFrom<u8> for TxStatus {
    type Error = InvalidEnumRepr;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Pending),
            2 => Ok(Self::Confirmed),
            3 => Ok(Self::Failed),
            _ => Err(InvalidEnumRepr { field: "status", value }),
        }
    }
}

impl From<TxStatus> for u8 {
    fn from(status: TxStatus) -> Self {
        status as u8
    }
}

/// Shape of a submitted transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum TxType {
    /// Contract creation.
    Create,
    /// Contract call.
    Call,
    /// Plain value transfer.
    Transfer,
}

impl TryFrom<u8> for TxType {
    type Error = InvalidEnumRepr;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Create),
            1 => Ok(Self::Call),
            2 => Ok(Self::Transfer),
            _ => Err(InvalidEnumRepr { field: "type", value }),
        }
    }
}

impl From<TxType> for u8 {
    fn from(kind: TxType) -> Self {
        kind as u8
    }
}

/// A transaction as tracked by the node service.
///
/// Returned both from submission and from detail lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxRecord {
    /// Gas price the sender pays, in wei.
    pub gas_price: String,
    /// Gas limit of the transaction.
    pub gas_limit: String,
    /// Transaction hash.
    pub tx_hash: String,
    /// Lifecycle state.
    pub status: TxStatus,
    /// 1 once the notify url has been called, 0 before.
    pub notify_status: u8,
    /// Shape of the transaction.
    #[serde(rename = "type")]
    pub kind: TxType,
}

/// Response to a transaction submission.
pub type TransactResponse = NodeResponse<TxRecord>;

/// Response to a transaction detail lookup.
pub type DetailResponse = NodeResponse<TxRecord>;

/// A read-only message call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRequest {
    /// Caller address.
    pub from: String,
    /// Target contract address.
    pub to: String,
    /// ABI-encoded call data as a `0x`-prefixed hex string.
    pub data: String,
    /// Name of the called method, used to decode the result.
    pub method: String,
}

/// Response to a read-only message call, `data` holding the hex-encoded
/// return value.
pub type CallResponse = NodeResponse<String>;
