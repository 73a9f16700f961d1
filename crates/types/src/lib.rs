//! Wire and configuration types used throughout the TokenUp SDK.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod config;
pub use config::{
    load_string, load_string_opt, load_u64_or, ConfigError, NodeConfig, SignerConfig,
    DEFAULT_FEE_LIMIT, DEFAULT_GAS_PRICE_MAX, DEFAULT_GAS_PRICE_MIN, DEFAULT_NODE_API_VERSION,
};

mod response;
pub use response::{
    SignReceipt, SignSource, SignedHash, SignerResponse, Status, TracePayload, TraceResult,
};

mod tx;
pub use tx::{
    CallRequest, CallResponse, DetailResponse, EstimateData, EstimateRequest, EstimateResponse,
    InvalidEnumRepr, NodeResponse, TransactRequest, TransactResponse, TxRecord, TxStatus, TxType,
};
