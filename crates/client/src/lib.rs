//! HTTP clients for the TokenUp custodial signing service and the node
//! gateway that fronts the chain.
//!
//! [`SignerClient`] submits hashes for signing and polls the asynchronous
//! signing jobs to completion; every write request it sends is sealed with a
//! timestamp, nonce, and RSA signature. [`NodeClient`] estimates, signs (via
//! a [`SignerClient`]), and submits transactions, and runs read-only
//! contract calls.

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

mod abi;
pub use abi::{decode_call_output, encode_call};

mod error;
pub use error::{ClientError, Result};

mod hash;
pub use hash::transact_signing_hash;

mod node;
pub use node::NodeClient;

mod signer;
pub use signer::SignerClient;

mod util;
