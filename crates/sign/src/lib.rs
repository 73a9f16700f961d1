//! Canonical request encoding and RSA authentication for the TokenUp
//! signing service.
//!
//! Every authenticated request travels with a signature over a canonical
//! flattening of its fields. [`SignValue`] and [`SignRecord`] describe the
//! signable field set of a request, [`encode`] produces the canonical
//! string, [`RsaSigner`] signs it and [`EnvelopeSealer`] drives the whole
//! sealing sequence for the envelope types the service accepts.

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

mod encode;
pub use encode::encode;

mod envelope;
pub use envelope::{
    verify_received, AuthEnvelope, EnvelopeSealer, ProxySignRequest, ReceivedConfirm, TraceRequest,
};

mod error;
pub use error::SignError;

mod nonce;
pub use nonce::NonceSource;

mod rsa;
pub use self::rsa::{RsaSigner, RsaVerifier};

mod value;
pub use value::{SignRecord, SignValue, Signable};
