/// Errors raised while building, encoding or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// A dynamic payload value outside the encodable set.
    #[error("unsupported value in signable payload: {0}")]
    Unsupported(&'static str),
    /// Key material that is not valid base64.
    #[error("key is not valid base64: {0}")]
    KeyBase64(#[from] base64::DecodeError),
    /// A private key whose DER is not PKCS#1.
    #[error("failed to parse PKCS#1 private key: {0}")]
    PrivateKeyDer(#[from] rsa::pkcs1::Error),
    /// A public key whose DER is not SPKI.
    #[error("failed to parse SPKI public key: {0}")]
    PublicKeyDer(#[from] rsa::pkcs8::spki::Error),
    /// Failure inside the RSA primitive while signing, or a signature blob
    /// no verifier could interpret.
    #[error("rsa failure: {0}")]
    Rsa(#[from] rsa::signature::Error),
    /// A signature that is not valid hex.
    #[error("signature is not valid hex: {0}")]
    SignatureHex(#[from] hex::FromHexError),
}
