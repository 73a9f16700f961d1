//! RSA request signing and verification.
//!
//! The service authenticates requests with SHA-256 digests under RSA
//! PKCS#1 v1.5. Private keys arrive as base64 of their PKCS#1 DER
//! encoding, public keys as base64 of their SPKI DER encoding, and
//! signatures travel as hex strings.

use crate::SignError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::{Signature, SigningKey, VerifyingKey},
    pkcs8::DecodePublicKey,
    signature::{SignatureEncoding, Signer, Verifier},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::Sha256;
use std::fmt;

/// Signs canonical request bytes with an RSA private key.
///
/// The key is parsed once at construction; signing itself cannot fail on
/// key material.
#[derive(Clone)]
pub struct RsaSigner {
    signing_key: SigningKey<Sha256>,
}

impl RsaSigner {
    /// Parse a signer from the base64 PKCS#1 DER encoding of a private key.
    pub fn from_pkcs1_base64(private_key: &str) -> Result<Self, SignError> {
        let der = STANDARD.decode(private_key)?;
        let key = RsaPrivateKey::from_pkcs1_der(&der)?;
        Ok(Self { signing_key: SigningKey::new(key) })
    }

    /// Sign `data`, returning the signature as lowercase hex.
    pub fn sign(&self, data: &[u8]) -> Result<String, SignError> {
        let signature = self.signing_key.try_sign(data)?;
        Ok(hex::encode(signature.to_vec()))
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner").finish_non_exhaustive()
    }
}

/// Verifies hex signatures against an RSA public key.
#[derive(Clone)]
pub struct RsaVerifier {
    verifying_key: VerifyingKey<Sha256>,
}

impl RsaVerifier {
    /// Parse a verifier from the base64 SPKI DER encoding of a public key.
    pub fn from_spki_base64(public_key: &str) -> Result<Self, SignError> {
        let der = STANDARD.decode(public_key)?;
        let key = RsaPublicKey::from_public_key_der(&der)?;
        Ok(Self { verifying_key: VerifyingKey::new(key) })
    }

    /// Check a hex signature over `data`.
    ///
    /// A cryptographically invalid signature is `Ok(false)`; errors are
    /// reserved for signatures that cannot be decoded at all.
    pub fn verify(&self, data: &[u8], signature_hex: &str) -> Result<bool, SignError> {
        let bytes = hex::decode(signature_hex)?;
        let signature = Signature::try_from(bytes.as_slice())?;
        Ok(self.verifying_key.verify(data, &signature).is_ok())
    }
}

impl fmt::Debug for RsaVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaVerifier").finish_non_exhaustive()
    }
}
