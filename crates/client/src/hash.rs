use crate::{ClientError, Result};
use alloy::{
    consensus::{SignableTransaction, TxLegacy},
    primitives::{Address, Bytes, TxKind, U256},
};
use tokenup_types::TransactRequest;

/// Compute the EIP-155 signing hash of a transaction request, as 0x-prefixed
/// hex.
///
/// This is the payload forwarded to the signing service for a submission.
/// An empty `to` denotes contract creation, an empty `value` is zero, and an
/// empty `data` is an empty payload. Every other quantity must be 0x-prefixed
/// hex; anything else fails with [`ClientError::InvalidTxField`].
pub fn transact_signing_hash(request: &TransactRequest, chain_id: u64) -> Result<String> {
    let to = if request.to.is_empty() {
        TxKind::Create
    } else {
        TxKind::Call(
            request
                .to
                .parse::<Address>()
                .map_err(|_| invalid("to", &request.to))?,
        )
    };
    let value = if request.value.is_empty() {
        U256::ZERO
    } else {
        parse_u256("value", &request.value)?
    };
    let input = if request.data.is_empty() {
        Bytes::new()
    } else {
        parse_bytes("data", &request.data)?
    };
    let tx = TxLegacy {
        chain_id: Some(chain_id),
        nonce: request.nonce,
        gas_price: parse_u128("gas_price", &request.gas_price)?,
        gas_limit: parse_u64("gas_limit", &request.gas_limit)?,
        to,
        value,
        input,
    };
    Ok(tx.signature_hash().to_string())
}

fn invalid(field: &'static str, value: &str) -> ClientError {
    ClientError::InvalidTxField {
        field,
        value: value.to_string(),
    }
}

fn digits<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    value
        .strip_prefix("0x")
        .ok_or_else(|| invalid(field, value))
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64> {
    u64::from_str_radix(digits(field, value)?, 16).map_err(|_| invalid(field, value))
}

fn parse_u128(field: &'static str, value: &str) -> Result<u128> {
    u128::from_str_radix(digits(field, value)?, 16).map_err(|_| invalid(field, value))
}

fn parse_u256(field: &'static str, value: &str) -> Result<U256> {
    U256::from_str_radix(digits(field, value)?, 16).map_err(|_| invalid(field, value))
}

fn parse_bytes(field: &'static str, value: &str) -> Result<Bytes> {
    let bytes = hex::decode(digits(field, value)?).map_err(|_| invalid(field, value))?;
    Ok(bytes.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TransactRequest {
        TransactRequest {
            to: "0x3535353535353535353535353535353535353535".to_string(),
            nonce: 9,
            value: "0xde0b6b3a7640000".to_string(),
            gas_price: "0x4a817c800".to_string(),
            gas_limit: "0x5208".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn matches_the_eip155_example_vector() {
        // The worked example from EIP-155: 21000 gas at 20 gwei, one ether
        // to 0x3535...35, nonce 9, mainnet.
        let hash = transact_signing_hash(&request(), 1).unwrap();
        assert_eq!(
            hash,
            "0xdaf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn chain_id_changes_the_hash() {
        let mainnet = transact_signing_hash(&request(), 1).unwrap();
        let other = transact_signing_hash(&request(), 61).unwrap();
        assert_ne!(mainnet, other);
    }

    #[test]
    fn empty_to_hashes_as_creation() {
        let mut creation = request();
        creation.to = String::new();
        let hash = transact_signing_hash(&creation, 1).unwrap();
        assert_ne!(hash, transact_signing_hash(&request(), 1).unwrap());
    }

    #[test]
    fn empty_value_and_data_are_defaults() {
        let mut sparse = request();
        sparse.value = String::new();
        let mut zeroed = request();
        zeroed.value = "0x0".to_string();
        assert_eq!(
            transact_signing_hash(&sparse, 1).unwrap(),
            transact_signing_hash(&zeroed, 1).unwrap()
        );
    }

    #[test]
    fn unprefixed_gas_price_is_rejected() {
        let mut bad = request();
        bad.gas_price = "20000000000".to_string();
        let err = transact_signing_hash(&bad, 1).unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidTxField {
                field: "gas_price",
                ..
            }
        ));
    }

    #[test]
    fn malformed_address_is_rejected() {
        let mut bad = request();
        bad.to = "0x35353535".to_string();
        let err = transact_signing_hash(&bad, 1).unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidTxField { field: "to", .. }
        ));
    }

    #[test]
    fn odd_length_data_is_rejected() {
        let mut bad = request();
        bad.data = "0xabc".to_string();
        let err = transact_signing_hash(&bad, 1).unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidTxField { field: "data", .. }
        ));
    }
}
