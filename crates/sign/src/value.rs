//! The closed set of values that can participate in a request signature.

use crate::SignError;
use std::{borrow::Cow, collections::BTreeMap};

/// A value that can be canonically encoded for signing.
///
/// The set is closed: every signable request maps its fields into these
/// shapes up front, and the encoder handles nothing else. Dynamic payloads
/// enter through [`SignValue::from_json`], which rejects anything outside
/// the set.
#[derive(Debug, Clone, PartialEq)]
pub enum SignValue {
    /// A boolean, encoded as `true` or `false`.
    Bool(bool),
    /// A signed integer, encoded in decimal.
    Int(i64),
    /// An unsigned integer, encoded in decimal.
    Uint(u64),
    /// A 32-bit float, encoded in exponential form at 32-bit precision.
    F32(f32),
    /// A 64-bit float, encoded in exponential form at 64-bit precision.
    F64(f64),
    /// A string, encoded form-urlencoded.
    Str(String),
    /// A sequence; every element is encoded under the `[]`-suffixed key.
    Seq(Vec<SignValue>),
    /// A string-keyed map; entries are encoded under dotted keys.
    Map(BTreeMap<String, SignValue>),
    /// A nested record, flattened under the parent key.
    Record(SignRecord),
}

impl SignValue {
    /// Map a JSON value into the signable set.
    ///
    /// Whole numbers become [`SignValue::Int`] or [`SignValue::Uint`];
    /// only fractional numbers take the float forms. JSON `null` has no
    /// canonical encoding and is rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SignError> {
        match value {
            serde_json::Value::Null => Err(SignError::Unsupported("null")),
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::Uint(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::F64(f))
                } else {
                    Err(SignError::Unsupported("number"))
                }
            }
            serde_json::Value::String(s) => Ok(Self::Str(s.clone())),
            serde_json::Value::Array(items) => {
                items.iter().map(Self::from_json).collect::<Result<_, _>>().map(Self::Seq)
            }
            serde_json::Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), Self::from_json(v)?)))
                .collect::<Result<_, _>>()
                .map(Self::Map),
        }
    }
}

impl From<bool> for SignValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SignValue {
                fn from(value: $ty) -> Self {
                    Self::Int(value as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SignValue {
                fn from(value: $ty) -> Self {
                    Self::Uint(value as u64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64);
impl_from_uint!(u8, u16, u32, u64);

impl From<f32> for SignValue {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<f64> for SignValue {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<&str> for SignValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for SignValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<SignValue>> From<Vec<T>> for SignValue {
    fn from(value: Vec<T>) -> Self {
        Self::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SignValue>> From<BTreeMap<String, T>> for SignValue {
    fn from(value: BTreeMap<String, T>) -> Self {
        Self::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<SignRecord> for SignValue {
    fn from(value: SignRecord) -> Self {
        Self::Record(value)
    }
}

/// An ordered set of named [`SignValue`]s: the signable field set of a
/// request.
///
/// Only fields added here participate in the signature, under exactly the
/// name given. Declaration order never affects the canonical encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignRecord {
    fields: Vec<(Cow<'static, str>, SignValue)>,
}

impl SignRecord {
    /// Create an empty record.
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a named field to the record.
    pub fn field(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<SignValue>,
    ) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// The fields of the record, in declaration order.
    pub fn fields(&self) -> &[(Cow<'static, str>, SignValue)] {
        &self.fields
    }

    /// True if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A request whose signature-relevant fields can be laid out as a
/// [`SignRecord`].
pub trait Signable {
    /// The canonical field set covered by this request's signature.
    fn sign_record(&self) -> SignRecord;
}

impl Signable for SignRecord {
    fn sign_record(&self) -> SignRecord {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_maps_whole_numbers_to_integers() {
        assert_eq!(SignValue::from_json(&json!(2)).unwrap(), SignValue::Int(2));
        assert_eq!(SignValue::from_json(&json!(-2)).unwrap(), SignValue::Int(-2));
        assert_eq!(
            SignValue::from_json(&json!(u64::MAX)).unwrap(),
            SignValue::Uint(u64::MAX)
        );
        assert_eq!(SignValue::from_json(&json!(2.5)).unwrap(), SignValue::F64(2.5));
    }

    #[test]
    fn from_json_rejects_null() {
        assert!(matches!(
            SignValue::from_json(&serde_json::Value::Null),
            Err(SignError::Unsupported("null"))
        ));
        // Nulls nested inside containers are rejected too.
        assert!(SignValue::from_json(&json!({ "a": [1, null] })).is_err());
    }

    #[test]
    fn from_json_walks_containers() {
        let value = SignValue::from_json(&json!({ "xs": [1, "two"], "flag": true })).unwrap();
        let SignValue::Map(entries) = value else { panic!("expected map") };
        assert_eq!(entries["flag"], SignValue::Bool(true));
        assert_eq!(
            entries["xs"],
            SignValue::Seq(vec![SignValue::Int(1), SignValue::Str("two".to_string())])
        );
    }

    #[test]
    fn record_keeps_declaration_order() {
        let record = SignRecord::new().field("b", 1u8).field("a", 2u8);
        let names: Vec<_> = record.fields().iter().map(|(name, _)| name.as_ref()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
