//! Canonical encoding of signable records.
//!
//! A record is flattened into `key=value` pairs, the pairs are sorted and
//! joined with `&`, and the result is what gets signed. The remote verifier
//! re-derives the same string from the request it received, so every rule
//! here is part of the wire contract:
//!
//! - nested records extend the key with a dot: `outer.inner`
//! - sequence elements share the parent key with a `[]` suffix
//! - map entries extend the key with a dot and the entry key
//! - values are form-urlencoded; keys are not
//! - the full `key=value` strings are sorted lexicographically with a
//!   stable sort

use crate::{SignRecord, SignValue, Signable};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped in canonical values: everything outside `A-Za-z0-9-_.~`.
/// Space stays unescaped here and is rewritten to `+` afterwards.
const VALUE_ESCAPE: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~').remove(b' ');

/// Produce the canonical encoding of a signable request.
///
/// The result depends only on the field set: declaration order, map
/// iteration order and nesting source never change it. Float values keep
/// their exponential form at their own bit width (`1.5E+00`, `2.5E-05`),
/// which is the rendering the verifier expects.
pub fn encode(value: &impl Signable) -> String {
    let record = value.sign_record();
    let mut pairs = Vec::new();
    flatten_record("", &record, &mut pairs);
    pairs.sort();
    pairs.join("&")
}

fn flatten_record(prefix: &str, record: &SignRecord, out: &mut Vec<String>) {
    for (name, value) in record.fields() {
        let key = if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") };
        flatten_value(&key, value, out);
    }
}

fn flatten_value(key: &str, value: &SignValue, out: &mut Vec<String>) {
    match value {
        SignValue::Bool(v) => push_pair(key, if *v { "true" } else { "false" }, out),
        SignValue::Int(v) => push_pair(key, &v.to_string(), out),
        SignValue::Uint(v) => push_pair(key, &v.to_string(), out),
        SignValue::F32(v) => push_pair(key, &exponential_f32(*v), out),
        SignValue::F64(v) => push_pair(key, &exponential_f64(*v), out),
        SignValue::Str(v) => push_pair(key, v, out),
        SignValue::Seq(items) => {
            let key = format!("{key}[]");
            for item in items {
                flatten_value(&key, item, out);
            }
        }
        SignValue::Map(entries) => {
            for (entry_key, item) in entries {
                flatten_value(&format!("{key}.{entry_key}"), item, out);
            }
        }
        SignValue::Record(record) => flatten_record(key, record, out),
    }
}

fn push_pair(key: &str, raw: &str, out: &mut Vec<String>) {
    out.push(format!("{key}={}", escape(raw)));
}

/// Form-urlencode a value: unreserved bytes pass, space becomes `+`,
/// everything else becomes an uppercase percent escape.
fn escape(raw: &str) -> String {
    // Escaping never emits a literal space, so the rewrite cannot touch an
    // escape triple.
    utf8_percent_encode(raw, VALUE_ESCAPE).to_string().replace(' ', "+")
}

/// Shortest exponential rendering of an `f32`, with explicit exponent sign
/// and at least two exponent digits.
fn exponential_f32(value: f32) -> String {
    if value.is_finite() {
        widen_exponent(format!("{value:E}"))
    } else {
        non_finite(value.is_nan(), value.is_sign_negative())
    }
}

/// Shortest exponential rendering of an `f64`, with explicit exponent sign
/// and at least two exponent digits.
fn exponential_f64(value: f64) -> String {
    if value.is_finite() {
        widen_exponent(format!("{value:E}"))
    } else {
        non_finite(value.is_nan(), value.is_sign_negative())
    }
}

/// Rewrite `{:E}` output (`1.5E0`, `2.5E-5`) into the verifier's exponent
/// shape (`1.5E+00`, `2.5E-05`).
fn widen_exponent(formatted: String) -> String {
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

/// The verifier renders non-finite floats as Go tokens.
fn non_finite(is_nan: bool, is_negative: bool) -> String {
    if is_nan {
        "NaN".to_string()
    } else if is_negative {
        "-Inf".to_string()
    } else {
        "+Inf".to_string()
    }
}
