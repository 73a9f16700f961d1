use crate::{ClientError, Result};
use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi},
};

fn function<'a>(abi: &'a JsonAbi, method: &str) -> Result<&'a Function> {
    abi.function(method)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| ClientError::UnknownAbiMethod(method.to_string()))
}

/// Encode a contract call as 0x-prefixed hex: the selector of the named
/// method followed by the ABI-encoded arguments.
///
/// `abi_json` is a standard contract ABI document. For overloaded methods
/// the first overload in the document is used.
pub fn encode_call(abi_json: &str, method: &str, args: &[DynSolValue]) -> Result<String> {
    let abi: JsonAbi = serde_json::from_str(abi_json)?;
    let data = function(&abi, method)?.abi_encode_input(args)?;
    Ok(hex::encode_prefixed(data))
}

/// Decode the hex return data of a contract call into the named method's
/// output values.
pub fn decode_call_output(abi_json: &str, method: &str, data: &str) -> Result<Vec<DynSolValue>> {
    let abi: JsonAbi = serde_json::from_str(abi_json)?;
    let bytes = hex::decode(data)?;
    function(&abi, method)?
        .abi_decode_output(&bytes)
        .map_err(Into::into)
}
