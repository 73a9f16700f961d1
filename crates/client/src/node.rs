use crate::{
    abi::decode_call_output, hash::transact_signing_hash, ClientError, Result, SignerClient,
};
use alloy::dyn_abi::DynSolValue;
use chrono::Utc;
use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokenup_types::{
    CallRequest, CallResponse, DetailResponse, EstimateData, EstimateRequest, EstimateResponse,
    NodeConfig, NodeResponse, SignSource, TransactRequest, TransactResponse, TxRecord,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Path for fee and nonce estimation.
const TX_ESTIMATE: &str = "tx/estimate";
/// Path for submitting a signed transaction.
const TX_TRANSACT: &str = "tx/transact";
/// Path for read-only contract calls.
const TX_CALL: &str = "tx/call";
/// Path prefix for transaction details.
const TX: &str = "tx";

/// Deadline for the signing round trip inside a submission.
const SIGN_TIMEOUT: Duration = Duration::from_secs(5);
/// Extras tag stamped onto signing requests raised by submissions.
const SUBMISSION_EXTRAS: &str = "tokenup-sdk";

/// Client for the node gateway fronting the chain.
///
/// The gateway speaks a versioned REST dialect: every endpoint path is
/// prefixed with the api version from the config. Submissions are signed
/// through a [`SignerClient`] rather than with a local key.
#[derive(Debug, Clone)]
pub struct NodeClient {
    /// Base url of the gateway.
    url: Url,
    /// Fee policy and gateway settings.
    config: NodeConfig,
    /// HTTP client.
    client: reqwest::Client,
}

impl NodeClient {
    /// Create a new client from a config, using the given HTTP client.
    pub fn from_config_with_client(config: NodeConfig, client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            url: crate::util::base_url(&config.node_url)?,
            config,
            client,
        })
    }

    /// Create a new client from a config.
    pub fn from_config(config: NodeConfig) -> Result<Self> {
        Self::from_config_with_client(config, reqwest::Client::new())
    }

    /// Get a reference to the base url.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Get a reference to the config.
    pub const fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Resolve an endpoint path against the base url, under the configured
    /// api version segment.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.url
            .join(&format!("{}/{path}", self.config.api_version))
            .map_err(Into::into)
    }

    async fn node_post<B, T>(&self, path: &str, body: &B) -> Result<NodeResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .inspect_err(|e| warn!(%e, "failed to reach node gateway"))?;
        check(response).await
    }

    async fn node_get<T: DeserializeOwned>(&self, path: &str) -> Result<NodeResponse<T>> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| warn!(%e, "failed to reach node gateway"))?;
        check(response).await
    }

    /// Build an estimate request for a payload, filling the fee policy from
    /// the config.
    pub fn estimate_request(&self, from: &str, to: &str, data: &str) -> EstimateRequest {
        EstimateRequest {
            from: from.to_string(),
            to: to.to_string(),
            data: data.to_string(),
            fee_limit: self.config.fee_limit,
            gas_price_min: self.config.gas_price_min,
            gas_price_max: self.config.gas_price_max,
        }
    }

    /// Estimate the gas price, gas limit, and next nonce for a transaction.
    #[instrument(skip_all, fields(from = %request.from, to = %request.to))]
    pub async fn estimate(&self, request: EstimateRequest) -> Result<EstimateData> {
        let response: EstimateResponse = self.node_post(TX_ESTIMATE, &request).await?;
        response.into_data().ok_or(ClientError::EmptyResponse)
    }

    /// Sign and submit a transaction.
    ///
    /// The request is first completed from an estimate: gas price, nonce,
    /// and notify url are filled only when the caller left them empty, while
    /// the estimated gas limit always wins. The completed request is then
    /// hashed, signed through the signing service, and submitted.
    #[instrument(skip_all, fields(from = %request.from, to = %request.to))]
    pub async fn send_tx(
        &self,
        mut request: TransactRequest,
        signer: &SignerClient,
    ) -> Result<TxRecord> {
        let estimate = self
            .estimate(self.estimate_request(&request.from, &request.to, &request.data))
            .await?;

        if request.gas_price.is_empty() {
            request.gas_price = estimate.gas_price.clone();
        }
        if request.nonce == 0 {
            request.nonce = estimate.nonce;
        }
        if request.notify_url.is_empty() {
            if let Some(notify_url) = &self.config.notify_url {
                request.notify_url = notify_url.clone();
            }
        }
        request.gas_limit = estimate.gas;

        let signing_hash = transact_signing_hash(&request, estimate.chain_id)?;
        debug!(signing_hash, "requesting signature for submission");
        let source = SignSource::new(request.from.clone(), signing_hash)
            .with_extras(SUBMISSION_EXTRAS)
            .with_order_id(mint_order_id());
        request.signature = signer.sign_sync(source, SIGN_TIMEOUT).await?.signature;

        let response: TransactResponse = self.node_post(TX_TRANSACT, &request).await?;
        response.into_data().ok_or(ClientError::EmptyResponse)
    }

    /// Fetch the record of a submitted transaction by hash.
    #[instrument(skip_all, fields(tx_hash))]
    pub async fn tx_detail(&self, tx_hash: &str) -> Result<TxRecord> {
        let response: DetailResponse = self.node_get(&format!("{TX}/{tx_hash}")).await?;
        response.into_data().ok_or(ClientError::EmptyResponse)
    }

    /// Execute a read-only contract call, decoding the return data with the
    /// given ABI document.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn call(&self, request: CallRequest, abi_json: &str) -> Result<Vec<DynSolValue>> {
        let method = request.method.clone();
        let response: CallResponse = self.node_post(TX_CALL, &request).await?;
        let data = response.into_data().ok_or(ClientError::EmptyResponse)?;
        decode_call_output(abi_json, &method, &data)
    }
}

/// Parse a gateway response, mapping non-200 statuses to
/// [`ClientError::Node`].
async fn check<T: DeserializeOwned>(response: reqwest::Response) -> Result<NodeResponse<T>> {
    let code = response.status();
    let body: NodeResponse<T> = response
        .json()
        .await
        .inspect_err(|e| warn!(%e, "failed to parse node gateway response"))?;
    if code != StatusCode::OK {
        return Err(ClientError::Node {
            code: code.as_u16(),
            message: body.message,
        });
    }
    Ok(body)
}

/// Mint a fresh order id for a submission.
fn mint_order_id() -> String {
    format!("sign_{}{}", Uuid::new_v4(), Utc::now().format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::mint_order_id;

    #[test]
    fn order_ids_are_prefixed_and_unique() {
        let a = mint_order_id();
        let b = mint_order_id();
        assert!(a.starts_with("sign_"));
        // uuid (36 chars) plus a 14-digit timestamp.
        assert_eq!(a.len(), "sign_".len() + 36 + 14);
        assert_ne!(a, b);
    }
}
