use crate::{ClientError, Result};
use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokenup_sign::{
    verify_received, AuthEnvelope, EnvelopeSealer, NonceSource, ProxySignRequest, ReceivedConfirm,
    RsaSigner, RsaVerifier, TraceRequest,
};
use tokenup_types::{
    SignReceipt, SignSource, SignedHash, SignerConfig, SignerResponse, TracePayload,
};
use tracing::{debug, instrument, warn};

/// Path for submitting a single hash to be signed.
const SIGN_HASH: &str = "vendor/proxy/sign_hash";
/// Path for submitting a hash to the pending-approval queue.
const PENDING_SIGN_HASH: &str = "vendor/proxy/pending_sign_hash";
/// Path for querying the status of a signing job.
const TRACING: &str = "vendor/status/tracing";
/// Path for fetching the transaction record attached to a signing job.
const TX_STATUS: &str = "vendor/tx/status";

/// Interval between status queries while awaiting completion of a signing
/// job.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Client for the remote signing service.
///
/// Every write request is sealed before it is sent: the client stamps the
/// current timestamp, the configured identity, and a fresh nonce onto the
/// request body, then signs the canonical rendering of the body and attaches
/// the signature. Sealing is handled by [`EnvelopeSealer`].
#[derive(Debug, Clone)]
pub struct SignerClient {
    /// Base url of the signing service.
    url: Url,
    /// Optional api version segment inserted between the base url and the
    /// endpoint path.
    api_version: Option<String>,
    /// HTTP client.
    client: reqwest::Client,
    /// Seals outgoing request envelopes.
    sealer: EnvelopeSealer,
    /// Verifier for callback notifications, if a callback public key is
    /// configured.
    callback: Option<RsaVerifier>,
}

impl SignerClient {
    /// Create a new client from a config, using the given HTTP client.
    ///
    /// Must be called from within a Tokio runtime, as the client spawns a
    /// background nonce producer.
    pub fn from_config_with_client(
        config: &SignerConfig,
        client: reqwest::Client,
    ) -> Result<Self> {
        let signer = RsaSigner::from_pkcs1_base64(&config.private_key)?;
        let callback = match &config.callback_public_key {
            Some(key) => Some(RsaVerifier::from_spki_base64(key)?),
            None => None,
        };
        let sealer = EnvelopeSealer::new(
            config.app_id.clone(),
            config.app_key.clone(),
            signer,
            NonceSource::spawn(),
        );
        Ok(Self {
            url: crate::util::base_url(&config.signer_url)?,
            api_version: config.api_version.clone(),
            client,
            sealer,
            callback,
        })
    }

    /// Create a new client from a config.
    ///
    /// Must be called from within a Tokio runtime, as the client spawns a
    /// background nonce producer.
    pub fn from_config(config: &SignerConfig) -> Result<Self> {
        Self::from_config_with_client(config, reqwest::Client::new())
    }

    /// Get a reference to the base url.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve an endpoint path against the base url, inserting the api
    /// version segment when one is configured.
    fn endpoint(&self, path: &str) -> Result<Url> {
        match &self.api_version {
            Some(version) => self.url.join(&format!("{version}/{path}")),
            None => self.url.join(path),
        }
        .map_err(Into::into)
    }

    /// Seal and send a request envelope, parsing the response body.
    ///
    /// A non-200 status aborts with [`ClientError::Rejected`] carrying the
    /// status code and the message from the body.
    async fn signer_post<E, T>(&self, path: &str, mut envelope: E) -> Result<SignerResponse<T>>
    where
        E: AuthEnvelope + Serialize,
        T: DeserializeOwned,
    {
        self.sealer.seal(&mut envelope).await?;
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .json(&envelope)
            .send()
            .await
            .inspect_err(|e| warn!(%e, "failed to reach signing service"))?;
        let code = response.status();
        let body: SignerResponse<T> = response
            .json()
            .await
            .inspect_err(|e| warn!(%e, "failed to parse signing service response"))?;
        if code != StatusCode::OK {
            return Err(ClientError::Rejected {
                code: code.as_u16(),
                message: body.status.message,
            });
        }
        Ok(body)
    }

    /// Submit a hash to be signed. Returns the receipt identifying the
    /// asynchronous signing job.
    #[instrument(skip_all, fields(order_id = %source.order_id))]
    pub async fn sign_hash(&self, source: SignSource) -> Result<SignReceipt> {
        let response: SignerResponse<SignReceipt> = self
            .signer_post(SIGN_HASH, ProxySignRequest::from(source))
            .await?;
        response.into_data().ok_or(ClientError::EmptyResponse)
    }

    /// Submit a hash to the pending-approval queue. The job completes only
    /// after out-of-band approval.
    #[instrument(skip_all, fields(order_id = %source.order_id))]
    pub async fn batch_sign_hash(&self, source: SignSource) -> Result<SignReceipt> {
        let response: SignerResponse<SignReceipt> = self
            .signer_post(PENDING_SIGN_HASH, ProxySignRequest::from(source))
            .await?;
        response.into_data().ok_or(ClientError::EmptyResponse)
    }

    /// Query the status of a signing job. The data payload is absent while
    /// the job is still in progress.
    #[instrument(skip_all, fields(request_id))]
    pub async fn trace(&self, request_id: &str) -> Result<SignerResponse<TracePayload>> {
        self.signer_post(TRACING, TraceRequest::new(request_id)).await
    }

    /// Fetch the transaction record attached to a signing job.
    #[instrument(skip_all, fields(request_id))]
    pub async fn tx_status(&self, request_id: &str) -> Result<SignerResponse<serde_json::Value>> {
        let url = self.endpoint(&format!("{TX_STATUS}/{request_id}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| warn!(%e, "failed to reach signing service"))?;
        let code = response.status();
        let body: SignerResponse<serde_json::Value> = response
            .json()
            .await
            .inspect_err(|e| warn!(%e, "failed to parse signing service response"))?;
        if code != StatusCode::OK {
            return Err(ClientError::Rejected {
                code: code.as_u16(),
                message: body.status.message,
            });
        }
        Ok(body)
    }

    /// Poll a signing job until it completes or the deadline elapses.
    ///
    /// Status queries are issued on a fixed 200ms cadence, strictly
    /// sequentially. The deadline is checked before each query; when the
    /// deadline and the next tick are both due, the deadline wins and the
    /// poll ends with [`ClientError::Timeout`] carrying the request id. A
    /// rejected status query aborts the poll immediately.
    #[instrument(skip_all, fields(request_id))]
    pub async fn await_completion(
        &self,
        request_id: &str,
        timeout: Duration,
    ) -> Result<SignedHash> {
        let deadline = tokio::time::Instant::now() + timeout;
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut sleep => {
                    debug!(request_id, "deadline elapsed before completion");
                    return Err(ClientError::Timeout {
                        request_id: request_id.to_string(),
                    });
                }
                _ = ticker.tick() => {}
            }
            let response = match self.trace(request_id).await {
                Ok(response) => response,
                Err(ClientError::Rejected { code, message }) => {
                    return Err(ClientError::PollRejected {
                        request_id: request_id.to_string(),
                        code,
                        message,
                    })
                }
                Err(e) => return Err(e),
            };
            if let Some(payload) = response.into_data() {
                return Ok(SignedHash::new(
                    payload.into_signature(),
                    request_id.to_string(),
                ));
            }
        }
    }

    /// Submit a hash and await the signature.
    ///
    /// Combines [`Self::sign_hash`] and [`Self::await_completion`]. The
    /// timeout covers only the polling phase, not the submission.
    #[instrument(skip_all, fields(order_id = %source.order_id))]
    pub async fn sign_sync(&self, source: SignSource, timeout: Duration) -> Result<SignedHash> {
        let receipt = self.sign_hash(source).await?;
        self.await_completion(&receipt.request_id, timeout).await
    }

    /// Verify the signature on a callback notification against the
    /// configured callback public key.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match,
    /// and an error if no callback public key is configured or the signature
    /// is not valid hex.
    pub fn verify_callback(&self, confirm: &ReceivedConfirm) -> Result<bool> {
        let verifier = self.callback.as_ref().ok_or(ClientError::NoCallbackKey)?;
        verify_received(confirm, self.sealer.app_key(), verifier).map_err(Into::into)
    }
}
