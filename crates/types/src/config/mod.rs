//! Configuration for the signer and node clients.

mod error;
pub use error::ConfigError;

mod env_utils;
pub use env_utils::{load_string, load_string_opt, load_u64_or};

/// Env var for the signing service base url.
const SIGNER_URL: &str = "TOKENUP_SIGNER_URL";
/// Env var for the application id.
const APP_ID: &str = "TOKENUP_APP_ID";
/// Env var for the application key.
const APP_KEY: &str = "TOKENUP_APP_KEY";
/// Env var for the request-signing private key.
const PRIVATE_KEY: &str = "TOKENUP_PRIVATE_KEY";
/// Env var for the counterparty callback public key.
const CALLBACK_PUBLIC_KEY: &str = "TOKENUP_CALLBACK_PUBLIC_KEY";
/// Env var for the signing service api version path segment.
const SIGNER_API_VERSION: &str = "TOKENUP_SIGNER_API_VERSION";

/// Env var for the node service base url.
const NODE_URL: &str = "TOKENUP_NODE_URL";
/// Env var for the fee limit, in gwei.
const FEE_LIMIT: &str = "TOKENUP_FEE_LIMIT";
/// Env var for the gas price lower bound, in wei.
const GAS_PRICE_MIN: &str = "TOKENUP_GAS_PRICE_MIN";
/// Env var for the gas price upper bound, in wei.
const GAS_PRICE_MAX: &str = "TOKENUP_GAS_PRICE_MAX";
/// Env var for the node api version path segment.
const NODE_API_VERSION: &str = "TOKENUP_NODE_API_VERSION";
/// Env var for the submission notify url.
const NODE_NOTIFY_URL: &str = "TOKENUP_NODE_NOTIFY_URL";

/// Default fee limit: 0.05 ether, in gwei.
pub const DEFAULT_FEE_LIMIT: u64 = 50_000_000;

/// Default gas price lower bound: 2 gwei, in wei.
pub const DEFAULT_GAS_PRICE_MIN: u64 = 2_000_000_000;

/// Default gas price upper bound: 30 gwei, in wei.
pub const DEFAULT_GAS_PRICE_MAX: u64 = 30_000_000_000;

/// Default node api version path segment.
pub const DEFAULT_NODE_API_VERSION: &str = "v1";

/// Credentials and endpoint for the TokenUp signing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    /// Base url of the signing service.
    pub signer_url: String,
    /// Application id, sent and signed with every request.
    pub app_id: String,
    /// Application key. Participates in request signatures but is never
    /// serialized onto the wire.
    pub app_key: String,
    /// Request-signing RSA private key: base64 of the PKCS#1 DER encoding.
    pub private_key: String,
    /// Counterparty RSA public key for callback verification: base64 of the
    /// SPKI DER encoding.
    pub callback_public_key: Option<String>,
    /// Api version inserted into request paths when set. The service default
    /// is unversioned paths.
    pub api_version: Option<String>,
}

impl SignerConfig {
    /// Create a config from the required credentials.
    pub fn new(
        signer_url: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            signer_url: signer_url.into(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            private_key: private_key.into(),
            callback_public_key: None,
            api_version: None,
        }
    }

    /// Set the counterparty public key for callback verification.
    pub fn with_callback_public_key(mut self, key: impl Into<String>) -> Self {
        self.callback_public_key = Some(key.into());
        self
    }

    /// Set the api version path segment.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Load the config from the environment.
    ///
    /// Reads `TOKENUP_SIGNER_URL`, `TOKENUP_APP_ID`, `TOKENUP_APP_KEY` and
    /// `TOKENUP_PRIVATE_KEY`, plus the optional
    /// `TOKENUP_CALLBACK_PUBLIC_KEY` and `TOKENUP_SIGNER_API_VERSION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            signer_url: load_string(SIGNER_URL)?,
            app_id: load_string(APP_ID)?,
            app_key: load_string(APP_KEY)?,
            private_key: load_string(PRIVATE_KEY)?,
            callback_public_key: load_string_opt(CALLBACK_PUBLIC_KEY),
            api_version: load_string_opt(SIGNER_API_VERSION),
        })
    }
}

/// Endpoint and fee policy for the TokenUp node service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Base url of the node service.
    pub node_url: String,
    /// Upper bound on the total fee, in gwei.
    pub fee_limit: u64,
    /// Lower bound on the gas price, in wei.
    pub gas_price_min: u64,
    /// Upper bound on the gas price, in wei.
    pub gas_price_max: u64,
    /// Api version path segment.
    pub api_version: String,
    /// Callback url filled into submissions that do not set their own.
    pub notify_url: Option<String>,
}

impl NodeConfig {
    /// Create a config for the given node url, with default fee policy.
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            fee_limit: DEFAULT_FEE_LIMIT,
            gas_price_min: DEFAULT_GAS_PRICE_MIN,
            gas_price_max: DEFAULT_GAS_PRICE_MAX,
            api_version: DEFAULT_NODE_API_VERSION.to_string(),
            notify_url: None,
        }
    }

    /// Set the fee limit, in gwei.
    pub const fn with_fee_limit(mut self, fee_limit: u64) -> Self {
        self.fee_limit = fee_limit;
        self
    }

    /// Set the gas price bounds, in wei.
    pub const fn with_gas_price_bounds(mut self, min: u64, max: u64) -> Self {
        self.gas_price_min = min;
        self.gas_price_max = max;
        self
    }

    /// Set the api version path segment.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the default callback url for submissions.
    pub fn with_notify_url(mut self, notify_url: impl Into<String>) -> Self {
        self.notify_url = Some(notify_url.into());
        self
    }

    /// Load the config from the environment.
    ///
    /// Reads `TOKENUP_NODE_URL`, plus the optional `TOKENUP_FEE_LIMIT`,
    /// `TOKENUP_GAS_PRICE_MIN`, `TOKENUP_GAS_PRICE_MAX`,
    /// `TOKENUP_NODE_API_VERSION` and `TOKENUP_NODE_NOTIFY_URL`. Unset
    /// numeric variables fall back to the documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            node_url: load_string(NODE_URL)?,
            fee_limit: load_u64_or(FEE_LIMIT, DEFAULT_FEE_LIMIT)?,
            gas_price_min: load_u64_or(GAS_PRICE_MIN, DEFAULT_GAS_PRICE_MIN)?,
            gas_price_max: load_u64_or(GAS_PRICE_MAX, DEFAULT_GAS_PRICE_MAX)?,
            api_version: load_string_opt(NODE_API_VERSION)
                .unwrap_or_else(|| DEFAULT_NODE_API_VERSION.to_string()),
            notify_url: load_string_opt(NODE_NOTIFY_URL),
        })
    }
}
