//! Razorpay Configuration
//!
//! Credentials are read once at startup and passed explicitly into
//! [`PaymentService`](crate::PaymentService). Absent credentials are not a
//! startup failure: each request that needs them reports
//! [`PaymentError::MisconfiguredCredentials`].

use crate::error::{PaymentError, Result};

/// Default processor API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

/// Default settlement currency
pub const DEFAULT_CURRENCY: &str = "INR";

const KEYS_MISSING: &str = "Razorpay credentials not configured. \
    Please add RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET to your environment.";

const SECRET_MISSING: &str = "Razorpay secret not configured";

/// Processor configuration
#[derive(Clone, Debug)]
pub struct RazorpayConfig {
    /// Public key id, handed to the browser to open checkout
    pub key_id: Option<String>,

    /// Private signing secret, never leaves the server
    pub key_secret: Option<String>,

    /// Currency code used for every order
    pub currency: String,

    /// Processor API base URL (overridable for tests and sandboxes)
    pub api_base: String,
}

impl Default for RazorpayConfig {
    /// No credentials, default currency and endpoint
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            currency: DEFAULT_CURRENCY.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }
}

/// A complete key pair for authenticated processor calls
#[derive(Clone, Debug)]
pub struct ApiCredentials<'a> {
    pub key_id: &'a str,
    pub key_secret: &'a str,
}

impl RazorpayConfig {
    /// Create a configuration with both keys and the default currency and endpoint
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: Some(key_id.into()),
            key_secret: Some(key_secret.into()),
            currency: DEFAULT_CURRENCY.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }

    /// Create from environment variables
    ///
    /// Reads `RAZORPAY_KEY_ID`, `RAZORPAY_KEY_SECRET`, `PAYMENT_CURRENCY`
    /// and `RAZORPAY_API_BASE`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            key_id: get("RAZORPAY_KEY_ID"),
            key_secret: get("RAZORPAY_KEY_SECRET"),
            currency: get("PAYMENT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.into()),
            api_base: get("RAZORPAY_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
        }
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Key pair needed to create orders
    pub fn credentials(&self) -> Result<ApiCredentials<'_>> {
        match (self.key_id.as_deref(), self.key_secret.as_deref()) {
            (Some(key_id), Some(key_secret)) => Ok(ApiCredentials { key_id, key_secret }),
            _ => Err(PaymentError::MisconfiguredCredentials(KEYS_MISSING.into())),
        }
    }

    /// Secret needed to verify payment signatures
    pub fn signing_secret(&self) -> Result<&str> {
        self.key_secret
            .as_deref()
            .ok_or_else(|| PaymentError::MisconfiguredCredentials(SECRET_MISSING.into()))
    }

    /// Whether both keys are present
    pub const fn is_configured(&self) -> bool {
        self.key_id.is_some() && self.key_secret.is_some()
    }
}
