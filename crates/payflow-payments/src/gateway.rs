//! Razorpay Orders API
//!
//! [`OrderGateway`] is the seam between the service and the processor. The
//! production implementation is [`RazorpayClient`]; tests substitute fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ApiCredentials, RazorpayConfig};
use crate::error::{PaymentError, Result};

/// Razorpay caps receipts at 40 characters
const MAX_RECEIPT_LEN: usize = 40;

/// Order parameters sent to the processor
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Amount in minor units (paise for INR)
    pub amount: u64,

    /// Currency code
    pub currency: String,

    /// Merchant-side label for the order
    pub receipt: String,
}

/// Order as returned by the processor
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProcessorOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Processor order creation (Strategy pattern)
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order. A single attempt; failures are not retried.
    async fn create_order(
        &self,
        credentials: &ApiCredentials<'_>,
        request: &OrderRequest,
    ) -> Result<ProcessorOrder>;

    /// Gateway name, for logs
    fn name(&self) -> &str;
}

/// Best-effort unique receipt label: millisecond timestamp plus a random suffix
pub fn receipt_label() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let mut receipt = format!("receipt_{millis}_{}", &suffix[..8]);
    receipt.truncate(MAX_RECEIPT_LEN);
    receipt
}

/// Razorpay error envelope: `{"error": {"code": ..., "description": ...}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// HTTP client for the Razorpay REST API
pub struct RazorpayClient {
    http: reqwest::Client,
    api_base: String,
}

impl RazorpayClient {
    /// Create a new client against the given API base URL
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create using the endpoint from a configuration
    pub fn from_config(config: &RazorpayConfig) -> Self {
        Self::new(config.api_base.clone())
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.api_base)
    }
}

#[async_trait]
impl OrderGateway for RazorpayClient {
    async fn create_order(
        &self,
        credentials: &ApiCredentials<'_>,
        request: &OrderRequest,
    ) -> Result<ProcessorOrder> {
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(credentials.key_id, Some(credentials.key_secret))
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::OrderCreationFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(ErrorEnvelope { error }) => format!(
                    "{}: {}",
                    error.code.as_deref().unwrap_or("UNKNOWN"),
                    error.description.as_deref().unwrap_or("no description"),
                ),
                Err(_) => body,
            };
            return Err(PaymentError::OrderCreationFailed(format!(
                "processor returned {status}: {detail}"
            )));
        }

        response
            .json::<ProcessorOrder>()
            .await
            .map_err(|e| PaymentError::OrderCreationFailed(format!("invalid order response: {e}")))
    }

    fn name(&self) -> &str {
        "razorpay"
    }
}
