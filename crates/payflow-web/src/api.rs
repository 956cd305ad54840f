//! API Client

use async_trait::async_trait;
use serde::Deserialize;

use crate::checkout::{CreatedOrder, PaymentApi, PaymentConfirmation};
use crate::error::ClientError;

const ORDER_FAILED: &str = "Failed to create order";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    #[serde(default)]
    success: bool,
}

/// Talks to the payflow server over HTTP
#[derive(Clone, Debug)]
pub struct HttpPaymentApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Same origin as the page
    pub fn from_window() -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost:3000".into());
        Self::new(origin)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait(?Send)]
impl PaymentApi for HttpPaymentApi {
    async fn create_order(&self, amount: u64) -> Result<CreatedOrder, ClientError> {
        let response = self
            .client
            .post(self.url("/api/create-order"))
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await
            .map_err(|_| ClientError::OrderCreationFailed(ORDER_FAILED.into()))?;

        if response.status().is_success() {
            response
                .json::<CreatedOrder>()
                .await
                .map_err(|_| ClientError::OrderCreationFailed(ORDER_FAILED.into()))
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| ORDER_FAILED.into());
            Err(ClientError::OrderCreationFailed(message))
        }
    }

    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<bool, ClientError> {
        // Rejections come back as 400 with `success: false`, so status is not checked
        let body = self
            .client
            .post(self.url("/api/verify-payment"))
            .json(confirmation)
            .send()
            .await
            .map_err(|_| ClientError::VerificationFailed)?
            .json::<VerifyBody>()
            .await
            .map_err(|_| ClientError::VerificationFailed)?;

        Ok(body.success)
    }
}
