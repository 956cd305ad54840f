//! Order Initiation and Payment Verification
//!
//! Stateless: nothing survives between the two calls. The order id issued by
//! [`PaymentService::create_order`] is the only thing correlating it with the
//! later [`PaymentService::verify_payment`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RazorpayConfig;
use crate::error::{PaymentError, Result};
use crate::gateway::{OrderGateway, OrderRequest, receipt_label};
use crate::signature::verify_signature;

/// Major to minor currency units
pub const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// Order metadata returned to the browser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    /// Processor-assigned order id
    pub order_id: String,

    /// Amount in minor units
    pub amount: u64,

    /// Currency code
    pub currency: String,

    /// Public key id the checkout widget is opened with
    pub key_id: String,
}

/// Payment confirmation produced by the hosted checkout
///
/// Fields are optional so that absent values can be reported as
/// [`PaymentError::MissingFields`] rather than as a decode failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

/// A confirmation whose signature checked out
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub payment_id: String,
    pub order_id: String,
}

/// Parse a requested amount in major units.
///
/// Accepts JSON integers `>= 1` and integral floats such as `500.0`.
pub fn parse_major_amount(amount: Option<&Value>) -> Result<u64> {
    let number = match amount {
        Some(Value::Number(number)) => number,
        _ => return Err(PaymentError::InvalidAmount),
    };

    let major = if let Some(n) = number.as_u64() {
        n
    } else {
        match number.as_f64() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= u64::MAX as f64 => f as u64,
            _ => return Err(PaymentError::InvalidAmount),
        }
    };

    if major < 1 {
        return Err(PaymentError::InvalidAmount);
    }
    Ok(major)
}

/// Convert a major-unit amount to minor units
pub fn to_minor_units(major: u64) -> Result<u64> {
    major
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .ok_or(PaymentError::InvalidAmount)
}

fn required(field: Option<&String>) -> Result<&str> {
    field
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(PaymentError::MissingFields)
}

/// Payment service
pub struct PaymentService {
    config: RazorpayConfig,
    gateway: Arc<dyn OrderGateway>,
}

impl PaymentService {
    /// Create a new service from explicit configuration
    pub fn new(config: RazorpayConfig, gateway: Arc<dyn OrderGateway>) -> Self {
        Self { config, gateway }
    }

    /// Get the configuration
    pub const fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    /// Create a processor order for `amount` major units
    pub async fn create_order(&self, amount: Option<&Value>) -> Result<PaymentOrder> {
        let major = parse_major_amount(amount)?;
        let credentials = self.config.credentials()?;

        let request = OrderRequest {
            amount: to_minor_units(major)?,
            currency: self.config.currency.clone(),
            receipt: receipt_label(),
        };

        tracing::debug!(
            gateway = self.gateway.name(),
            amount = request.amount,
            currency = %request.currency,
            receipt = %request.receipt,
            "Creating order"
        );

        let order = self.gateway.create_order(&credentials, &request).await?;

        tracing::info!(
            order_id = %order.id,
            amount = order.amount,
            currency = %order.currency,
            "Created order"
        );

        Ok(PaymentOrder {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: credentials.key_id.to_string(),
        })
    }

    /// Verify a payment confirmation's signature
    pub fn verify_payment(&self, confirmation: &PaymentConfirmation) -> Result<VerifiedPayment> {
        let payment_id = required(confirmation.razorpay_payment_id.as_ref())?;
        let order_id = required(confirmation.razorpay_order_id.as_ref())?;
        let signature = required(confirmation.razorpay_signature.as_ref())?;

        let secret = self.config.signing_secret()?;

        if !verify_signature(secret, order_id, payment_id, signature)? {
            tracing::warn!(
                order_id = %order_id,
                payment_id = %payment_id,
                "Payment signature mismatch"
            );
            return Err(PaymentError::InvalidSignature);
        }

        tracing::info!(order_id = %order_id, payment_id = %payment_id, "Payment verified");

        Ok(VerifiedPayment {
            payment_id: payment_id.to_string(),
            order_id: order_id.to_string(),
        })
    }
}
