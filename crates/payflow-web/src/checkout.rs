//! Checkout Capabilities
//!
//! The hosted checkout is an external collaborator. These traits are the
//! seams the payment flow talks through; the browser implementations live in
//! [`crate::razorpay`] and [`crate::api`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::amount::format_inr;
use crate::error::ClientError;

/// Merchant name shown in the checkout header
pub const MERCHANT_NAME: &str = "Premium Payments";

/// Checkout accent colour
pub const THEME_COLOR: &str = "#6366f1";

/// Order metadata returned by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
    /// Minor units
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
}

/// What the checkout hands back after a successful payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// How the checkout widget ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// Payment captured; needs server verification
    Completed(PaymentConfirmation),

    /// User closed the widget
    Dismissed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Options the checkout widget is constructed with
///
/// Field names follow the Razorpay Checkout options object. Callbacks are
/// attached by the widget implementation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

impl CheckoutOptions {
    /// Options for an order created from `major_amount` rupees
    pub fn for_order(order: &CreatedOrder, major_amount: u64) -> Self {
        Self {
            key: order.key_id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            name: MERCHANT_NAME.into(),
            description: format!("Payment of ₹{}", format_inr(major_amount)),
            order_id: order.order_id.clone(),
            prefill: Prefill {
                name: String::new(),
                email: String::new(),
                contact: String::new(),
            },
            theme: Theme {
                color: THEME_COLOR.into(),
            },
        }
    }
}

/// Server endpoints
#[async_trait(?Send)]
pub trait PaymentApi {
    /// `POST /api/create-order`
    async fn create_order(&self, amount: u64) -> Result<CreatedOrder, ClientError>;

    /// `POST /api/verify-payment`; `Ok(false)` when the server rejects the signature
    async fn verify_payment(&self, confirmation: &PaymentConfirmation)
    -> Result<bool, ClientError>;
}

/// Lazily loads the processor's checkout script
#[async_trait(?Send)]
pub trait ScriptLoader {
    /// Load on first use; later calls reuse the loaded script
    async fn ensure_loaded(&self) -> Result<(), ClientError>;
}

/// Completion callback registered when the widget opens
pub type OnComplete = Box<dyn FnOnce(WidgetOutcome)>;

/// The hosted checkout widget
pub trait CheckoutWidget {
    /// Open the widget. `on_complete` runs at most once, with the outcome.
    fn open(&self, options: CheckoutOptions, on_complete: OnComplete) -> Result<(), ClientError>;
}
