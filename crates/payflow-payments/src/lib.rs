//! # payflow-payments
//!
//! Razorpay order creation and payment signature verification for payflow.
//!
//! ## Payment flow
//!
//! ```text
//! ┌─────────────┐  create_order   ┌─────────────┐  POST /v1/orders  ┌──────────┐
//! │   Browser   │────────────────▶│   Server    │──────────────────▶│ Razorpay │
//! │             │◀────────────────│             │◀──────────────────│          │
//! │             │  order id, key  └─────────────┘     order id      └──────────┘
//! │             │
//! │  Razorpay   │  payment id, order id, signature
//! │  Checkout   │────────────────▶ verify_payment (HMAC-SHA256 with key secret)
//! └─────────────┘
//! ```
//!
//! The signature check in [`PaymentService::verify_payment`] is the only
//! proof that a confirmation came from the processor; without it a client
//! could claim any payment succeeded.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use payflow_payments::{PaymentService, RazorpayClient, RazorpayConfig};
//!
//! let config = RazorpayConfig::from_env();
//! let gateway = Arc::new(RazorpayClient::from_config(&config));
//! let service = PaymentService::new(config, gateway);
//!
//! let order = service.create_order(Some(&serde_json::json!(500))).await?;
//! // order.amount == 50000 (paise)
//! ```

mod config;
mod error;
mod gateway;
mod service;
mod signature;

pub use config::{ApiCredentials, DEFAULT_API_BASE, DEFAULT_CURRENCY, RazorpayConfig};
pub use error::{PaymentError, Result};
pub use gateway::{OrderGateway, OrderRequest, ProcessorOrder, RazorpayClient, receipt_label};
pub use service::{
    MINOR_UNITS_PER_MAJOR, PaymentConfirmation, PaymentOrder, PaymentService, VerifiedPayment,
    parse_major_amount, to_minor_units,
};
pub use signature::{expected_signature, verify_signature};
