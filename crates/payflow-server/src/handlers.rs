//! HTTP Handlers

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::Value;

use payflow_payments::{PaymentConfirmation, PaymentError, PaymentOrder};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub credentials_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: &'static str,
    pub payment_id: String,
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentFailure {
    pub success: bool,
    pub error: String,
}

type ApiError<T> = (StatusCode, Json<T>);

const fn status_for(err: &PaymentError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn log_failure(operation: &str, err: &PaymentError) {
    if err.is_client_error() {
        tracing::debug!(operation, "Rejected request: {}", err);
    } else {
        tracing::error!(operation, "Request failed: {}", err);
    }
}

fn order_error(err: &PaymentError) -> ApiError<ErrorResponse> {
    log_failure("create_order", err);
    (
        status_for(err),
        Json(ErrorResponse {
            error: err.user_message().into(),
        }),
    )
}

fn verify_error(err: &PaymentError) -> ApiError<VerifyPaymentFailure> {
    log_failure("verify_payment", err);
    (
        status_for(err),
        Json(VerifyPaymentFailure {
            success: false,
            error: err.user_message().into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        credentials_configured: state.payments.config().is_configured(),
    })
}

/// Parse a JSON body whatever its Content-Type; `None` when unreadable
fn parse_body(operation: &str, body: &Bytes) -> Option<Value> {
    serde_json::from_slice(body)
        .map_err(|e| tracing::debug!(operation, "Unreadable request body: {}", e))
        .ok()
}

/// A string member of the body; absent, non-string and non-object all read as `None`
fn string_field(body: Option<&Value>, name: &str) -> Option<String> {
    body.and_then(|b| b.get(name))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Create a processor order for the requested amount
pub async fn create_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PaymentOrder>, ApiError<ErrorResponse>> {
    // Major currency units; validated by the payment service
    let amount = parse_body("create_order", &body).and_then(|b| b.get("amount").cloned());

    let order = state
        .payments
        .create_order(amount.as_ref())
        .await
        .map_err(|e| order_error(&e))?;

    Ok(Json(order))
}

/// Verify the signature on a checkout confirmation
pub async fn verify_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VerifyPaymentResponse>, ApiError<VerifyPaymentFailure>> {
    let body = parse_body("verify_payment", &body);
    let confirmation = PaymentConfirmation {
        razorpay_payment_id: string_field(body.as_ref(), "razorpay_payment_id"),
        razorpay_order_id: string_field(body.as_ref(), "razorpay_order_id"),
        razorpay_signature: string_field(body.as_ref(), "razorpay_signature"),
    };

    let verified = state
        .payments
        .verify_payment(&confirmation)
        .map_err(|e| verify_error(&e))?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully",
        payment_id: verified.payment_id,
        order_id: verified.order_id,
    }))
}
