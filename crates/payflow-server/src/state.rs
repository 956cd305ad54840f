//! Application State

use std::sync::Arc;

use payflow_payments::PaymentService;

/// Shared application state
///
/// Holds no per-request data: every handler call is independent.
#[derive(Clone)]
pub struct AppState {
    /// Order creation and signature verification, configured at startup
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(payments: PaymentService) -> Self {
        Self {
            payments: Arc::new(payments),
        }
    }
}
