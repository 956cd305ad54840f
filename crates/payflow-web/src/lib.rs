//! payflow Web Frontend
//!
//! Leptos-based WASM frontend: enter an amount, pay through Razorpay's
//! hosted checkout, and have the server verify the result.

mod amount;
mod api;
mod app;
mod checkout;
mod components;
mod error;
mod flow;
mod pages;
mod razorpay;

pub use app::App;
pub use checkout::{
    CheckoutOptions, CheckoutWidget, CreatedOrder, OnComplete, PaymentApi, PaymentConfirmation,
    ScriptLoader, WidgetOutcome,
};
pub use error::ClientError;
pub use flow::{Outcome, PaymentFlow, PaymentState, run_payment};

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
