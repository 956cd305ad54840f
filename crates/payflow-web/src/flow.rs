//! Payment Flow
//!
//! ```text
//! Idle ──submit──▶ Submitting ──order created──▶ AwaitingUserAction
//!  ▲                   │                            │        │
//!  │                 error                      completed  dismissed
//!  │                   ▼                            ▼        │
//!  └──────────── Idle(Error) ◀── rejected ── verification    │
//!  └──────────── Idle(Success) ◀── verified ─────┘           │
//!  └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Dismissing the widget returns to a plain `Idle` without a message.

use futures::channel::oneshot;

use crate::amount::parse_amount;
use crate::checkout::{
    CheckoutOptions, CheckoutWidget, CreatedOrder, PaymentApi, PaymentConfirmation, ScriptLoader,
    WidgetOutcome,
};
use crate::error::ClientError;

const SUCCESS_MESSAGE: &str = "Payment successful! Thank you.";
const REJECTED_MESSAGE: &str = "Payment verification failed";

/// How the last payment attempt ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Error(String),
}

/// Client-side payment state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentState {
    /// Ready for input, optionally showing how the last attempt ended
    Idle(Option<Outcome>),

    /// Loading the checkout script and creating the order
    Submitting { amount: u64 },

    /// Checkout widget is open for this order
    AwaitingUserAction { order_id: String, amount: u64 },
}

impl Default for PaymentState {
    fn default() -> Self {
        Self::Idle(None)
    }
}

impl PaymentState {
    /// A payment is in progress
    pub const fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle(_))
    }

    /// Last outcome, if idle after an attempt
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Idle(outcome) => outcome.clone(),
            _ => None,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Idle(Some(Outcome::Success(_))))
    }
}

/// The payment state machine
#[derive(Debug, Default)]
pub struct PaymentFlow {
    state: PaymentState,
}

impl PaymentFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &PaymentState {
        &self.state
    }

    pub fn into_state(self) -> PaymentState {
        self.state
    }

    /// `Idle → Submitting` with a validated amount
    pub fn submit(&mut self, input: &str) -> Result<u64, ClientError> {
        if self.state.is_busy() {
            return Err(ClientError::Busy);
        }
        let amount = parse_amount(input).ok_or(ClientError::InvalidAmount)?;
        self.state = PaymentState::Submitting { amount };
        Ok(amount)
    }

    /// `Submitting → AwaitingUserAction` once the server issued an order id
    pub fn order_created(&mut self, order: &CreatedOrder) -> Result<u64, ClientError> {
        let PaymentState::Submitting { amount } = self.state else {
            return Err(ClientError::WidgetFailed("order created while not submitting".into()));
        };
        self.state = PaymentState::AwaitingUserAction {
            order_id: order.order_id.clone(),
            amount,
        };
        Ok(amount)
    }

    /// Check a confirmation belongs to the order the widget was opened with
    pub fn confirm(&self, confirmation: &PaymentConfirmation) -> Result<(), ClientError> {
        match &self.state {
            PaymentState::AwaitingUserAction { order_id, .. }
                if *order_id == confirmation.razorpay_order_id =>
            {
                Ok(())
            }
            PaymentState::AwaitingUserAction { order_id, .. } => Err(ClientError::OrderMismatch {
                expected: order_id.clone(),
                received: confirmation.razorpay_order_id.clone(),
            }),
            _ => Err(ClientError::OrderMismatch {
                expected: String::new(),
                received: confirmation.razorpay_order_id.clone(),
            }),
        }
    }

    /// `AwaitingUserAction → Idle(Success | Error)`
    pub fn verification_finished(&mut self, verified: bool) {
        let outcome = if verified {
            Outcome::Success(SUCCESS_MESSAGE.into())
        } else {
            Outcome::Error(REJECTED_MESSAGE.into())
        };
        self.state = PaymentState::Idle(Some(outcome));
    }

    /// `AwaitingUserAction → Idle`; closing the widget is not a failure
    pub fn dismissed(&mut self) {
        self.state = PaymentState::Idle(None);
    }

    /// Any state `→ Idle(Error)`
    pub fn fail(&mut self, err: &ClientError) {
        self.state = PaymentState::Idle(Some(Outcome::Error(err.user_message())));
    }
}

/// Run one payment attempt end to end, reporting every state change to
/// `observe`. Returns the final (idle) state.
pub async fn run_payment<A, S, W>(
    api: &A,
    script: &S,
    widget: &W,
    input: &str,
    mut observe: impl FnMut(&PaymentState),
) -> PaymentState
where
    A: PaymentApi + ?Sized,
    S: ScriptLoader + ?Sized,
    W: CheckoutWidget + ?Sized,
{
    let mut flow = PaymentFlow::new();

    if let Err(err) = drive(&mut flow, api, script, widget, input, &mut observe).await {
        flow.fail(&err);
        observe(flow.state());
    }

    flow.into_state()
}

async fn drive<A, S, W>(
    flow: &mut PaymentFlow,
    api: &A,
    script: &S,
    widget: &W,
    input: &str,
    observe: &mut impl FnMut(&PaymentState),
) -> Result<(), ClientError>
where
    A: PaymentApi + ?Sized,
    S: ScriptLoader + ?Sized,
    W: CheckoutWidget + ?Sized,
{
    let amount = flow.submit(input)?;
    observe(flow.state());

    script.ensure_loaded().await?;

    let order = api.create_order(amount).await?;
    flow.order_created(&order)?;
    observe(flow.state());

    let (sender, receiver) = oneshot::channel();
    widget.open(
        CheckoutOptions::for_order(&order, amount),
        Box::new(move |outcome| {
            // Receiver is gone only if the flow was abandoned
            let _ = sender.send(outcome);
        }),
    )?;

    // A dropped callback means the widget closed without a usable result
    let outcome = receiver
        .await
        .map_err(|_| ClientError::WidgetFailed("checkout closed without a result".into()))?;

    match outcome {
        WidgetOutcome::Dismissed => flow.dismissed(),
        WidgetOutcome::Completed(confirmation) => {
            flow.confirm(&confirmation)?;
            let verified = api.verify_payment(&confirmation).await?;
            flow.verification_finished(verified);
        }
    }
    observe(flow.state());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    struct FakeApi {
        order_result: Result<CreatedOrder, ClientError>,
        verify_result: Result<bool, ClientError>,
        created: RefCell<Vec<u64>>,
        verified: RefCell<Vec<PaymentConfirmation>>,
    }

    impl FakeApi {
        fn ok() -> Self {
            Self {
                order_result: Ok(CreatedOrder {
                    order_id: "order_1".into(),
                    amount: 50_000,
                    currency: "INR".into(),
                    key_id: "rzp_test".into(),
                }),
                verify_result: Ok(true),
                created: RefCell::default(),
                verified: RefCell::default(),
            }
        }
    }

    #[async_trait(?Send)]
    impl PaymentApi for FakeApi {
        async fn create_order(&self, amount: u64) -> Result<CreatedOrder, ClientError> {
            self.created.borrow_mut().push(amount);
            self.order_result.clone()
        }

        async fn verify_payment(
            &self,
            confirmation: &PaymentConfirmation,
        ) -> Result<bool, ClientError> {
            self.verified.borrow_mut().push(confirmation.clone());
            self.verify_result.clone()
        }
    }

    struct FakeScript {
        loads: Cell<usize>,
        fail: bool,
    }

    impl FakeScript {
        const fn ok() -> Self {
            Self {
                loads: Cell::new(0),
                fail: false,
            }
        }
    }

    #[async_trait(?Send)]
    impl ScriptLoader for FakeScript {
        async fn ensure_loaded(&self) -> Result<(), ClientError> {
            self.loads.set(self.loads.get() + 1);
            if self.fail {
                Err(ClientError::ScriptLoadFailed)
            } else {
                Ok(())
            }
        }
    }

    /// Completes synchronously with a scripted outcome
    enum FakeWidget {
        Pay { payment_id: &'static str, signature: &'static str },
        PayForOrder(&'static str),
        Dismiss,
        Vanish,
    }

    thread_local! {
        static OPENED: RefCell<Vec<CheckoutOptions>> = const { RefCell::new(Vec::new()) };
    }

    impl CheckoutWidget for FakeWidget {
        fn open(
            &self,
            options: CheckoutOptions,
            on_complete: crate::checkout::OnComplete,
        ) -> Result<(), ClientError> {
            let order_id = options.order_id.clone();
            OPENED.with(|opened| opened.borrow_mut().push(options));
            match self {
                Self::Pay { payment_id, signature } => {
                    on_complete(WidgetOutcome::Completed(PaymentConfirmation {
                        razorpay_payment_id: (*payment_id).into(),
                        razorpay_order_id: order_id,
                        razorpay_signature: (*signature).into(),
                    }));
                }
                Self::PayForOrder(other) => {
                    on_complete(WidgetOutcome::Completed(PaymentConfirmation {
                        razorpay_payment_id: "pay_1".into(),
                        razorpay_order_id: (*other).into(),
                        razorpay_signature: "sig".into(),
                    }));
                }
                Self::Dismiss => on_complete(WidgetOutcome::Dismissed),
                Self::Vanish => drop(on_complete),
            }
            Ok(())
        }
    }

    const PAY: FakeWidget = FakeWidget::Pay {
        payment_id: "pay_1",
        signature: "sig",
    };

    fn run(api: &FakeApi, script: &FakeScript, widget: &FakeWidget, input: &str) -> Vec<PaymentState> {
        let mut seen = Vec::new();
        let final_state = block_on(run_payment(api, script, widget, input, |s| seen.push(s.clone())));
        assert_eq!(seen.last(), Some(&final_state));
        seen
    }

    #[test]
    fn test_successful_payment() {
        let api = FakeApi::ok();
        let script = FakeScript::ok();
        let seen = run(&api, &script, &PAY, "500");

        assert_eq!(
            seen,
            vec![
                PaymentState::Submitting { amount: 500 },
                PaymentState::AwaitingUserAction {
                    order_id: "order_1".into(),
                    amount: 500
                },
                PaymentState::Idle(Some(Outcome::Success(SUCCESS_MESSAGE.into()))),
            ]
        );
        assert!(seen[2].is_success());
        assert_eq!(*api.created.borrow(), vec![500]);
        assert_eq!(api.verified.borrow()[0].razorpay_order_id, "order_1");
        assert_eq!(script.loads.get(), 1);
    }

    #[test]
    fn test_widget_receives_order_options() {
        let api = FakeApi::ok();
        run(&api, &FakeScript::ok(), &PAY, "500");

        let options = OPENED.with(|opened| opened.borrow().last().cloned()).unwrap();
        assert_eq!(options.key, "rzp_test");
        assert_eq!(options.order_id, "order_1");
        assert_eq!(options.amount, 50_000);
        assert_eq!(options.description, "Payment of ₹500");
    }

    #[test]
    fn test_invalid_amount_makes_no_calls() {
        for input in ["", "0", "abc"] {
            let api = FakeApi::ok();
            let script = FakeScript::ok();
            let seen = run(&api, &script, &PAY, input);

            assert_eq!(
                seen,
                vec![PaymentState::Idle(Some(Outcome::Error(
                    "Please enter a valid amount".into()
                )))]
            );
            assert_eq!(script.loads.get(), 0);
            assert!(api.created.borrow().is_empty());
        }
    }

    #[test]
    fn test_script_load_failure() {
        let api = FakeApi::ok();
        let script = FakeScript {
            loads: Cell::new(0),
            fail: true,
        };
        let seen = run(&api, &script, &PAY, "100");

        assert_eq!(
            seen.last().unwrap().outcome(),
            Some(Outcome::Error("Failed to load Razorpay SDK".into()))
        );
        assert!(api.created.borrow().is_empty());
    }

    #[test]
    fn test_order_failure_surfaces_server_message() {
        let api = FakeApi {
            order_result: Err(ClientError::OrderCreationFailed("Invalid amount".into())),
            ..FakeApi::ok()
        };
        let seen = run(&api, &FakeScript::ok(), &PAY, "100");

        assert_eq!(
            seen.last().unwrap().outcome(),
            Some(Outcome::Error("Invalid amount".into()))
        );
        assert!(api.verified.borrow().is_empty());
    }

    #[test]
    fn test_dismissal_is_not_an_error() {
        let api = FakeApi::ok();
        let seen = run(&api, &FakeScript::ok(), &FakeWidget::Dismiss, "100");

        assert_eq!(seen.last(), Some(&PaymentState::Idle(None)));
        assert!(api.verified.borrow().is_empty());
    }

    #[test]
    fn test_rejected_signature() {
        let api = FakeApi {
            verify_result: Ok(false),
            ..FakeApi::ok()
        };
        let seen = run(&api, &FakeScript::ok(), &PAY, "100");

        assert_eq!(
            seen.last().unwrap().outcome(),
            Some(Outcome::Error(REJECTED_MESSAGE.into()))
        );
    }

    #[test]
    fn test_verification_transport_failure() {
        let api = FakeApi {
            verify_result: Err(ClientError::VerificationFailed),
            ..FakeApi::ok()
        };
        let seen = run(&api, &FakeScript::ok(), &PAY, "100");

        assert_eq!(
            seen.last().unwrap().outcome(),
            Some(Outcome::Error("Error verifying payment".into()))
        );
    }

    #[test]
    fn test_confirmation_for_other_order_is_not_verified() {
        let api = FakeApi::ok();
        let seen = run(&api, &FakeScript::ok(), &FakeWidget::PayForOrder("order_stale"), "100");

        assert!(matches!(
            seen.last().unwrap().outcome(),
            Some(Outcome::Error(_))
        ));
        assert!(api.verified.borrow().is_empty());
    }

    #[test]
    fn test_widget_dropping_callback() {
        let api = FakeApi::ok();
        let seen = run(&api, &FakeScript::ok(), &FakeWidget::Vanish, "100");

        assert_eq!(
            seen.last().unwrap().outcome(),
            Some(Outcome::Error("Something went wrong".into()))
        );
        assert!(!seen.last().unwrap().is_busy());
    }

    #[test]
    fn test_state_machine_guards() {
        let mut flow = PaymentFlow::new();
        let order = FakeApi::ok().order_result.unwrap();

        // Order before submit
        assert!(flow.order_created(&order).is_err());

        assert_eq!(flow.submit("250").unwrap(), 250);
        assert_eq!(flow.submit("250"), Err(ClientError::Busy));

        // Confirmation before the widget opened
        let confirmation = PaymentConfirmation {
            razorpay_payment_id: "pay_1".into(),
            razorpay_order_id: "order_1".into(),
            razorpay_signature: "sig".into(),
        };
        assert!(flow.confirm(&confirmation).is_err());

        flow.order_created(&order).unwrap();
        assert!(flow.confirm(&confirmation).is_ok());

        flow.dismissed();
        assert_eq!(flow.state(), &PaymentState::Idle(None));
    }
}
