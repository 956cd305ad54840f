//! Payment Page

use leptos::prelude::*;

use crate::amount::{PRESET_AMOUNTS, display_amount, sanitize_amount_input};
use crate::api::HttpPaymentApi;
use crate::components::{PresetButton, StatusBanner};
use crate::flow::{PaymentState, run_payment};
use crate::razorpay::{RazorpayScript, RazorpayWidget};

#[component]
pub fn PaymentPage() -> impl IntoView {
    let (amount, set_amount) = signal(String::new());
    let (selected_preset, set_selected_preset) = signal(None::<u64>);
    let (state, set_state) = signal(PaymentState::default());

    let busy = Signal::derive(move || state.with(PaymentState::is_busy));

    let pay = move |_| {
        if busy.get_untracked() {
            return;
        }

        let input = amount.get_untracked();
        leptos::task::spawn_local(async move {
            let api = HttpPaymentApi::from_window();
            let final_state = run_payment(&api, &RazorpayScript, &RazorpayWidget, &input, |s| {
                set_state.set(s.clone());
            })
            .await;

            if final_state.is_success() {
                set_amount.set(String::new());
                set_selected_preset.set(None);
            }
        });
    };

    let pay_label = move || {
        if busy.get() {
            "Processing...".to_string()
        } else if amount.with(String::is_empty) {
            "Pay Now".to_string()
        } else {
            format!("Pay ₹{}", display_amount(&amount.get()))
        }
    };

    view! {
        <div class="payment">
            <header class="hero">
                <h1>"Seamless Payments"</h1>
                <p class="tagline">
                    "Fast, secure, and hassle-free payments. Enter any amount and pay instantly."
                </p>
            </header>

            <section class="card">
                <div class="field">
                    <label>"Enter Amount"</label>
                    <span class="rupee-symbol">"₹"</span>
                    <input
                        type="text"
                        placeholder="0"
                        prop:value=move || display_amount(&amount.get())
                        disabled=move || busy.get()
                        on:input=move |ev| {
                            set_amount.set(sanitize_amount_input(&event_target_value(&ev)));
                            set_selected_preset.set(None);
                        }
                    />
                </div>

                <div class="field">
                    <label>"Quick Select"</label>
                    <div class="presets">
                        {PRESET_AMOUNTS
                            .into_iter()
                            .map(|preset| {
                                view! {
                                    <PresetButton
                                        amount=preset
                                        active=Signal::derive(move || {
                                            selected_preset.get() == Some(preset)
                                        })
                                        disabled=busy
                                        on_select=move |value: u64| {
                                            set_amount.set(value.to_string());
                                            set_selected_preset.set(Some(value));
                                        }
                                    />
                                }
                            })
                            .collect_view()}
                    </div>
                </div>

                {move || state.get().outcome().map(|outcome| view! { <StatusBanner outcome=outcome /> })}

                <button
                    class="pay-btn"
                    on:click=pay
                    disabled=move || busy.get() || amount.with(String::is_empty)
                >
                    {pay_label}
                </button>
            </section>

            <footer class="footer">
                <p>"Powered by " <span class="brand">"Razorpay"</span></p>
            </footer>
        </div>
    }
}
