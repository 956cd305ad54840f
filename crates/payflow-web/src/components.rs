//! UI Components

use leptos::prelude::*;

use crate::amount::format_inr;
use crate::flow::Outcome;

/// Success or error banner for the last attempt
#[component]
pub fn StatusBanner(outcome: Outcome) -> impl IntoView {
    let (class, text) = match outcome {
        Outcome::Success(text) => ("status status-success", text),
        Outcome::Error(text) => ("status status-error", text),
    };

    view! { <div class=class>{text}</div> }
}

/// Quick-select amount button
#[component]
pub fn PresetButton(
    amount: u64,
    #[prop(into)] active: Signal<bool>,
    #[prop(into)] disabled: Signal<bool>,
    on_select: impl Fn(u64) + 'static,
) -> impl IntoView {
    view! {
        <button
            class=move || if active.get() { "preset-btn active" } else { "preset-btn" }
            disabled=move || disabled.get()
            on:click=move |_| on_select(amount)
        >
            {format!("₹{}", format_inr(amount))}
        </button>
    }
}
