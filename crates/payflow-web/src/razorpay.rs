//! Razorpay Checkout Bindings
//!
//! Browser implementations of [`ScriptLoader`] and [`CheckoutWidget`]. The
//! checkout script defines a global `Razorpay` constructor; both types reach
//! it through `Reflect` rather than static bindings so that a missing script
//! is an ordinary error.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Array, Function, JSON, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;

use crate::checkout::{
    CheckoutOptions, CheckoutWidget, OnComplete, PaymentConfirmation, ScriptLoader, WidgetOutcome,
};
use crate::error::ClientError;

/// Hosted checkout script
pub const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

const GLOBAL_NAME: &str = "Razorpay";

/// Holds the newest value, dropping the one it replaces
#[derive(Debug)]
struct LatestOnly<T> {
    current: RefCell<Option<T>>,
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self {
            current: RefCell::new(None),
        }
    }
}

impl<T> LatestOnly<T> {
    /// Keep `value`, releasing the previous one
    fn retain(&self, value: T) {
        let previous = self.current.replace(Some(value));
        drop(previous);
    }
}

type CheckoutCallbacks = (Closure<dyn FnMut(JsValue)>, Closure<dyn FnMut()>);

thread_local! {
    // A checkout runs at a time, so the previous widget is closed when this is replaced
    static LIVE_CALLBACKS: LatestOnly<CheckoutCallbacks> = LatestOnly::default();
}

fn checkout_constructor() -> Option<Function> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(GLOBAL_NAME))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn widget_error(err: &JsValue) -> ClientError {
    ClientError::WidgetFailed(format!("{err:?}"))
}

/// Injects the checkout script on first use
#[derive(Debug, Default, Clone, Copy)]
pub struct RazorpayScript;

#[async_trait(?Send)]
impl ScriptLoader for RazorpayScript {
    async fn ensure_loaded(&self) -> Result<(), ClientError> {
        if checkout_constructor().is_some() {
            return Ok(());
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(ClientError::ScriptLoadFailed)?;

        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(|_| ClientError::ScriptLoadFailed)?
            .dyn_into()
            .map_err(|_| ClientError::ScriptLoadFailed)?;
        script.set_src(CHECKOUT_SCRIPT_URL);

        let loaded = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });

        document
            .body()
            .ok_or(ClientError::ScriptLoadFailed)?
            .append_child(&script)
            .map_err(|_| ClientError::ScriptLoadFailed)?;

        JsFuture::from(loaded)
            .await
            .map_err(|_| ClientError::ScriptLoadFailed)?;

        checkout_constructor()
            .map(|_| ())
            .ok_or(ClientError::ScriptLoadFailed)
    }
}

fn parse_confirmation(response: &JsValue) -> Option<PaymentConfirmation> {
    let json = String::from(JSON::stringify(response).ok()?);
    serde_json::from_str(&json).ok()
}

/// `new Razorpay(options).open()`
#[derive(Debug, Default, Clone, Copy)]
pub struct RazorpayWidget;

impl CheckoutWidget for RazorpayWidget {
    fn open(&self, options: CheckoutOptions, on_complete: OnComplete) -> Result<(), ClientError> {
        let constructor = checkout_constructor()
            .ok_or_else(|| ClientError::WidgetFailed("checkout script not loaded".into()))?;

        let json = serde_json::to_string(&options)
            .map_err(|e| ClientError::WidgetFailed(e.to_string()))?;
        let js_options = JSON::parse(&json).map_err(|e| widget_error(&e))?;

        // Whichever callback fires first takes the completion
        let slot: Rc<RefCell<Option<OnComplete>>> = Rc::new(RefCell::new(Some(on_complete)));

        let handler: Closure<dyn FnMut(JsValue)> = {
            let slot = Rc::clone(&slot);
            Closure::once(move |response: JsValue| {
                let complete = slot.borrow_mut().take();
                // An unreadable response drops the callback, which the flow reports
                if let (Some(complete), Some(confirmation)) =
                    (complete, parse_confirmation(&response))
                {
                    complete(WidgetOutcome::Completed(confirmation));
                }
            })
        };

        let ondismiss: Closure<dyn FnMut()> = Closure::once(move || {
            let complete = slot.borrow_mut().take();
            if let Some(complete) = complete {
                complete(WidgetOutcome::Dismissed);
            }
        });

        let modal = Object::new();
        Reflect::set(&modal, &JsValue::from_str("ondismiss"), ondismiss.as_ref())
            .map_err(|e| widget_error(&e))?;
        Reflect::set(&js_options, &JsValue::from_str("modal"), &modal)
            .map_err(|e| widget_error(&e))?;
        Reflect::set(&js_options, &JsValue::from_str("handler"), handler.as_ref())
            .map_err(|e| widget_error(&e))?;

        let instance = Reflect::construct(&constructor, &Array::of1(&js_options))
            .map_err(|e| widget_error(&e))?;
        let open: Function = Reflect::get(&instance, &JsValue::from_str("open"))
            .map_err(|e| widget_error(&e))?
            .dyn_into()
            .map_err(|e| widget_error(&e))?;
        open.call0(&instance).map_err(|e| widget_error(&e))?;

        // Only one of the two ever runs; both stay alive until the next checkout opens
        LIVE_CALLBACKS.with(|live| live.retain((handler, ondismiss)));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Tracked<'a>(&'a Cell<usize>);

    impl Drop for Tracked<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_latest_only_releases_previous() {
        let dropped = Cell::new(0);
        let holder = LatestOnly::default();

        holder.retain(Tracked(&dropped));
        assert_eq!(dropped.get(), 0);

        holder.retain(Tracked(&dropped));
        assert_eq!(dropped.get(), 1);

        holder.retain(Tracked(&dropped));
        assert_eq!(dropped.get(), 2);

        drop(holder);
        assert_eq!(dropped.get(), 3);
    }
}
