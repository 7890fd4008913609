//! yew_stripe_token/src/interop.rs
//!
//! Load Stripe.js v2 at runtime (no inline JS).
//!
//! # Overview
//! Both entry points share one `<script id="stripejs-sdk"
//! src="https://js.stripe.com/v2/">`, inserted into `<head>` on first use:
//!
//! - [`load_stripejs`]: `async`, resolves once `window.Stripe` exists.
//! - [`use_stripejs`]: Yew hook, `false` until the script's `load` event,
//!   then `true`.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_stripe_token::use_stripejs;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let stripe_ready = use_stripejs();
//!     html! {
//!         if stripe_ready {
//!             <p>{"Stripe.js loaded"}</p>
//!         } else {
//!             <p>{"Loading Stripe.js..."}</p>
//!         }
//!     }
//! }
//! ```

use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::Promise;
use web_sys::{Document, HtmlScriptElement};
use yew::functional::hook;
use yew::prelude::*;

use crate::error::{js_message, PageError};
use crate::tokenizer::stripe_loaded;

pub const STRIPE_JS_SRC: &str = "https://js.stripe.com/v2/";
pub const STRIPE_JS_ID: &str = "stripejs-sdk";

/// The Stripe.js `<script>`, inserted into `<head>` if not already there.
fn stripe_script(document: &Document) -> Result<HtmlScriptElement, PageError> {
    if let Some(existing) = document.get_element_by_id(STRIPE_JS_ID) {
        return existing
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| PageError::WrongElement {
                selector: format!("#{}", STRIPE_JS_ID),
                expected: "<script>",
            });
    }

    let script: HtmlScriptElement = document
        .create_element("script")?
        .dyn_into()
        .map_err(|_| PageError::Js("created element is not a <script>".into()))?;
    script.set_id(STRIPE_JS_ID);
    script.set_src(STRIPE_JS_SRC);
    script.set_defer(true);

    document
        .head()
        .ok_or_else(|| PageError::MissingElement("head".into()))?
        .append_child(&script)?;
    log::debug!("inserted {}", STRIPE_JS_SRC);
    Ok(script)
}

/// Make sure Stripe.js is loaded, inserting its script if needed.
pub async fn load_stripejs(document: &Document) -> Result<(), PageError> {
    if stripe_loaded() {
        return Ok(());
    }
    let script = stripe_script(document)?;

    let promise = Promise::new(&mut |resolve, reject| {
        let registered = script
            .add_event_listener_with_callback("load", &resolve)
            .and_then(|()| script.add_event_listener_with_callback("error", &reject));
        if let Err(e) = registered {
            log::error!("cannot watch Stripe.js script: {}", js_message(&e));
        }
        // The script may have finished before the listeners went on.
        if stripe_loaded() {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    JsFuture::from(promise)
        .await
        .map_err(|e| PageError::ScriptLoad {
            src: STRIPE_JS_SRC.into(),
            message: js_message(&e),
        })?;

    if stripe_loaded() {
        Ok(())
    } else {
        Err(PageError::StripeUnavailable)
    }
}

/// Custom hook: load Stripe.js v2 exactly once and track readiness.
///
/// # Returns
/// - `false` while the `<script>` is being fetched & parsed.
/// - `true` once `window.Stripe` exists.
#[hook]
pub fn use_stripejs() -> bool {
    let loaded = use_state(stripe_loaded);

    {
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            if !*loaded {
                let script = web_sys::window()
                    .and_then(|win| win.document())
                    .ok_or(PageError::NoDocument)
                    .and_then(|doc| stripe_script(&doc));
                match script {
                    Ok(script) => {
                        let onload = Closure::once_into_js(move || loaded.set(true));
                        if let Err(e) =
                            script.add_event_listener_with_callback("load", onload.unchecked_ref())
                        {
                            log::error!("cannot watch Stripe.js script: {}", js_message(&e));
                        }
                    }
                    Err(e) => log::error!("cannot load Stripe.js: {}", e),
                }
            }
            || ()
        });
    }

    *loaded
}
