//! yew_stripe_token/src/page.rs
//!
//! Page start-up: widgets first, then the payment form.
//!
//! From JavaScript, after the wasm module is loaded:
//! ```js
//! import init, { start } from "./pkg/yew_stripe_token.js";
//! await init();
//! start({ publishable_key: "pk_test_..." });
//! ```

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::config::{FormSelectors, PageConfig};
use crate::dom::{attach_interceptor, DomPaymentForm};
use crate::error::PageError;
use crate::interceptor::{SubmissionInterceptor, Tokenizer};
use crate::interop::load_stripejs;
use crate::logging;
use crate::tokenizer::{DeferredTokenizer, StripeTokenizer};
use crate::widgets::{init_widgets, JQueryWidgets, WidgetLibrary};

/// Interceptor bound to the page's payment form.
pub type PageInterceptor<T> = Rc<SubmissionInterceptor<DomPaymentForm, T>>;

/// Stripe tokenizer that may still be waiting for Stripe.js.
pub type DeferredStripe = Rc<DeferredTokenizer<StripeTokenizer>>;

/// Id of the optional `<script type="application/json">` configuration block.
pub const CONFIG_ELEMENT_ID: &str = "payment-page-config";

/// Bind the interceptor to the payment form for the rest of the page's life.
pub fn attach_payment_form<T>(
    document: &Document,
    selectors: &FormSelectors,
    tokenizer: T,
) -> Result<PageInterceptor<T>, PageError>
where
    T: Tokenizer + 'static,
{
    let form = DomPaymentForm::locate(document, selectors)?;
    intercept(form, tokenizer)
}

fn intercept<T>(form: DomPaymentForm, tokenizer: T) -> Result<PageInterceptor<T>, PageError>
where
    T: Tokenizer + 'static,
{
    let interceptor = SubmissionInterceptor::new(form, tokenizer);
    attach_interceptor(interceptor.clone())?.forget();
    log::debug!("payment form intercepted");
    Ok(interceptor)
}

/// Bind the form now, with a Stripe tokenizer that connects once Stripe.js
/// is on the page. Submits before then are cancelled and answered with
/// `SERVICE_UNAVAILABLE`.
pub fn attach_deferred_stripe(
    document: &Document,
    selectors: &FormSelectors,
    publishable_key: &str,
) -> Result<(PageInterceptor<DeferredStripe>, DeferredStripe), PageError> {
    let key = publishable_key.to_string();
    let tokenizer = DeferredTokenizer::new(move || StripeTokenizer::new(&key));
    let interceptor = attach_payment_form(document, selectors, tokenizer.clone())?;
    Ok((interceptor, tokenizer))
}

/// Initialize everything, synchronously, with a ready tokenizer.
///
/// Widget failures do not stop the form from being wired.
pub fn init<W, T>(
    document: &Document,
    config: &PageConfig,
    widgets: &W,
    tokenizer: T,
) -> Result<PageInterceptor<T>, PageError>
where
    W: WidgetLibrary + ?Sized,
    T: Tokenizer + 'static,
{
    if let Err(e) = init_widgets(widgets, config) {
        log::debug!("continuing without widgets: {}", e);
    }
    attach_payment_form(document, &config.form, tokenizer)
}

async fn connect_when_stripe_ready(document: Document, tokenizer: DeferredStripe, publishable_key: String) {
    let connected = match load_stripejs(&document).await {
        Ok(()) => StripeTokenizer::new(&publishable_key),
        Err(e) => Err(e),
    };
    match connected {
        Ok(stripe) => {
            tokenizer.ready(stripe);
            log::debug!("Stripe.js ready");
        }
        Err(e) => {
            log::error!("payment service unavailable: {}", e);
            tokenizer.fail(e.to_string());
        }
    }
}

/// Resolve the configuration: the argument wins, then the page's JSON block.
fn resolve_config(document: &Document, config: &JsValue) -> Result<PageConfig, PageError> {
    if !config.is_undefined() && !config.is_null() {
        return PageConfig::from_js(config);
    }
    Ok(PageConfig::from_document(document, CONFIG_ELEMENT_ID)?.unwrap_or_default())
}

/// Exported entry point; call once when the page is ready.
#[wasm_bindgen]
pub fn start(config: JsValue) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or(PageError::NoWindow)
        .and_then(|w| w.document().ok_or(PageError::NoDocument))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config = resolve_config(&document, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    logging::init(config.level_filter());

    if let Err(e) = init_widgets(&JQueryWidgets, &config) {
        log::debug!("continuing without widgets: {}", e);
    }

    let tokenizer = match attach_deferred_stripe(&document, &config.form, &config.publishable_key) {
        Ok((_, tokenizer)) => tokenizer,
        Err(PageError::MissingElement(selector)) => {
            log::info!("no payment form (`{}`) on this page", selector);
            return Ok(());
        }
        Err(e) => return Err(JsValue::from_str(&e.to_string())),
    };

    if !tokenizer.is_ready() {
        spawn_local(connect_when_stripe_ready(document, tokenizer, config.publishable_key));
    }
    Ok(())
}
