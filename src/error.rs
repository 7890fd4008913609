//! yew_stripe_token/src/error.rs
//!
//! Page-level failures: missing DOM nodes, Stripe.js not present, bad
//! configuration, JavaScript exceptions. Tokenization rejections are not
//! here; they are ordinary data (`TokenError`) shown to the customer.

use wasm_bindgen::JsValue;
use web_sys::js_sys::Reflect;

/// Errors raised while wiring the page together.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No global `window` (not running in a browser).
    #[error("no global `window` available")]
    NoWindow,

    /// `window.document` is missing.
    #[error("window has no `document`")]
    NoDocument,

    /// A selector matched nothing.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// A selector matched an element of the wrong kind.
    #[error("element `{selector}` is not a {expected}")]
    WrongElement {
        selector: String,
        expected: &'static str,
    },

    /// `window.Stripe` is not defined.
    #[error("Stripe.js is not loaded")]
    StripeUnavailable,

    /// The Stripe.js `<script>` failed to load.
    #[error("failed to load script {src}: {message}")]
    ScriptLoad { src: String, message: String },

    /// The page configuration could not be parsed.
    #[error("invalid page configuration: {0}")]
    Config(String),

    /// Any other JavaScript exception.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(js_message(&value))
    }
}

impl From<serde_wasm_bindgen::Error> for PageError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        PageError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Config(err.to_string())
    }
}

/// Best-effort human-readable text for a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
