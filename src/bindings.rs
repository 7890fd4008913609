//! yew_stripe_token/src/bindings.rs
//!
//! Low‐level wasm-bindgen bindings to the page's JavaScript collaborators:
//!
//! - Stripe.js v2 (`Stripe.setPublishableKey`, `Stripe.createToken`)
//! - jQuery with the Bootstrap `carousel` / `popover` plugins
//!
//! Higher-level wrappers live in `tokenizer.rs` and `widgets.rs`.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    //------------------------------------------------------------------------------
    // Stripe.js v2
    //------------------------------------------------------------------------------

    /// ```js
    ///   Stripe.setPublishableKey("pk_test_...");
    /// ```
    #[wasm_bindgen(catch, js_namespace = Stripe, js_name = setPublishableKey)]
    pub fn set_publishable_key(publishable_key: &str) -> Result<(), JsValue>;

    /// `Stripe.createToken(card, function (status, response) { ... })`
    ///
    /// The handler is invoked exactly once with the HTTP status and either
    /// a token object or `{ error: { message, ... } }`.
    #[wasm_bindgen(catch, js_namespace = Stripe, js_name = createToken)]
    pub fn create_token(card: &JsValue, handler: &JsValue) -> Result<(), JsValue>;

    //------------------------------------------------------------------------------
    // jQuery + Bootstrap plugins
    //------------------------------------------------------------------------------

    /// A jQuery selection.
    #[derive(Debug, Clone)]
    pub type JQuery;

    /// `jQuery(selector)` → `JQuery`
    #[wasm_bindgen(catch, js_name = jQuery)]
    pub fn jquery(selector: &str) -> Result<JQuery, JsValue>;

    /// Number of matched elements.
    #[wasm_bindgen(method, getter)]
    pub fn length(this: &JQuery) -> u32;

    /// `$(selector).carousel(options)`
    #[wasm_bindgen(method, catch)]
    pub fn carousel(this: &JQuery, options: JsValue) -> Result<JQuery, JsValue>;

    /// `$(selector).popover(options)`
    #[wasm_bindgen(method, catch)]
    pub fn popover(this: &JQuery, options: JsValue) -> Result<JQuery, JsValue>;
}
