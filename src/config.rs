//! yew_stripe_token/src/config.rs
//!
//! Page configuration. Every field has a default matching the stock page
//! template, so an empty object (or no configuration at all) works.
//!
//! ```js
//! start({ publishable_key: "pk_test_...", carousel: { interval: 4000 } });
//! ```

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::error::PageError;
use crate::widgets::{CarouselOptions, Placement, PopoverOptions};

/// Everything `start` needs to wire the page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct PageConfig {
    /// Stripe publishable key (`pk_...`). Empty means "already set by the page".
    pub publishable_key: String,
    pub form: FormSelectors,
    pub carousel: CarouselConfig,
    pub popover: PopoverConfig,
    /// `log` level filter, e.g. `"debug"`.
    pub log_level: Option<String>,
}

/// CSS selectors making up the payment form contract with the markup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct FormSelectors {
    pub form: String,
    pub submit_button: String,
    pub card_number: String,
    pub card_cvc: String,
    pub card_expiry_month: String,
    pub card_expiry_year: String,
    pub errors: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        FormSelectors {
            form: "#payment-form".into(),
            submit_button: ".submit-button".into(),
            card_number: ".card-number".into(),
            card_cvc: ".card-cvc".into(),
            card_expiry_month: ".card-expiry-month".into(),
            card_expiry_year: ".card-expiry-year".into(),
            errors: ".payment-errors".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CarouselConfig {
    pub selector: String,
    /// Auto-advance interval in milliseconds.
    pub interval: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            selector: "#app-show".into(),
            interval: CarouselOptions::default().interval,
        }
    }
}

impl CarouselConfig {
    pub fn options(&self) -> CarouselOptions {
        CarouselOptions {
            interval: self.interval,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PopoverConfig {
    pub selector: String,
    pub placement: Placement,
}

impl Default for PopoverConfig {
    fn default() -> Self {
        PopoverConfig {
            selector: ".team-list a[rel=\"popover\"]".into(),
            placement: Placement::Top,
        }
    }
}

impl PopoverConfig {
    pub fn options(&self) -> PopoverOptions {
        PopoverOptions {
            placement: self.placement,
        }
    }
}

impl PageConfig {
    /// From a JS object; `undefined` and `null` give the defaults.
    pub fn from_js(value: &JsValue) -> Result<Self, PageError> {
        if value.is_undefined() || value.is_null() {
            return Ok(PageConfig::default());
        }
        Ok(serde_wasm_bindgen::from_value(value.clone())?)
    }

    pub fn from_json(json: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// From a `<script type="application/json" id="...">` element, if present.
    pub fn from_document(document: &Document, element_id: &str) -> Result<Option<Self>, PageError> {
        let Some(el) = document.get_element_by_id(element_id) else {
            return Ok(None);
        };
        let text = el.text_content().unwrap_or_default();
        Self::from_json(&text).map(Some)
    }

    /// Parsed `log_level`, falling back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(log::LevelFilter::Info)
    }
}
