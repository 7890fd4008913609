//! yew_stripe_token/src/token.rs
//!
//! Request and response types for `Stripe.createToken`.
//!
//! The raw response is either a token object or `{ error: { message } }`.
//! It is deserialized into [`TokenResponse`] and then collapsed into the
//! two-variant [`TokenResult`], which is all the interceptor looks at.

use std::fmt;

use gloo_utils::format::JsValueSerdeExt;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Card fields sent to the tokenization service, verbatim from the form.
#[derive(Serialize, Clone, PartialEq, Eq, Default)]
pub struct CardDetails {
    pub number: String,
    pub cvc: String,
    pub exp_month: String,
    pub exp_year: String,
}

// Card data must never end up in the console.
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits: Vec<char> = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        let last4: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        f.debug_struct("CardDetails")
            .field("number", &format_args!("****{}", last4))
            .field("cvc", &"***")
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .finish()
    }
}

/// Representation of a Stripe.js error object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenError {
    /// Human-readable message, shown to the customer as-is.
    pub message: String,
    /// Stripe’s error type, e.g. `"card_error"`.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Optional Stripe error code, e.g. `"incorrect_number"`.
    #[serde(default)]
    pub code: Option<String>,
    /// The offending request field, e.g. `"exp_year"`.
    #[serde(default)]
    pub param: Option<String>,
}

impl TokenError {
    pub fn new(message: impl Into<String>) -> Self {
        TokenError {
            message: message.into(),
            error_type: None,
            code: None,
            param: None,
        }
    }
}

/// Non-sensitive card summary echoed back with a token.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
pub struct CardSummary {
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Raw shape of the `createToken` response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<TokenError>,
    #[serde(default)]
    pub card: Option<CardSummary>,
}

/// A single-use token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Opaque id, e.g. `tok_1Abc...`.
    pub id: String,
    pub card: Option<CardSummary>,
}

/// Strongly-typed outcome of a tokenization request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenResult {
    Success(Token),
    Error(TokenError),
}

impl TokenResponse {
    /// An `error` wins over an `id`; a response with neither is an error.
    pub fn into_result(self) -> TokenResult {
        if let Some(err) = self.error {
            return TokenResult::Error(err);
        }
        match self.id {
            Some(id) if !id.is_empty() => TokenResult::Success(Token {
                id,
                card: self.card,
            }),
            _ => TokenResult::Error(TokenError::new(
                "The payment service returned neither a token nor an error.",
            )),
        }
    }
}

impl TokenResult {
    /// Convert the `(status, response)` pair handed to the Stripe.js callback.
    pub fn from_js(status: u16, response: &JsValue) -> Self {
        match response.into_serde::<TokenResponse>() {
            Ok(parsed) => {
                let result = parsed.into_result();
                if let TokenResult::Error(err) = &result {
                    log::debug!(
                        "createToken rejected (status {}): type={:?} code={:?}",
                        status,
                        err.error_type,
                        err.code
                    );
                }
                result
            }
            Err(e) => {
                log::error!("unreadable createToken response (status {}): {}", status, e);
                TokenResult::Error(TokenError::new(format!(
                    "Unexpected response from the payment service: {}",
                    e
                )))
            }
        }
    }
}
