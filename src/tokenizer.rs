//! yew_stripe_token/src/tokenizer.rs
//!
//! [`Tokenizer`] backed by Stripe.js v2 `Stripe.createToken`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_wasm_bindgen::to_value;
use wasm_bindgen::{prelude::Closure, JsValue};
use web_sys::js_sys::Reflect;

use crate::bindings::{create_token, set_publishable_key};
use crate::error::{js_message, PageError};
use crate::interceptor::Tokenizer;
use crate::token::{CardDetails, TokenError, TokenResult};

/// Whether `window.Stripe` is defined.
pub fn stripe_loaded() -> bool {
    web_sys::window()
        .and_then(|win| Reflect::has(&win, &JsValue::from_str("Stripe")).ok())
        .unwrap_or(false)
}

/// Handle to the global `Stripe` object.
#[derive(Debug, Clone, Copy)]
pub struct StripeTokenizer {
    _private: (),
}

impl StripeTokenizer {
    /// Requires Stripe.js to be loaded. An empty key leaves whatever key the
    /// page already set.
    pub fn new(publishable_key: &str) -> Result<Self, PageError> {
        if !stripe_loaded() {
            return Err(PageError::StripeUnavailable);
        }
        if !publishable_key.is_empty() {
            set_publishable_key(publishable_key)?;
        }
        Ok(StripeTokenizer { _private: () })
    }
}

impl Tokenizer for StripeTokenizer {
    fn create_token(&self, card: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>) {
        let card_js = match to_value(&card) {
            Ok(v) => v,
            Err(e) => {
                on_response(TokenResult::Error(TokenError::new(e.to_string())));
                return;
            }
        };

        // Shared so a synchronous throw can still reach the caller exactly once.
        let on_response = Rc::new(Cell::new(Some(on_response)));
        let from_stripe = on_response.clone();
        let handler = Closure::once_into_js(move |status: JsValue, response: JsValue| {
            let status = status.as_f64().map(|s| s as u16).unwrap_or(0);
            if let Some(cb) = from_stripe.take() {
                cb(TokenResult::from_js(status, &response));
            }
        });

        if let Err(e) = create_token(&card_js, &handler) {
            let message = js_message(&e);
            log::error!("Stripe.createToken threw: {}", message);
            if let Some(cb) = on_response.take() {
                cb(TokenResult::Error(TokenError::new(message)));
            }
        }
    }
}

/// Shown when a submit arrives before Stripe.js is usable.
pub const SERVICE_UNAVAILABLE: &str =
    "The payment service is unavailable right now. Please try again in a moment.";

enum Readiness<T> {
    Pending,
    Ready(Rc<T>),
    Failed(String),
}

/// A [`Tokenizer`] that can be bound to the form before its backend exists.
///
/// While pending, each request first retries `connect`; if that still
/// fails the request is answered with [`SERVICE_UNAVAILABLE`] so the form
/// becomes submittable again.
pub struct DeferredTokenizer<T> {
    state: RefCell<Readiness<T>>,
    connect: Box<dyn Fn() -> Result<T, PageError>>,
}

impl<T: Tokenizer> DeferredTokenizer<T> {
    pub fn new(connect: impl Fn() -> Result<T, PageError> + 'static) -> Rc<Self> {
        Rc::new(DeferredTokenizer {
            state: RefCell::new(Readiness::Pending),
            connect: Box::new(connect),
        })
    }

    pub fn ready(&self, tokenizer: T) {
        *self.state.borrow_mut() = Readiness::Ready(Rc::new(tokenizer));
    }

    /// Give up for good; later requests fail without retrying `connect`.
    pub fn fail(&self, reason: impl Into<String>) {
        *self.state.borrow_mut() = Readiness::Failed(reason.into());
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), Readiness::Ready(_))
    }

    fn current(&self) -> Result<Rc<T>, String> {
        let mut state = self.state.borrow_mut();
        match &*state {
            Readiness::Ready(t) => Ok(t.clone()),
            Readiness::Failed(reason) => Err(reason.clone()),
            Readiness::Pending => match (self.connect)() {
                Ok(t) => {
                    let t = Rc::new(t);
                    *state = Readiness::Ready(t.clone());
                    Ok(t)
                }
                Err(e) => Err(e.to_string()),
            },
        }
    }
}

impl<T: Tokenizer> Tokenizer for DeferredTokenizer<T> {
    fn create_token(&self, card: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>) {
        match self.current() {
            Ok(tokenizer) => tokenizer.create_token(card, on_response),
            Err(reason) => {
                log::warn!("token requested before the payment service was ready: {}", reason);
                on_response(TokenResult::Error(TokenError::new(SERVICE_UNAVAILABLE)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[derive(Default)]
    struct CountingTokenizer {
        calls: Cell<usize>,
    }

    impl Tokenizer for CountingTokenizer {
        fn create_token(&self, _: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>) {
            self.calls.set(self.calls.get() + 1);
            on_response(TokenResult::Success(Token {
                id: "tok_abc".into(),
                card: None,
            }));
        }
    }

    fn request(tokenizer: &impl Tokenizer) -> TokenResult {
        let answer = Rc::new(RefCell::new(None));
        let slot = answer.clone();
        tokenizer.create_token(
            CardDetails::default(),
            Box::new(move |result| *slot.borrow_mut() = Some(result)),
        );
        let result = answer.borrow_mut().take();
        result.expect("answered synchronously")
    }

    #[test]
    fn pending_without_backend_answers_unavailable() {
        let deferred =
            DeferredTokenizer::<CountingTokenizer>::new(|| Err(PageError::StripeUnavailable));
        assert_eq!(
            request(&deferred),
            TokenResult::Error(TokenError::new(SERVICE_UNAVAILABLE))
        );
        assert!(!deferred.is_ready());
    }

    #[test]
    fn pending_connects_lazily_once_backend_appears() {
        let available = Rc::new(Cell::new(false));
        let attempts = Rc::new(Cell::new(0));
        let deferred = {
            let available = available.clone();
            let attempts = attempts.clone();
            DeferredTokenizer::new(move || {
                attempts.set(attempts.get() + 1);
                if available.get() {
                    Ok(CountingTokenizer::default())
                } else {
                    Err(PageError::StripeUnavailable)
                }
            })
        };

        assert!(matches!(request(&deferred), TokenResult::Error(_)));
        available.set(true);
        assert!(matches!(request(&deferred), TokenResult::Success(_)));
        assert!(matches!(request(&deferred), TokenResult::Success(_)));
        assert!(deferred.is_ready());
        assert_eq!(attempts.get(), 2, "connected backend is reused");
    }

    #[test]
    fn ready_backend_handles_requests() {
        let deferred =
            DeferredTokenizer::<CountingTokenizer>::new(|| Err(PageError::StripeUnavailable));
        deferred.ready(CountingTokenizer::default());
        assert!(matches!(request(&deferred), TokenResult::Success(_)));
    }

    #[test]
    fn failed_backend_is_not_retried() {
        let deferred = DeferredTokenizer::new(|| Ok(CountingTokenizer::default()));
        deferred.fail("script blocked");
        assert_eq!(
            request(&deferred),
            TokenResult::Error(TokenError::new(SERVICE_UNAVAILABLE))
        );
        assert!(!deferred.is_ready());
    }
}
