//! yew_stripe_token/src/interceptor.rs
//!
//! The submit → tokenize → resubmit flow, independent of the DOM.
//!
//! # Overview
//! [`SubmissionInterceptor::on_submit`] runs when the customer submits the
//! payment form. It disables the submit control, reads the four card
//! fields and hands them to a [`Tokenizer`]. The tokenizer answers once,
//! through a callback, and the answer lands in
//! [`SubmissionInterceptor::resolve`]:
//!
//! - `TokenResult::Error` → message rendered as text, control re-enabled.
//! - `TokenResult::Success` → hidden `stripeToken` field injected, form
//!   submitted natively (no `submit` event, so no second interception).
//!
//! Whoever routes the submit event here must cancel its default action
//! every time; see `dom::attach_interceptor`.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::PageError;
use crate::token::{CardDetails, TokenError, TokenResult};

/// Name of the hidden field carrying the token id.
pub const TOKEN_FIELD: &str = "stripeToken";

/// The payment form as seen by the interceptor.
pub trait PaymentForm {
    /// Current values of the four card inputs.
    fn card_details(&self) -> CardDetails;

    /// Enable or disable the submit control(s).
    fn set_submit_enabled(&self, enabled: bool);

    /// Replace the error display's content with `message`, as plain text.
    fn show_error(&self, message: &str);

    /// Leave exactly one hidden input `name` with value `value` in the form.
    fn inject_hidden_field(&self, name: &str, value: &str) -> Result<(), PageError>;

    /// Submit through the native path, bypassing submit listeners.
    fn submit_native(&self) -> Result<(), PageError>;
}

/// Exchanges card details for a token. `on_response` is called at most once.
pub trait Tokenizer {
    fn create_token(&self, card: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>);
}

impl<F: PaymentForm + ?Sized> PaymentForm for Rc<F> {
    fn card_details(&self) -> CardDetails {
        (**self).card_details()
    }
    fn set_submit_enabled(&self, enabled: bool) {
        (**self).set_submit_enabled(enabled)
    }
    fn show_error(&self, message: &str) {
        (**self).show_error(message)
    }
    fn inject_hidden_field(&self, name: &str, value: &str) -> Result<(), PageError> {
        (**self).inject_hidden_field(name, value)
    }
    fn submit_native(&self) -> Result<(), PageError> {
        (**self).submit_native()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Rc<T> {
    fn create_token(&self, card: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>) {
        (**self).create_token(card, on_response)
    }
}

/// What `on_submit` did with the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A tokenization request was issued.
    Tokenizing,
    /// A request is already in flight; nothing was issued.
    AlreadyPending,
}

/// How a tokenization response was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Token injected and the form submitted natively.
    Submitted,
    /// Error shown and the form made submittable again.
    Rejected,
}

/// Intercepts submission of one payment form for the page's lifetime.
pub struct SubmissionInterceptor<F, T> {
    form: F,
    tokenizer: T,
    in_flight: Cell<bool>,
}

impl<F, T> SubmissionInterceptor<F, T>
where
    F: PaymentForm + 'static,
    T: Tokenizer + 'static,
{
    pub fn new(form: F, tokenizer: T) -> Rc<Self> {
        Rc::new(SubmissionInterceptor {
            form,
            tokenizer,
            in_flight: Cell::new(false),
        })
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// `true` between a submit and the error response that follows it,
    /// and forever after a successful one.
    pub fn in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Handle a user-initiated submit.
    pub fn on_submit(self: &Rc<Self>) -> SubmitOutcome {
        if self.in_flight.replace(true) {
            log::debug!("payment form submitted while a token request is pending; ignored");
            return SubmitOutcome::AlreadyPending;
        }
        self.form.set_submit_enabled(false);

        let card = self.form.card_details();
        log::debug!("requesting token for {:?}", card);

        let this = Rc::clone(self);
        self.tokenizer.create_token(
            card,
            Box::new(move |result| {
                this.resolve(result);
            }),
        );
        SubmitOutcome::Tokenizing
    }

    /// Apply a tokenization response.
    pub fn resolve(&self, result: TokenResult) -> Resolution {
        match result {
            TokenResult::Error(err) => {
                self.reject(&err);
                Resolution::Rejected
            }
            TokenResult::Success(token) => {
                log::debug!("received token {}", token.id);
                let submitted = self
                    .form
                    .inject_hidden_field(TOKEN_FIELD, &token.id)
                    .and_then(|()| self.form.submit_native());
                match submitted {
                    Ok(()) => Resolution::Submitted,
                    Err(e) => {
                        log::error!("could not submit tokenized payment form: {}", e);
                        self.reject(&TokenError::new(e.to_string()));
                        Resolution::Rejected
                    }
                }
            }
        }
    }

    fn reject(&self, err: &TokenError) {
        log::warn!("payment token request failed: {}", err.message);
        self.form.show_error(&err.message);
        self.form.set_submit_enabled(true);
        self.in_flight.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum FormEvent {
        Enabled(bool),
        Error(String),
        Hidden(String, String),
        NativeSubmit,
    }

    #[derive(Default)]
    struct RecordingForm {
        card: CardDetails,
        events: RefCell<Vec<FormEvent>>,
        hidden: RefCell<Vec<(String, String)>>,
        enabled: Cell<bool>,
        error_text: RefCell<String>,
        fail_submit: bool,
    }

    impl RecordingForm {
        fn with_card(card: CardDetails) -> Rc<Self> {
            Rc::new(RecordingForm {
                card,
                enabled: Cell::new(true),
                ..Default::default()
            })
        }

        fn native_submits(&self) -> usize {
            self.events
                .borrow()
                .iter()
                .filter(|e| **e == FormEvent::NativeSubmit)
                .count()
        }
    }

    impl PaymentForm for RecordingForm {
        fn card_details(&self) -> CardDetails {
            self.card.clone()
        }
        fn set_submit_enabled(&self, enabled: bool) {
            self.enabled.set(enabled);
            self.events.borrow_mut().push(FormEvent::Enabled(enabled));
        }
        fn show_error(&self, message: &str) {
            *self.error_text.borrow_mut() = message.to_string();
            self.events.borrow_mut().push(FormEvent::Error(message.into()));
        }
        fn inject_hidden_field(&self, name: &str, value: &str) -> Result<(), PageError> {
            let mut hidden = self.hidden.borrow_mut();
            hidden.retain(|(n, _)| n != name);
            hidden.push((name.into(), value.into()));
            self.events
                .borrow_mut()
                .push(FormEvent::Hidden(name.into(), value.into()));
            Ok(())
        }
        fn submit_native(&self) -> Result<(), PageError> {
            if self.fail_submit {
                return Err(PageError::Js("form.submit is not a function".into()));
            }
            self.events.borrow_mut().push(FormEvent::NativeSubmit);
            Ok(())
        }
    }

    /// Holds callbacks until the test decides to answer.
    #[derive(Default)]
    struct PendingTokenizer {
        requests: RefCell<Vec<CardDetails>>,
        // Submit-control state observed when each request was issued.
        enabled_at_request: RefCell<Vec<bool>>,
        pending: RefCell<Vec<Box<dyn FnOnce(TokenResult)>>>,
        form: RefCell<Option<Rc<RecordingForm>>>,
    }

    impl PendingTokenizer {
        fn answer(&self, result: TokenResult) {
            let callback = self.pending.borrow_mut().remove(0);
            callback(result);
        }
    }

    impl Tokenizer for PendingTokenizer {
        fn create_token(&self, card: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>) {
            if let Some(form) = &*self.form.borrow() {
                self.enabled_at_request.borrow_mut().push(form.enabled.get());
            }
            self.requests.borrow_mut().push(card);
            self.pending.borrow_mut().push(on_response);
        }
    }

    fn scenario_card() -> CardDetails {
        CardDetails {
            number: "4242424242424242".into(),
            cvc: "123".into(),
            exp_month: "12".into(),
            exp_year: "2030".into(),
        }
    }

    fn setup() -> (
        Rc<RecordingForm>,
        Rc<PendingTokenizer>,
        Rc<SubmissionInterceptor<Rc<RecordingForm>, Rc<PendingTokenizer>>>,
    ) {
        let form = RecordingForm::with_card(scenario_card());
        let tokenizer = Rc::new(PendingTokenizer::default());
        *tokenizer.form.borrow_mut() = Some(form.clone());
        let interceptor = SubmissionInterceptor::new(form.clone(), tokenizer.clone());
        (form, tokenizer, interceptor)
    }

    fn success(id: &str) -> TokenResult {
        TokenResult::Success(Token {
            id: id.into(),
            card: None,
        })
    }

    #[test]
    fn success_injects_token_and_submits_once() {
        let (form, tokenizer, interceptor) = setup();

        assert_eq!(interceptor.on_submit(), SubmitOutcome::Tokenizing);
        assert_eq!(tokenizer.requests.borrow().as_slice(), &[scenario_card()]);

        tokenizer.answer(success("tok_abc"));

        assert_eq!(
            form.hidden.borrow().as_slice(),
            &[(TOKEN_FIELD.to_string(), "tok_abc".to_string())]
        );
        assert_eq!(form.native_submits(), 1);
        assert_eq!(
            form.events.borrow().as_slice(),
            &[
                FormEvent::Enabled(false),
                FormEvent::Hidden("stripeToken".into(), "tok_abc".into()),
                FormEvent::NativeSubmit,
            ]
        );
        assert!(!form.enabled.get(), "never re-enabled after success");
        assert!(interceptor.in_flight());
    }

    #[test]
    fn error_shows_message_and_reenables() {
        let (form, tokenizer, interceptor) = setup();

        interceptor.on_submit();
        tokenizer.answer(TokenResult::Error(TokenError::new(
            "Your card number is incorrect.",
        )));

        assert_eq!(*form.error_text.borrow(), "Your card number is incorrect.");
        assert!(form.enabled.get());
        assert_eq!(form.native_submits(), 0);
        assert!(form.hidden.borrow().is_empty());
        assert!(!interceptor.in_flight());
    }

    #[test]
    fn control_disabled_before_request_and_while_pending() {
        let (form, tokenizer, interceptor) = setup();

        interceptor.on_submit();
        assert_eq!(tokenizer.enabled_at_request.borrow().as_slice(), &[false]);
        assert!(!form.enabled.get());
        assert!(interceptor.in_flight());

        tokenizer.answer(TokenResult::Error(TokenError::new("declined")));
        assert!(form.enabled.get());
    }

    #[test]
    fn second_submit_while_pending_is_ignored() {
        let (_form, tokenizer, interceptor) = setup();

        assert_eq!(interceptor.on_submit(), SubmitOutcome::Tokenizing);
        assert_eq!(interceptor.on_submit(), SubmitOutcome::AlreadyPending);
        assert_eq!(tokenizer.requests.borrow().len(), 1);
    }

    #[test]
    fn resubmit_after_error_issues_new_request() {
        let (form, tokenizer, interceptor) = setup();

        interceptor.on_submit();
        tokenizer.answer(TokenResult::Error(TokenError::new("Your card has expired.")));
        assert_eq!(interceptor.on_submit(), SubmitOutcome::Tokenizing);
        tokenizer.answer(success("tok_second"));

        assert_eq!(tokenizer.requests.borrow().len(), 2);
        assert_eq!(tokenizer.enabled_at_request.borrow().as_slice(), &[false, false]);
        assert_eq!(
            form.hidden.borrow().as_slice(),
            &[(TOKEN_FIELD.to_string(), "tok_second".to_string())]
        );
        assert_eq!(form.native_submits(), 1);
        // Error text from the first attempt stays until replaced.
        assert_eq!(*form.error_text.borrow(), "Your card has expired.");
    }

    #[test]
    fn synchronous_callback_resolves_inside_submit() {
        struct Immediate;
        impl Tokenizer for Immediate {
            fn create_token(&self, _: CardDetails, on_response: Box<dyn FnOnce(TokenResult)>) {
                on_response(TokenResult::Error(TokenError::new("offline")));
            }
        }
        let form = RecordingForm::with_card(scenario_card());
        let interceptor = SubmissionInterceptor::new(form.clone(), Immediate);

        assert_eq!(interceptor.on_submit(), SubmitOutcome::Tokenizing);
        assert_eq!(
            form.events.borrow().as_slice(),
            &[
                FormEvent::Enabled(false),
                FormEvent::Error("offline".into()),
                FormEvent::Enabled(true),
            ]
        );
    }

    #[test]
    fn failed_native_submit_is_reported_and_reenables() {
        let form = Rc::new(RecordingForm {
            card: scenario_card(),
            enabled: Cell::new(true),
            fail_submit: true,
            ..Default::default()
        });
        let tokenizer = Rc::new(PendingTokenizer::default());
        let interceptor = SubmissionInterceptor::new(form.clone(), tokenizer.clone());

        interceptor.on_submit();
        tokenizer.answer(success("tok_abc"));

        assert!(form.enabled.get());
        assert!(form.error_text.borrow().contains("form.submit is not a function"));
        assert!(!interceptor.in_flight());
    }

    #[test]
    fn field_values_pass_through_unvalidated() {
        let card = CardDetails {
            number: " not a number ".into(),
            cvc: "".into(),
            exp_month: "13".into(),
            exp_year: "19".into(),
        };
        let form = RecordingForm::with_card(card.clone());
        let tokenizer = Rc::new(PendingTokenizer::default());
        let interceptor = SubmissionInterceptor::new(form, tokenizer.clone());

        interceptor.on_submit();
        assert_eq!(tokenizer.requests.borrow().as_slice(), &[card]);
    }
}
