//! Client-rendered payment form.
//!
//! Renders the same markup the server template uses and puts a
//! [`SubmissionInterceptor`] on it as soon as it is mounted. The tokenizer
//! connects to Stripe.js once the script is there. Unmounting removes the
//! listener.
//!
//! # Example
//!
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_stripe_token::CardForm;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     html! {
//!         <CardForm
//!             publishable_key="pk_test_123"
//!             action="/charge"
//!         >
//!             <p>{ "Your order: Awesome T-shirt – $25.00" }</p>
//!         </CardForm>
//!     }
//! }
//! ```

use yew::prelude::*;

use super::{CardField, SubmitButton};
use crate::config::FormSelectors;
use crate::dom::{attach_interceptor, DomPaymentForm, SubmitListener};
use crate::error::PageError;
use crate::interceptor::SubmissionInterceptor;
use crate::tokenizer::{DeferredTokenizer, StripeTokenizer};
use crate::use_stripejs;

#[derive(Properties, PartialEq, Clone)]
pub struct CardFormProps {
    /// Your Stripe publishable key (`pk_…`).
    pub publishable_key: AttrValue,
    /// Where the tokenized form is posted.
    pub action: AttrValue,
    #[prop_or(AttrValue::from("payment-form"))]
    pub id: AttrValue,
    #[prop_or_default]
    pub button_label: Option<AttrValue>,
    /// Extra nodes (e.g. product summary) rendered above the fields.
    #[prop_or_default]
    pub children: Children,
}

fn intercept_rendered_form(form_id: &str, publishable_key: &str) -> Result<SubmitListener, PageError> {
    let document = gloo_utils::document();
    let selectors = FormSelectors {
        form: format!("#{}", form_id),
        ..FormSelectors::default()
    };
    let form = DomPaymentForm::locate(&document, &selectors)?;
    let key = publishable_key.to_string();
    let tokenizer = DeferredTokenizer::new(move || StripeTokenizer::new(&key));
    attach_interceptor(SubmissionInterceptor::new(form, tokenizer))
}

#[function_component(CardForm)]
pub fn card_form(props: &CardFormProps) -> Html {
    let stripe_ready = use_stripejs();
    let listener = use_mut_ref(|| None::<SubmitListener>);

    {
        let listener = listener.clone();
        let form_id = props.id.clone();
        let pk = props.publishable_key.clone();
        use_effect_with(form_id, move |form_id| {
            match intercept_rendered_form(form_id, &pk) {
                Ok(l) => *listener.borrow_mut() = Some(l),
                Err(e) => log::error!("card form `{}` not wired: {}", form_id, e),
            }
            move || {
                listener.borrow_mut().take();
            }
        });
    }

    html! {
        <form id={props.id.clone()} action={props.action.clone()} method="POST">
            { for props.children.iter() }
            <span class="payment-errors"></span>
            <CardField label="Card Number" class="card-number" size={20} autocomplete={AttrValue::from("cc-number")} />
            <CardField label="CVC" class="card-cvc" size={4} autocomplete={AttrValue::from("cc-csc")} />
            <CardField label="Expiration (MM)" class="card-expiry-month" size={2} autocomplete={AttrValue::from("cc-exp-month")} />
            <CardField label="Expiration (YYYY)" class="card-expiry-year" size={4} autocomplete={AttrValue::from("cc-exp-year")} />
            <SubmitButton
                label={props.button_label.clone().unwrap_or_else(|| AttrValue::from("Submit Payment"))}
                disabled={!stripe_ready}
            />
        </form>
    }
}
