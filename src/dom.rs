//! yew_stripe_token/src/dom.rs
//!
//! web-sys implementation of [`PaymentForm`] and the `submit` listener that
//! feeds [`SubmissionInterceptor`].

use std::rc::Rc;

use wasm_bindgen::{prelude::Closure, JsCast};
use web_sys::{Document, Element, Event, HtmlFormElement, HtmlInputElement};

use crate::config::FormSelectors;
use crate::error::PageError;
use crate::interceptor::{PaymentForm, SubmissionInterceptor, Tokenizer};
use crate::token::CardDetails;

/// The server-rendered payment form.
#[derive(Debug, Clone)]
pub struct DomPaymentForm {
    document: Document,
    form: HtmlFormElement,
    selectors: FormSelectors,
}

impl DomPaymentForm {
    /// Find the form described by `selectors` in `document`.
    pub fn locate(document: &Document, selectors: &FormSelectors) -> Result<Self, PageError> {
        let form = document
            .query_selector(&selectors.form)?
            .ok_or_else(|| PageError::MissingElement(selectors.form.clone()))?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| PageError::WrongElement {
                selector: selectors.form.clone(),
                expected: "<form>",
            })?;
        Ok(DomPaymentForm {
            document: document.clone(),
            form,
            selectors: selectors.clone(),
        })
    }

    pub fn element(&self) -> &HtmlFormElement {
        &self.form
    }

    /// Inside the form first, then anywhere in the document.
    fn find(&self, selector: &str) -> Option<Element> {
        self.form
            .query_selector(selector)
            .ok()
            .flatten()
            .or_else(|| self.document.query_selector(selector).ok().flatten())
    }

    fn input_value(&self, selector: &str) -> String {
        match self.find(selector) {
            Some(el) => match el.dyn_into::<HtmlInputElement>() {
                Ok(input) => input.value(),
                Err(_) => {
                    log::warn!("`{}` is not an <input>; sending empty value", selector);
                    String::new()
                }
            },
            None => {
                log::warn!("card field `{}` not found; sending empty value", selector);
                String::new()
            }
        }
    }

    fn submit_controls(&self) -> Vec<Element> {
        let selector = &self.selectors.submit_button;
        let nodes = match self.form.query_selector_all(selector) {
            Ok(nodes) if nodes.length() > 0 => nodes,
            _ => match self.document.query_selector_all(selector) {
                Ok(nodes) => nodes,
                Err(_) => return Vec::new(),
            },
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl PaymentForm for DomPaymentForm {
    fn card_details(&self) -> CardDetails {
        CardDetails {
            number: self.input_value(&self.selectors.card_number),
            cvc: self.input_value(&self.selectors.card_cvc),
            exp_month: self.input_value(&self.selectors.card_expiry_month),
            exp_year: self.input_value(&self.selectors.card_expiry_year),
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        for control in self.submit_controls() {
            let res = if enabled {
                control.remove_attribute("disabled")
            } else {
                control.set_attribute("disabled", "disabled")
            };
            if let Err(e) = res {
                log::error!("could not toggle submit control: {}", PageError::from(e));
            }
        }
    }

    fn show_error(&self, message: &str) {
        match self.find(&self.selectors.errors) {
            // Text only: the service's message is never parsed as markup.
            Some(el) => el.set_text_content(Some(message)),
            None => log::error!(
                "error display `{}` missing; dropped message: {}",
                self.selectors.errors,
                message
            ),
        }
    }

    fn inject_hidden_field(&self, name: &str, value: &str) -> Result<(), PageError> {
        let existing = self
            .form
            .query_selector_all(&format!("input[type=\"hidden\"][name=\"{}\"]", name))?;
        for i in 0..existing.length() {
            if let Some(node) = existing.item(i) {
                if let Some(parent) = node.parent_node() {
                    parent.remove_child(&node)?;
                }
            }
        }

        let input = self
            .document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| PageError::Js("created element is not an <input>".into()))?;
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(value);
        self.form.append_child(&input)?;
        Ok(())
    }

    fn submit_native(&self) -> Result<(), PageError> {
        // HTMLFormElement.submit() does not fire `submit`.
        self.form.submit()?;
        Ok(())
    }
}

/// A registered `submit` listener. Dropping it unregisters the listener.
pub struct SubmitListener {
    target: HtmlFormElement,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl SubmitListener {
    /// Keep the listener for the rest of the page's life.
    pub fn forget(mut self) {
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for SubmitListener {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        }
    }
}

/// Route `submit` events of the interceptor's form into it.
///
/// The default action is cancelled on every event; the only submission
/// that reaches the server is the native one issued after tokenization.
pub fn attach_interceptor<T>(
    interceptor: Rc<SubmissionInterceptor<DomPaymentForm, T>>,
) -> Result<SubmitListener, PageError>
where
    T: Tokenizer + 'static,
{
    let target = interceptor.form().element().clone();
    let closure = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        let outcome = interceptor.on_submit();
        log::debug!("payment form submit: {:?}", outcome);
    }) as Box<dyn FnMut(Event)>);

    target.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;

    Ok(SubmitListener {
        target,
        closure: Some(closure),
    })
}
