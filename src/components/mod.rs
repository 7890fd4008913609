use yew::prelude::*;

mod card_form;

pub use card_form::{CardForm, CardFormProps};

/// A labelled card input.
///
/// Rendered without a `name`, so the raw value is never posted to the
/// server; only the token is.
#[derive(Properties, PartialEq)]
pub struct CardFieldProps {
    /// Label text
    pub label: AttrValue,
    /// Class the interceptor looks the field up by, e.g. `card-number`
    pub class: AttrValue,
    #[prop_or(20)]
    pub size: u32,
    #[prop_or_default]
    pub autocomplete: Option<AttrValue>,
}

#[function_component(CardField)]
pub fn card_field(props: &CardFieldProps) -> Html {
    html! {
        <div class="form-row">
            <label>{ props.label.clone() }</label>
            <input
                type="text"
                size={props.size.to_string()}
                autocomplete={props.autocomplete.clone().unwrap_or_else(|| AttrValue::from("off"))}
                class={props.class.clone()}
            />
        </div>
    }
}

/// A submit button.
#[derive(Properties, PartialEq)]
pub struct SubmitButtonProps {
    /// Button label text
    pub label: AttrValue,
    /// Disable state
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(SubmitButton)]
pub fn submit_button(props: &SubmitButtonProps) -> Html {
    html! {
        <button type="submit" class="submit-button" disabled={props.disabled}>
            { props.label.clone() }
        </button>
    }
}
