//! yew_stripe_token/src/widgets.rs
//!
//! The two decorative widgets on the page: the product carousel and the
//! team-member popovers. Rendering belongs to the widget library; this
//! module only hands it static options, once.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::to_value;

use crate::bindings::jquery;
use crate::config::PageConfig;
use crate::error::PageError;

/// Options for `$(..).carousel(..)`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselOptions {
    /// Auto-advance interval in milliseconds.
    pub interval: u32,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        CarouselOptions { interval: 2500 }
    }
}

/// Popover position relative to its trigger.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

/// Options for `$(..).popover(..)`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PopoverOptions {
    pub placement: Placement,
}

/// A UI widget library able to decorate elements matched by a selector.
pub trait WidgetLibrary {
    fn carousel(&self, selector: &str, options: &CarouselOptions) -> Result<(), PageError>;
    fn popover(&self, selector: &str, options: &PopoverOptions) -> Result<(), PageError>;
}

/// jQuery with the Bootstrap plugins loaded by the page template.
#[derive(Debug, Default, Clone, Copy)]
pub struct JQueryWidgets;

impl WidgetLibrary for JQueryWidgets {
    fn carousel(&self, selector: &str, options: &CarouselOptions) -> Result<(), PageError> {
        let selection = jquery(selector)?;
        if selection.length() == 0 {
            log::debug!("no carousel matches `{}`", selector);
        }
        selection.carousel(to_value(options)?)?;
        Ok(())
    }

    fn popover(&self, selector: &str, options: &PopoverOptions) -> Result<(), PageError> {
        let selection = jquery(selector)?;
        log::debug!("{} popover trigger(s) match `{}`", selection.length(), selector);
        selection.popover(to_value(options)?)?;
        Ok(())
    }
}

/// Initialize the carousel and the popovers, once each.
///
/// Both are attempted even if the first fails; the first error is returned.
pub fn init_widgets<W: WidgetLibrary + ?Sized>(
    widgets: &W,
    config: &PageConfig,
) -> Result<(), PageError> {
    let carousel = widgets
        .carousel(&config.carousel.selector, &config.carousel.options())
        .inspect_err(|e| log::error!("carousel init failed: {}", e));
    let popover = widgets
        .popover(&config.popover.selector, &config.popover.options())
        .inspect_err(|e| log::error!("popover init failed: {}", e));
    carousel.and(popover)
}
