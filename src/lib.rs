mod bindings;
mod components;
mod config;
mod dom;
mod error;
mod interceptor;
mod interop;
mod logging;
mod page;
mod token;
mod tokenizer;
mod widgets;

pub use bindings::*;
pub use components::*;
pub use config::*;
pub use dom::*;
pub use error::PageError;
pub use interceptor::*;
pub use interop::*;
pub use logging::init as init_logging;
pub use page::*;
pub use token::*;
pub use tokenizer::*;
pub use widgets::*;
