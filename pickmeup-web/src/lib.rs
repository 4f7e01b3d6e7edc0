#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod adapter;
pub mod api;
pub mod binding;
pub mod components;
pub mod dom;
pub mod error;

pub use adapter::DomAdapter;
pub use api::{PickMeUp, attach};
pub use components::{Calendar, CalendarProps};
pub use error::WebError;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
