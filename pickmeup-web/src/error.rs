use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("`window` is not available in this context")]
    MissingWindow,
    #[error("`document` is not available in this context")]
    MissingDocument,
    #[error("no element matches {0:?}")]
    TargetNotFound(String),
    #[error("target must be a CSS selector or an element")]
    InvalidTarget,
    #[error("invalid options: {0}")]
    Options(String),
    #[error("template hook failed: {0}")]
    Template(String),
    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
