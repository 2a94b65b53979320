//! WebAssembly bindings for use in the browser.
//!
//! ```javascript
//! import init, { mask_xml } from 'xmlmask';
//!
//! await init();
//! const out = mask_xml('<note><from>Jane Doe</from></note>', {
//!     prefix: '',
//!     indent: '  ',
//!     masks: [{ name: 'from', space: '', mask: 'show-middle' }],
//! });
//! if (out.error) {
//!     console.error(out.error);
//! } else {
//!     console.log(out.result);
//! }
//! ```
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{reformat_str, Configuration};

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Response {
    Result(String),
    Error(String),
}

/// Reformat `input` with the given options object: `{prefix, indent,
/// masks: [{name, space, mask}]}`. Missing fields take their defaults.
///
/// Returns `{result: "..."}` on success and `{error: "..."}` on failure.
#[wasm_bindgen]
pub fn mask_xml(input: &str, options: JsValue) -> JsValue {
    let response = match serde_wasm_bindgen::from_value::<Configuration>(options) {
        Ok(config) => match reformat_str(input, &config) {
            Ok(output) => Response::Result(output),
            Err(e) => Response::Error(e.to_string()),
        },
        Err(e) => Response::Error(format!("invalid options: {}", e)),
    };
    serde_wasm_bindgen::to_value(&response).unwrap_or(JsValue::NULL)
}

/// Version of the library.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
