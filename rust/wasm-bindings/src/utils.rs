// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use floorsketch_core::Result;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Convert to a plain JS object (maps become objects, not `Map`s)
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// `{ success: true, ...value }` or `{ success: false, reason, message }`.
/// Values that are not objects land under `value`.
pub(crate) fn reply_value<T: Serialize>(result: Result<T>) -> Value {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(Value::Object(mut map)) => {
                map.insert("success".into(), Value::Bool(true));
                Value::Object(map)
            }
            Ok(other) => json!({ "success": true, "value": other }),
            Err(e) => json!({ "success": false, "reason": "serialization", "message": e.to_string() }),
        },
        Err(err) => json!({
            "success": false,
            "reason": err.reason(),
            "message": err.to_string(),
        }),
    }
}

pub(crate) fn reply<T: Serialize>(result: Result<T>) -> std::result::Result<JsValue, JsError> {
    to_js(&reply_value(result))
}
