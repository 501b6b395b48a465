// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engineer handoff from the browser

use std::time::Duration;

use floorsketch_export::{ExportClient, ExportError, ExportPayload};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::utils::to_js;

/// What the page shows after a send attempt
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendStatus {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_url: Option<String>,
}

async fn send(url: &str, payload_json: &str, poll_delay_ms: Option<u32>) -> Result<SendStatus, ExportError> {
    let payload: ExportPayload = serde_json::from_str(payload_json)?;
    let mut client = ExportClient::new(url)?;
    if let Some(ms) = poll_delay_ms {
        client = client.with_poll_delay(Duration::from_millis(u64::from(ms)));
    }

    let receipt = client.send_and_poll(&payload).await?;
    Ok(SendStatus {
        success: true,
        message: receipt.message,
        document_url: receipt.document_url,
    })
}

/// POST a payload from `SketchAPI.exportPayload()` to the handoff URL.
///
/// Never rejects for network or server failures; those come back as
/// `{ success: false, message }` with text ready for the status line.
#[wasm_bindgen(js_name = sendMetrics)]
pub async fn send_metrics(
    url: String,
    payload_json: String,
    poll_delay_ms: Option<u32>,
) -> Result<JsValue, JsError> {
    let status = match send(&url, &payload_json, poll_delay_ms).await {
        Ok(status) => status,
        Err(err) => {
            web_sys::console::warn_1(&format!("Metrics export failed: {}", err).into());
            SendStatus {
                success: false,
                message: err.status_text(),
                document_url: None,
            }
        }
    };
    to_js(&status)
}
