// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interpreting handoff endpoint responses.
//!
//! The endpoint is a spreadsheet script that may answer with JSON, plain
//! text or nothing at all. JSON bodies may carry `success`, `message`, a
//! `pollUrl` to check later and a `documentUrl` once a document exists.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ExportError, Result};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Sent to our engineers.";
pub const PENDING_MESSAGE: &str = "Sending to our engineers…";

/// Accepted export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

fn parse_json(body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn non_empty_str<'a>(json: Option<&'a Value>, key: &str) -> Option<&'a str> {
    json?.get(key)?.as_str().filter(|s| !s.is_empty())
}

/// Turn a POST response into a receipt or a rejection.
///
/// A non-2xx status or `"success": false` is a rejection; its message is
/// the JSON `message`, else the raw body, else a generic status line.
pub fn interpret_response(status: u16, body: &str) -> Result<ExportReceipt> {
    let json = parse_json(body);
    let ok = (200..300).contains(&status);
    let declined = json
        .as_ref()
        .and_then(|v| v.get("success"))
        .and_then(Value::as_bool)
        == Some(false);

    let message = non_empty_str(json.as_ref(), "message");

    if !ok || declined {
        let message = match message {
            Some(m) => m.to_string(),
            None if !body.is_empty() => body.to_string(),
            None => format!("Request failed with status {status}"),
        };
        return Err(ExportError::Rejected(message));
    }

    Ok(ExportReceipt {
        message: message.unwrap_or(DEFAULT_SUCCESS_MESSAGE).to_string(),
        poll_url: non_empty_str(json.as_ref(), "pollUrl").map(str::to_string),
        document_url: non_empty_str(json.as_ref(), "documentUrl").map(str::to_string),
    })
}

/// `documentUrl` from a poll response, if the document is ready
pub fn document_url(body: &str) -> Option<String> {
    non_empty_str(parse_json(body).as_ref(), "documentUrl").map(str::to_string)
}
