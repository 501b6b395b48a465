// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the engineer handoff endpoint.
//!
//! One POST per export and at most one follow-up GET. No retries.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::{ExportError, Result};
use crate::payload::ExportPayload;
use crate::response::{document_url, interpret_response, ExportReceipt};

/// Delay before checking a `pollUrl`
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(4000);

/// Plain text keeps the request "simple" for browser CORS rules
const BODY_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

pub struct ExportClient {
    url: String,
    poll_delay: Duration,
    http: reqwest::Client,
}

impl ExportClient {
    /// Client for a handoff URL. Blank URLs are refused.
    pub fn new(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExportError::MissingUrl);
        }
        Ok(Self {
            url: url.to_string(),
            poll_delay: DEFAULT_POLL_DELAY,
            http: reqwest::Client::new(),
        })
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the payload and interpret the answer
    pub async fn send(&self, payload: &ExportPayload) -> Result<ExportReceipt> {
        let body = serde_json::to_string(payload)?;
        tracing::info!(url = %self.url, bytes = body.len(), "Sending plan metrics");

        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, BODY_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        // An unreadable body is treated like an empty one
        let text = resp.text().await.unwrap_or_default();

        let result = interpret_response(status, &text);
        match &result {
            Ok(receipt) => tracing::info!(status, message = %receipt.message, "Export accepted"),
            Err(err) => tracing::warn!(status, error = %err, "Export rejected"),
        }
        result
    }

    /// GET `poll_url` once and look for a document link
    pub async fn poll(&self, poll_url: &str) -> Result<Option<String>> {
        let resp = self.http.get(poll_url).send().await?;
        if !resp.status().is_success() {
            tracing::warn!(status = resp.status().as_u16(), "Poll returned an error status");
            return Ok(None);
        }
        let text = resp.text().await?;
        Ok(document_url(&text))
    }

    /// Send, then wait and poll once when the endpoint handed out a poll URL.
    /// Poll failures are logged and leave the receipt without a document.
    pub async fn send_and_poll(&self, payload: &ExportPayload) -> Result<ExportReceipt> {
        let mut receipt = self.send(payload).await?;
        if receipt.document_url.is_some() {
            return Ok(receipt);
        }
        let Some(poll_url) = receipt.poll_url.clone() else {
            return Ok(receipt);
        };

        sleep(self.poll_delay).await;
        match self.poll(&poll_url).await {
            Ok(document) => receipt.document_url = document,
            Err(err) => tracing::warn!(error = %err, "Document poll failed"),
        }
        Ok(receipt)
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    gloo_timers::future::sleep(delay).await;
}
